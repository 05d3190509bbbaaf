//! Error kinds the core recognizes.
//!
//! `NotFound` and `AlreadyPresent` are expected outcomes and are surfaced as
//! plain `bool` returns from `Dictionary`, never through this type (see
//! `Dictionary::insert`/`delete`). Everything here is a genuine failure: a
//! malformed rule, a malformed save file, an I/O failure, or an allocator
//! failure during one of the core's geometric-growth operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
  #[error("rule is malformed: {0}")]
  MalformedRule(String),

  #[error("dictionary file does not match the save grammar: {0}")]
  MalformedDictFile(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("allocation failed while growing {0}")]
  OutOfMemory(&'static str),
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
