//! The public dictionary facade: composes the trie, alphabet, and rule
//! set, and is the crate's single entry point. `tracing` events mark
//! every mutating call.

use std::io::{Read, Write};

use tracing::{debug, info, instrument};

use crate::alphabet::Alphabet;
use crate::config::DEFAULT_COST_MAX;
use crate::error::Result;
use crate::hint;
use crate::rule::RuleFlag;
use crate::trie::{self, Trie};
use crate::word::Word;
use crate::word_list::WordList;

/// Owns one trie, one alphabet, and one rule set. `new`/`done` bracket
/// the dictionary's lifetime; in Rust, `done` is `Drop`'s job, but it is
/// exposed explicitly too so callers can invoke teardown themselves.
#[derive(Debug)]
pub struct Dictionary {
  trie: Trie,
  alphabet: Alphabet,
  rules: crate::rule::RuleSet,
  cost_max: u32,
}

impl Default for Dictionary {
  fn default() -> Self {
    Self::new()
  }
}

impl Dictionary {
  pub fn new() -> Self {
    Dictionary {
      trie: Trie::new(),
      alphabet: Alphabet::new(),
      rules: crate::rule::RuleSet::new(),
      cost_max: DEFAULT_COST_MAX,
    }
  }

  /// Releases every owned resource. Equivalent to dropping the value;
  /// provided explicitly so callers can mirror the source's explicit
  /// construct/teardown pairing.
  pub fn done(self) {}

  #[instrument(skip(self))]
  pub fn insert(&mut self, word: &Word) -> Result<bool> {
    let inserted = self.trie.insert(word, &mut self.alphabet)?;
    if inserted {
      debug!(%word, "inserted");
    }
    Ok(inserted)
  }

  #[instrument(skip(self))]
  pub fn delete(&mut self, word: &Word) -> bool {
    let deleted = self.trie.delete(word);
    if deleted {
      debug!(%word, "deleted");
    }
    deleted
  }

  pub fn find(&self, word: &Word) -> bool {
    self.trie.find(word)
  }

  #[instrument(skip(self, w))]
  pub fn save(&self, w: &mut impl Write) -> Result<()> {
    writeln!(w, "{}", self.alphabet)?;
    self.trie.save(w)?;
    info!(words = self.trie.len(), "saved dictionary");
    Ok(())
  }

  #[instrument(skip(r))]
  pub fn load(r: &mut impl Read) -> Result<Dictionary> {
    let (alphabet_line, rest) = trie::read_alphabet_line(r)?;
    let mut alphabet = Alphabet::new();
    for c in alphabet_line.chars() {
      alphabet.append(c)?;
    }
    let loaded = Trie::load(rest.chars().peekable())?;
    info!(words = loaded.len(), "loaded dictionary");
    Ok(Dictionary {
      trie: loaded,
      alphabet,
      rules: crate::rule::RuleSet::new(),
      cost_max: DEFAULT_COST_MAX,
    })
  }

  /// At most `DICTIONARY_MAX_HINTS` candidates, in collation order.
  #[instrument(skip(self))]
  pub fn hints(&self, word: &Word) -> Result<WordList> {
    let result = hint::search(&self.trie, &self.rules, word, self.cost_max)?;
    debug!(found = result.size(), "hint search complete");
    Ok(result)
  }

  /// Sets the hint search's cost budget, returning the previous value.
  pub fn cost_max_set(&mut self, new: u32) -> u32 {
    let old = self.cost_max;
    self.cost_max = new;
    old
  }

  pub fn cost_max(&self) -> u32 {
    self.cost_max
  }

  /// Adds a rule, and (if `bidirectional`) its mirror image `(right,
  /// left, cost, flag)` too. Each direction is validated independently,
  /// since swapping sides can change which placeholders are orphaned.
  #[instrument(skip(self))]
  pub fn rule_add(
    &mut self,
    left: Vec<char>,
    right: Vec<char>,
    bidirectional: bool,
    cost: u32,
    flag: RuleFlag,
  ) -> Result<()> {
    self.rules.add(left.clone(), right.clone(), cost, flag)?;
    if bidirectional {
      self.rules.add(right, left, cost, flag)?;
    }
    Ok(())
  }

  pub fn rule_clear(&mut self) {
    self.rules.clear();
  }

  pub fn rule_count(&self) -> usize {
    self.rules.len()
  }
}
