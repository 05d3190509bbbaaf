//! Stream spell-checker CLI: reads stdin, tokenizes maximal alphabetic
//! runs, checks each lowercased token against the dictionary, and echoes
//! the input back to stdout with a `#` prepended to every misspelled
//! token. With `-v`, prints `line,column word: hint hint ...` to stderr
//! for each miss.
//!
//! Tracks each word's start column directly when the word begins, rather
//! than deriving it from the following delimiter's position, so a word
//! flushed by EOF gets the same column accounting as one flushed by a
//! delimiter.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use spelltrie::{Dictionary, Word};

#[derive(Parser)]
#[command(
  about = "Checks stdin against a trie dictionary, prefixing misspelled tokens with '#'"
)]
struct Cli {
  /// Print `line,column word: hints…` to stderr for every misspelled token.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  dictfile: PathBuf,
}

fn print_hints(stderr: &mut impl Write, dict: &Dictionary, word: &Word) -> io::Result<()> {
  let hints = dict.hints(word).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
  let rendered: Vec<String> = hints.iter().map(ToString::to_string).collect();
  writeln!(stderr, "{}", rendered.join(" "))
}

fn process_word(
  stdout: &mut impl Write,
  stderr: &mut impl Write,
  dict: &Dictionary,
  verbose: bool,
  raw: &[char],
  line: usize,
  column: usize,
) -> io::Result<()> {
  let lower: Vec<char> = raw.iter().flat_map(|c| c.to_lowercase()).collect();
  let lower_word = Word::from(lower.as_slice());
  if !dict.find(&lower_word) {
    if verbose {
      let raw_word: String = raw.iter().collect();
      write!(stderr, "{line},{column} {raw_word}: ")?;
      print_hints(stderr, dict, &lower_word)?;
    }
    write!(stdout, "#")?;
  }
  for c in raw {
    write!(stdout, "{c}")?;
  }
  Ok(())
}

fn run(
  dict: &Dictionary,
  verbose: bool,
  input: &str,
  stdout: &mut impl Write,
  stderr: &mut impl Write,
) -> io::Result<()> {
  let mut line = 1usize;
  let mut character = 0usize;
  let mut word_start_column = 0usize;
  let mut current_word: Vec<char> = Vec::new();

  for ch in input.chars() {
    character += 1;
    if ch.is_alphabetic() {
      if current_word.is_empty() {
        word_start_column = character;
      }
      current_word.push(ch);
      continue;
    }
    if !current_word.is_empty() {
      process_word(stdout, stderr, dict, verbose, &current_word, line, word_start_column)?;
      current_word.clear();
    }
    if ch == '\n' {
      line += 1;
      character = 0;
    }
    write!(stdout, "{ch}")?;
  }
  if !current_word.is_empty() {
    process_word(stdout, stderr, dict, verbose, &current_word, line, word_start_column)?;
  }
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();
  let cli = Cli::parse();

  let mut file = match File::open(&cli.dictfile) {
    Ok(f) => f,
    Err(e) => {
      error!(path = %cli.dictfile.display(), error = %e, "could not open dictionary file");
      return ExitCode::FAILURE;
    }
  };
  let dict = match Dictionary::load(&mut file) {
    Ok(d) => d,
    Err(e) => {
      error!(error = %e, "could not load dictionary");
      return ExitCode::FAILURE;
    }
  };

  let mut input = String::new();
  if let Err(e) = io::stdin().read_to_string(&mut input) {
    error!(error = %e, "could not read stdin");
    return ExitCode::FAILURE;
  }

  let stdout = io::stdout();
  let stderr = io::stderr();
  let mut stdout_lock = stdout.lock();
  let mut stderr_lock = stderr.lock();
  if let Err(e) = run(&dict, cli.verbose, &input, &mut stdout_lock, &mut stderr_lock) {
    error!(error = %e, "I/O error while checking input");
    return ExitCode::FAILURE;
  }

  ExitCode::SUCCESS
}
