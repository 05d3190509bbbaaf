//! Rewrite rules and the rule set.
//!
//! A rule file is one line per rule, parsed with `nom` combinators
//! instead of a hand-rolled character scanner.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

use nom::branch::alt;
use nom::character::complete::{char as nchar, digit1, none_of, space1};
use nom::combinator::{map_res, value};
use nom::multi::many0;
use nom::sequence::tuple;
use nom::IResult;

use crate::error::{DictionaryError, Result};
use crate::word::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFlag {
  Normal,
  Begin,
  End,
  Split,
}

impl RuleFlag {
  fn to_digit(self) -> u8 {
    match self {
      RuleFlag::Normal => 0,
      RuleFlag::Begin => 1,
      RuleFlag::End => 2,
      RuleFlag::Split => 3,
    }
  }

  fn from_digit(d: u8) -> Option<Self> {
    match d {
      0 => Some(RuleFlag::Normal),
      1 => Some(RuleFlag::Begin),
      2 => Some(RuleFlag::End),
      3 => Some(RuleFlag::Split),
      _ => None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Rule {
  pub left: Vec<char>,
  pub right: Vec<char>,
  pub cost: u32,
  pub flag: RuleFlag,
}

fn is_placeholder(c: char) -> bool {
  c.is_ascii_digit()
}

fn validate(left: &[char], right: &[char], flag: RuleFlag) -> Result<()> {
  if left.is_empty() && right.is_empty() && flag != RuleFlag::Split {
    return Err(DictionaryError::MalformedRule(
      "a rule with an empty left and right side must carry the Split flag".into(),
    ));
  }
  let left_placeholders: HashSet<char> =
    left.iter().copied().filter(|&c| is_placeholder(c)).collect();
  let orphans = right
    .iter()
    .filter(|&&c| is_placeholder(c) && !left_placeholders.contains(&c))
    .count();
  if orphans > 1 {
    return Err(DictionaryError::MalformedRule(format!(
      "right side introduces {orphans} placeholders absent from the left; at most one is allowed"
    )));
  }
  Ok(())
}

/// A rule matched at a given suffix position, with its placeholder
/// bindings already resolved. This is the payload `preprocess` hands to
/// the hint search so its inner loop never re-scans a rule's left side.
#[derive(Debug, Clone)]
pub struct RuleMatch {
  pub rule_index: usize,
  pub bindings: HashMap<char, char>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
  rules: Vec<Rule>,
}

impl RuleSet {
  pub fn new() -> Self {
    RuleSet { rules: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn clear(&mut self) {
    self.rules.clear();
  }

  pub fn get(&self, index: usize) -> &Rule {
    &self.rules[index]
  }

  pub fn iter(&self) -> impl Iterator<Item = &Rule> {
    self.rules.iter()
  }

  /// Adds a single rule (one direction only; bidirectional expansion is
  /// the dictionary facade's concern, since it may need to validate and
  /// insert two independent rules).
  pub fn add(&mut self, left: Vec<char>, right: Vec<char>, cost: u32, flag: RuleFlag) -> Result<()> {
    validate(&left, &right, flag)?;
    self.rules.push(Rule { left, right, cost, flag });
    Ok(())
  }

  fn matches_at(left: &[char], word: &Word, i: usize) -> Option<HashMap<char, char>> {
    if left.is_empty() {
      return Some(HashMap::new());
    }
    let chars = word.chars();
    if i + left.len() > chars.len() {
      return None;
    }
    let mut bindings = HashMap::new();
    for (j, &lc) in left.iter().enumerate() {
      let wc = chars[i + j];
      if is_placeholder(lc) {
        match bindings.get(&lc) {
          Some(&bound) if bound != wc => return None,
          _ => {
            bindings.insert(lc, wc);
          }
        }
      } else if lc != wc {
        return None;
      }
    }
    Some(bindings)
  }

  /// For every suffix-start index of `word`, the list of rules whose
  /// left-hand side matches there, bindings already resolved.
  ///
  /// Indexed `0..=word.len()` inclusive, not just `0..word.len()`: a rule
  /// with an empty left side (a pure insertion) is the one kind of rule
  /// that can still match at the position just past the last character,
  /// appending to the end of the word rather than editing inside it.
  /// `matches_at`'s bounds check rejects any non-empty-left rule there.
  pub fn preprocess(&self, word: &Word) -> Vec<Vec<RuleMatch>> {
    let n = word.len();
    let mut table = vec![Vec::new(); n + 1];
    for i in 0..=n {
      for (rule_index, rule) in self.rules.iter().enumerate() {
        if let Some(bindings) = Self::matches_at(&rule.left, word, i) {
          table[i].push(RuleMatch { rule_index, bindings });
        }
      }
    }
    table
  }

  fn token(input: &str) -> IResult<&str, Vec<char>> {
    alt((
      value(Vec::new(), nchar('*')),
      many0(none_of(" \n")),
    ))(input)
  }

  fn line(input: &str) -> IResult<&str, (Vec<char>, Vec<char>, u32, RuleFlag)> {
    map_res(
      tuple((
        Self::token,
        space1,
        Self::token,
        space1,
        digit1,
        space1,
        digit1,
      )),
      |(left, _, right, _, cost, _, flag): (_, _, _, _, &str, _, &str)| {
        let cost: u32 = cost.parse().map_err(|_| "bad cost")?;
        let flag_digit: u8 = flag.parse().map_err(|_| "bad flag")?;
        let flag = RuleFlag::from_digit(flag_digit).ok_or("unknown flag digit")?;
        Ok::<_, &'static str>((left, right, cost, flag))
      },
    )(input)
  }

  /// Loads the `<count>\n(<left> <right> <cost> <flag>\n)*` rule-file
  /// grammar described in DESIGN.md, grounded on `rules_list_load`.
  pub fn load(&mut self, r: &mut impl Read) -> Result<()> {
    let mut contents = String::new();
    r.read_to_string(&mut contents)?;
    let mut lines = contents.lines();
    let count: usize = lines
      .next()
      .ok_or_else(|| DictionaryError::MalformedRule("empty rule file".into()))?
      .trim()
      .parse()
      .map_err(|_| DictionaryError::MalformedRule("missing rule count".into()))?;
    for _ in 0..count {
      let line = lines
        .next()
        .ok_or_else(|| DictionaryError::MalformedRule("rule file truncated".into()))?;
      let (_, (left, right, cost, flag)) = Self::line(line)
        .map_err(|e| DictionaryError::MalformedRule(format!("unparsable rule line: {e}")))?;
      self.add(left, right, cost, flag)?;
    }
    Ok(())
  }

  pub fn save(&self, w: &mut impl Write) -> Result<()> {
    writeln!(w, "{}", self.rules.len())?;
    for rule in &self.rules {
      let left: String = if rule.left.is_empty() { "*".into() } else { rule.left.iter().collect() };
      let right: String =
        if rule.right.is_empty() { "*".into() } else { rule.right.iter().collect() };
      writeln!(w, "{left} {right} {} {}", rule.cost, rule.flag.to_digit())?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_empty_to_empty_without_split() {
    let mut rs = RuleSet::new();
    assert!(rs.add(vec![], vec![], 1, RuleFlag::Normal).is_err());
    assert!(rs.add(vec![], vec![], 2, RuleFlag::Split).is_ok());
  }

  #[test]
  fn rejects_multiple_orphan_placeholders() {
    let mut rs = RuleSet::new();
    assert!(rs.add(vec!['0'], vec!['1', '2'], 1, RuleFlag::Normal).is_err());
    assert!(rs.add(vec!['0'], vec!['0'], 1, RuleFlag::Normal).is_ok());
    assert!(rs.add(vec![], vec!['1'], 1, RuleFlag::Normal).is_ok());
  }

  #[test]
  fn preprocess_finds_literal_and_placeholder_matches() {
    let mut rs = RuleSet::new();
    rs.add(vec!['t'], vec![], 1, RuleFlag::Normal).unwrap();
    rs.add(vec!['0'], vec!['1'], 1, RuleFlag::Normal).unwrap();
    let word = Word::from("test");
    let table = rs.preprocess(&word);
    assert_eq!(table.len(), 5);
    // position 0 is 't': both the literal rule and the placeholder rule match.
    assert_eq!(table[0].len(), 2);
    let placeholder_match = table[0].iter().find(|m| m.rule_index == 1).unwrap();
    assert_eq!(placeholder_match.bindings.get(&'0'), Some(&'t'));
  }

  #[test]
  fn save_then_load_roundtrips() {
    let mut rs = RuleSet::new();
    rs.add(vec!['0'], vec![], 1, RuleFlag::Normal).unwrap();
    rs.add(vec![], vec!['0'], 1, RuleFlag::Normal).unwrap();
    rs.add(vec![], vec![], 2, RuleFlag::Split).unwrap();
    let mut buf = Vec::new();
    rs.save(&mut buf).unwrap();
    let mut loaded = RuleSet::new();
    loaded.load(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.get(0).left, vec!['0']);
    assert_eq!(loaded.get(2).flag, RuleFlag::Split);
  }
}
