//! End-to-end scenarios and universal invariants, run against the public
//! `Dictionary` facade.

use rand::{thread_rng, Rng};
use tempfile::NamedTempFile;

use spelltrie::rule::RuleFlag;
use spelltrie::{Dictionary, Word};

fn dict_with(words: &[&str]) -> Dictionary {
  let mut d = Dictionary::new();
  for w in words {
    d.insert(&Word::from(*w)).unwrap();
  }
  d
}

#[test]
fn invariant_insert_then_find() {
  let mut rng = thread_rng();
  for _ in 0..200 {
    let word: Word = rng.gen();
    let mut d = Dictionary::new();
    d.insert(&word).unwrap();
    assert!(d.find(&word));
  }
}

#[test]
fn invariant_insert_delete_then_not_found() {
  let mut rng = thread_rng();
  for _ in 0..200 {
    let word: Word = rng.gen();
    let mut d = Dictionary::new();
    d.insert(&word).unwrap();
    assert!(d.delete(&word));
    assert!(!d.find(&word));
  }
}

#[test]
fn invariant_double_insert_counts_once() {
  let mut d = Dictionary::new();
  assert!(d.insert(&Word::from("repeat")).unwrap());
  assert!(!d.insert(&Word::from("repeat")).unwrap());
  assert!(d.delete(&Word::from("repeat")));
  assert!(!d.delete(&Word::from("repeat")));
}

#[test]
fn membership_on_a_small_dictionary() {
  let d = dict_with(&["test", "abrakadabra", "cat"]);
  assert!(d.find(&Word::from("test")));
  assert!(!d.find(&Word::from("tester")));
  assert!(!d.find(&Word::from("")));
}

#[test]
fn save_load_roundtrip_through_a_real_file() {
  let d = dict_with(&["te", "test", "cat", "abrakadabra"]);
  let mut file = NamedTempFile::new().unwrap();
  d.save(file.as_file_mut()).unwrap();

  let mut reopened = file.reopen().unwrap();
  let loaded = Dictionary::load(&mut reopened).unwrap();
  for w in ["te", "test", "cat", "abrakadabra"] {
    assert!(loaded.find(&Word::from(w)));
  }
  assert!(!loaded.find(&Word::from("te s")));
}

#[test]
fn empty_rule_set_yields_no_hints_beyond_exact_matches() {
  // With no rules configured, the layered search produces no hints at
  // all (rules are what drive every edge in the state space beyond
  // exact matches).
  let d = dict_with(&["test"]);
  let hints = d.hints(&Word::from("tent")).unwrap();
  assert!(hints.is_empty());
}

#[test]
fn single_edit_rule_triple_recovers_delete_substitute_insert() {
  let mut d = dict_with(&["test", "tess", "pest", "tes"]);
  d.rule_add(vec!['0'], vec![], false, 1, RuleFlag::Normal).unwrap();
  d.rule_add(vec!['0'], vec!['1'], false, 1, RuleFlag::Normal).unwrap();
  d.rule_add(vec![], vec!['0'], false, 1, RuleFlag::Normal).unwrap();
  d.cost_max_set(1);

  let hints = d.hints(&Word::from("test")).unwrap();
  let strings: Vec<String> = hints.iter().map(ToString::to_string).collect();
  for expect in ["tess", "pest", "test", "tes"] {
    assert!(strings.contains(&expect.to_string()), "missing {expect} in {strings:?}");
  }
}

#[test]
fn hint_invariant_sorted_no_duplicates_and_all_findable() {
  let mut d = dict_with(&["test", "tess", "pest", "best", "rest"]);
  d.rule_add(vec!['0'], vec!['1'], false, 1, RuleFlag::Normal).unwrap();
  d.cost_max_set(2);

  let hints = d.hints(&Word::from("zest")).unwrap();
  let strings: Vec<String> = hints.iter().map(ToString::to_string).collect();
  let mut sorted = strings.clone();
  sorted.sort();
  sorted.dedup();
  assert_eq!(strings, sorted);
  for h in hints.iter() {
    assert!(d.find(h));
  }
}

#[test]
fn rule_add_rejects_malformed_rules() {
  let mut d = Dictionary::new();
  assert!(d.rule_add(vec![], vec![], false, 1, RuleFlag::Normal).is_err());
  assert!(d.rule_add(vec!['0'], vec!['1', '2'], false, 1, RuleFlag::Normal).is_err());
  assert!(d.rule_add(vec!['a'], vec!['b'], false, 1, RuleFlag::Normal).is_ok());
}

#[test]
fn rule_clear_empties_the_rule_set() {
  let mut d = Dictionary::new();
  d.rule_add(vec!['a'], vec!['b'], false, 1, RuleFlag::Normal).unwrap();
  assert_eq!(d.rule_count(), 1);
  d.rule_clear();
  assert_eq!(d.rule_count(), 0);
}
