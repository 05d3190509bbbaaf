//! The cost-layered hint search, the centerpiece of the engine.
//!
//! States carry their accumulated output directly, with no predecessor
//! chain to walk. A global "already discovered" set stands in for a
//! post-hoc sort-and-filter pass: since layers are built in
//! non-decreasing cost order, the first time a `(suffix position,
//! accumulated)` pair is discovered is its cheapest discovery, so
//! discarding every later rediscovery as it's produced is equivalent to
//! filtering the whole batch at once, without ever growing a layer past
//! its final size.
//!
//! A `suffix` is always some `word[pos..]` of the original input. No
//! rule or free-expansion step ever prepends characters, so a `State`
//! stores the index `pos` rather than a cloned character slice.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::DICTIONARY_MAX_HINTS;
use crate::error::Result;
use crate::rule::{Rule, RuleFlag, RuleSet};
use crate::trie::{NodeId, Trie};
use crate::word::Word;
use crate::word_list::WordList;

#[derive(Debug, Clone)]
struct State {
  pos: usize,
  node: NodeId,
  accumulated: Word,
  cost: u32,
}

/// Zero-cost transitive closure over matching trie edges. Every state
/// reachable from `seeds` this way is folded into `layer`, skipping
/// anything already present in `seen`.
fn expand_closure(
  trie: &Trie,
  word: &Word,
  seen: &mut HashSet<(usize, Word)>,
  seeds: Vec<State>,
  layer: &mut Vec<State>,
) {
  let chars = word.chars();
  let mut queue: VecDeque<State> = seeds.into();
  while let Some(s) = queue.pop_front() {
    let key = (s.pos, s.accumulated.clone());
    if seen.contains(&key) {
      continue;
    }
    seen.insert(key);

    if s.pos < chars.len() {
      let x = chars[s.pos];
      if let Some(child) = trie.child(s.node, x) {
        // Always continue, even onto the final character landing on a
        // non-terminal node: that "every original character consumed"
        // state is still needed as a base for an empty-left (insertion)
        // rule match at `word.len()`.
        let mut acc = s.accumulated.clone();
        acc.push(x);
        queue.push_back(State { pos: s.pos + 1, node: child, accumulated: acc, cost: s.cost });
      }
    }
    layer.push(s);
  }
}

/// Walks `right` from `start`, substituting each placeholder with its
/// bound character or, for the one placeholder absent from the rule's
/// left side, branching once per child of the trie node reached at that
/// point. Returns every `(substituted right, end node)` pair for which
/// every character matched a trie edge.
fn walk_right(
  trie: &Trie,
  start: NodeId,
  right: &[char],
  bindings: &HashMap<char, char>,
) -> Vec<(Vec<char>, NodeId)> {
  let mut frontier = vec![(Vec::new(), start)];
  for &rc in right {
    if frontier.is_empty() {
      break;
    }
    let mut next = Vec::new();
    if rc.is_ascii_digit() {
      if let Some(&bound) = bindings.get(&rc) {
        for (acc, node) in &frontier {
          if let Some(child) = trie.child(*node, bound) {
            let mut acc2 = acc.clone();
            acc2.push(bound);
            next.push((acc2, child));
          }
        }
      } else {
        for (acc, node) in &frontier {
          for (edge, child) in trie.children(*node) {
            let mut acc2 = acc.clone();
            acc2.push(edge);
            next.push((acc2, child));
          }
        }
      }
    } else {
      for (acc, node) in &frontier {
        if let Some(child) = trie.child(*node, rc) {
          let mut acc2 = acc.clone();
          acc2.push(rc);
          next.push((acc2, child));
        }
      }
    }
    frontier = next;
  }
  frontier
}

fn apply_rule(
  trie: &Trie,
  s: &State,
  rule: &Rule,
  bindings: &HashMap<char, char>,
  word_len: usize,
) -> Vec<State> {
  if rule.flag == RuleFlag::Begin && !(s.pos == 0 && s.node == trie.root()) {
    return Vec::new();
  }

  let mut out = Vec::new();
  for (right_chars, end_node) in walk_right(trie, s.node, &rule.right, bindings) {
    // End's scope predicate is stricter than Split's: the consumed suffix
    // must be *exactly* `left`, i.e. this application must exhaust the
    // remaining input, not merely land on a Terminal node partway through.
    let scope_ok = match rule.flag {
      RuleFlag::Normal | RuleFlag::Begin => true,
      RuleFlag::Split => trie.is_terminal(end_node),
      RuleFlag::End => trie.is_terminal(end_node) && s.pos + rule.left.len() == word_len,
    };
    if !scope_ok {
      continue;
    }

    let mut accumulated = s.accumulated.clone();
    for &c in &right_chars {
      accumulated.push(c);
    }
    let mut node = end_node;
    if rule.flag == RuleFlag::Split {
      accumulated.push(' ');
      node = trie.root();
    }

    out.push(State {
      pos: s.pos + rule.left.len(),
      node,
      accumulated,
      cost: s.cost + rule.cost,
    });
  }
  out
}

/// Enumerates every dictionary word reachable from `word` within
/// `cost_max`. Layers are built in non-decreasing cost order, so the
/// truncation to `DICTIONARY_MAX_HINTS` below always keeps the cheapest
/// candidates. The emitted set is then handed to a `WordList`, which
/// re-sorts it into collation order for the caller.
pub fn search(trie: &Trie, rules: &RuleSet, word: &Word, cost_max: u32) -> Result<WordList> {
  let preprocessed = rules.preprocess(word);
  let mut seen: HashSet<(usize, Word)> = HashSet::new();
  let mut layers: Vec<Vec<State>> = (0..=cost_max as usize).map(|_| Vec::new()).collect();

  let seed = State { pos: 0, node: trie.root(), accumulated: Word::new(), cost: 0 };
  expand_closure(trie, word, &mut seen, vec![seed], &mut layers[0]);

  for k in 1..=cost_max as usize {
    let mut produced = Vec::new();
    for i in 1..=k {
      let src = k - i;
      for s in &layers[src] {
        if s.pos == word.len() && trie.is_terminal(s.node) {
          continue;
        }
        let Some(matches) = preprocessed.get(s.pos) else { continue };
        for rule_match in matches {
          let rule = rules.get(rule_match.rule_index);
          if rule.cost as usize != i {
            continue;
          }
          produced.extend(apply_rule(trie, s, rule, &rule_match.bindings, word.len()));
        }
      }
    }
    expand_closure(trie, word, &mut seen, produced, &mut layers[k]);
  }

  let mut emitted = Vec::new();
  'layers: for layer in &layers {
    for s in layer {
      if s.pos == word.len() && trie.is_terminal(s.node) {
        emitted.push(s.accumulated.clone());
        if emitted.len() >= DICTIONARY_MAX_HINTS {
          break 'layers;
        }
      }
    }
  }

  let mut hints = WordList::new();
  for w in emitted {
    hints.add(w)?;
  }
  Ok(hints)
}
