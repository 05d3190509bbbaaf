//! Random word generation for property-style tests: a geometric-length
//! distribution over plain lowercase ASCII characters.

use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::word::Word;

impl Word {
  /// `group_p` is the geometric distribution's continuation probability;
  /// `max_len` caps the otherwise-unbounded tail.
  pub fn random<R: Rng + ?Sized>(rng: &mut R, group_p: f64, max_len: usize) -> Word {
    let geo_len = rng.gen::<f64>().log(group_p).floor();
    let len = (geo_len as usize).min(max_len);
    (0..len).map(|_| (b'a' + rng.gen_range(0..26)) as char).collect()
  }
}

impl Distribution<Word> for Standard {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Word {
    Word::random(rng, 0.9, 12)
  }
}
