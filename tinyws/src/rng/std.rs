use crate::rng::{Rng, Xorshift64};
use std::{
  collections::hash_map::RandomState,
  hash::{BuildHasher, Hasher},
};

/// Derived from the tools provided by the standard library, uses a simple XOR strategy.
#[derive(Debug)]
pub struct StdRng(Xorshift64);

impl Rng for StdRng {
  #[inline]
  fn u8_4(&mut self) -> [u8; 4] {
    self.0.u8_4()
  }

  #[inline]
  fn u8_16(&mut self) -> [u8; 16] {
    self.0.u8_16()
  }
}

impl Default for StdRng {
  #[inline]
  fn default() -> Self {
    Self(Xorshift64::from(Hasher::finish(&BuildHasher::build_hasher(&RandomState::new()))))
  }
}
