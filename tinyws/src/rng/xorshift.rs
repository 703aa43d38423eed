use crate::rng::Rng;
use alloc::boxed::Box;
use core::{
  panic::Location,
  sync::atomic::{AtomicUsize, Ordering},
};

/// Xorshift that deals with 64 bits numbers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Xorshift64 {
  value: u64,
}

impl Xorshift64 {
  /// Constructor
  #[inline]
  pub const fn new(value: u64) -> Self {
    Self { value }
  }
}

impl Rng for Xorshift64 {
  #[inline]
  fn u8_4(&mut self) -> [u8; 4] {
    let [a, b, c, d, e, f, g, h] = xor_numbers(&mut self.value).to_le_bytes();
    [a ^ e, b ^ f, c ^ g, d ^ h]
  }

  #[inline]
  fn u8_16(&mut self) -> [u8; 16] {
    let [a, b, c, d, e, f, g, h] = xor_numbers(&mut self.value).to_be_bytes();
    let [i, j, k, l, m, n, o, p] = xor_numbers(&mut self.value).to_be_bytes();
    [a, b, c, d, e, f, g, h, i, j, k, l, m, n, o, p]
  }
}

impl From<u64> for Xorshift64 {
  #[inline]
  fn from(value: u64) -> Self {
    // Small seeds take a few rounds to spread their bits and a zeroed state only produces
    // zeroes.
    let mixed = mix(value, 0);
    Self { value: if mixed == 0 { 0x9E37_79B9_7F4A_7C15 } else { mixed } }
  }
}

/// Fast seed that doesn't depend on any operating system facility.
///
/// Mixes a heap address, a global counter and the caller location. Good enough for masking keys
/// but you probably shouldn't use it for anything related to cryptography.
#[inline]
#[track_caller]
pub fn simple_seed() -> u64 {
  static COUNTER: AtomicUsize = AtomicUsize::new(0);
  let heap = Box::new(1u8);
  let location = Location::caller();
  let ptr_addr = &*heap as *const u8 as usize;
  let mut seed = ptr_addr as u64;
  seed = mix(seed, COUNTER.fetch_add(1, Ordering::Relaxed) as u64);
  seed = mix(seed, u64::from(location.column().wrapping_add(location.line())));
  seed
}

const fn mix(mut seed: u64, value: u64) -> u64 {
  seed ^= value.wrapping_mul(0x9E37_79B9_7F4A_7C15);
  seed = (seed ^ (seed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  seed = (seed ^ (seed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  seed ^ (seed >> 31)
}

const fn xor_numbers(seed: &mut u64) -> u64 {
  *seed ^= *seed << 13;
  *seed ^= *seed >> 17;
  *seed ^= *seed << 5;
  *seed
}

#[cfg(test)]
mod tests {
  use crate::rng::{simple_seed, Rng, Xorshift64};

  #[test]
  fn same_seed_same_sequence() {
    let mut first = Xorshift64::from(123);
    let mut second = Xorshift64::from(123);
    assert_eq!(first.u8_16(), second.u8_16());
    assert_eq!(first.u8_4(), second.u8_4());
  }

  #[test]
  fn zeroed_seed_still_generates_numbers() {
    let mut rng = Xorshift64::from(0);
    assert_ne!(rng.u8_16(), [0; 16]);
  }

  #[test]
  fn simple_seeds_differ() {
    assert_ne!(simple_seed(), simple_seed());
  }
}
