//! Random Number Generators
//!
//! Randomness is always provided by the caller. The opening handshake uses 16 bytes for the
//! `Sec-WebSocket-Key` header and every masked frame uses 4 bytes for its masking key.

#[cfg(feature = "rand")]
mod rand;
#[cfg(feature = "std")]
mod std;
mod xorshift;

#[cfg(feature = "std")]
pub use self::std::StdRng;
pub use xorshift::{simple_seed, Xorshift64};

/// Abstraction tailored for the needs of this project. Each implementation should manage how
/// seeds are retrieved as well as how numbers are generated.
pub trait Rng {
  /// Creates an array of 4 bytes.
  fn u8_4(&mut self) -> [u8; 4];

  /// Creates an array of 16 bytes.
  fn u8_16(&mut self) -> [u8; 16];
}

impl<T> Rng for &mut T
where
  T: Rng,
{
  #[inline]
  fn u8_4(&mut self) -> [u8; 4] {
    (*self).u8_4()
  }

  #[inline]
  fn u8_16(&mut self) -> [u8; 16] {
    (*self).u8_16()
  }
}
