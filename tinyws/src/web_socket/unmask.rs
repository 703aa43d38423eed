/// XORs `bytes` with `mask`. Applying the same mask twice yields the original bytes.
#[inline]
pub fn unmask(bytes: &mut [u8], mask: [u8; 4]) {
  let mask_u32 = u32::from_ne_bytes(mask);
  let mut chunks = bytes.chunks_exact_mut(4);
  for chunk in &mut chunks {
    if let [a, b, c, d] = chunk {
      let [e, f, g, h] = (u32::from_ne_bytes([*a, *b, *c, *d]) ^ mask_u32).to_ne_bytes();
      *a = e;
      *b = f;
      *c = g;
      *d = h;
    }
  }
  for (elem, mask_byte) in chunks.into_remainder().iter_mut().zip(mask) {
    *elem ^= mask_byte;
  }
}
