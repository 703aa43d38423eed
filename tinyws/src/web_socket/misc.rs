use crate::web_socket::{OpCode, MASK_MASK, MAX_HEADER_LEN, OP_CODE_MASK};

/// Writes the base header and the extended length. Returns the number of written bytes.
///
/// The mask bit and the masking key are up to the caller.
pub(crate) fn fill_header_from_params(
  fin: bool,
  header: &mut [u8; MAX_HEADER_LEN],
  op_code: OpCode,
  payload_len: usize,
) -> usize {
  fn first_header_byte(fin: bool, op_code: OpCode) -> u8 {
    (u8::from(fin) << 7) | u8::from(op_code)
  }

  match payload_len {
    0..=125 => {
      let [a, b, ..] = header;
      *a = first_header_byte(fin, op_code);
      *b = u8::try_from(payload_len).unwrap_or_default();
      2
    }
    126..=0xFFFF => {
      let [len_c, len_d] = u16::try_from(payload_len).map(u16::to_be_bytes).unwrap_or_default();
      let [a, b, c, d, ..] = header;
      *a = first_header_byte(fin, op_code);
      *b = 126;
      *c = len_c;
      *d = len_d;
      4
    }
    _ => {
      let len = u64::try_from(payload_len).map(u64::to_be_bytes).unwrap_or_default();
      let [a, b, rest @ ..] = header;
      *a = first_header_byte(fin, op_code);
      *b = 127;
      if let Some(ext) = rest.get_mut(..8) {
        ext.copy_from_slice(&len);
      }
      10
    }
  }
}

pub(crate) const fn has_masked_frame(second_header_byte: u8) -> bool {
  second_header_byte & MASK_MASK != 0
}

pub(crate) fn op_code(first_header_byte: u8) -> crate::Result<OpCode> {
  OpCode::try_from(first_header_byte & OP_CODE_MASK)
}
