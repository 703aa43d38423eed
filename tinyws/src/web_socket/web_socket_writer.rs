use crate::{
  transport::Transport,
  web_socket::{misc::fill_header_from_params, unmask, OpCode, MASK_MASK, MAX_HEADER_LEN},
};
use alloc::vec::Vec;

/// Appends the header, the optional masking key and the (possibly masked) payload.
///
/// An all-zero key skips the XOR pass.
pub(crate) fn encode_frame(
  buffer: &mut Vec<u8>,
  fin: bool,
  mask: Option<[u8; 4]>,
  op_code: OpCode,
  payload: &[u8],
) {
  let mut header = [0; MAX_HEADER_LEN];
  let mut header_len = fill_header_from_params(fin, &mut header, op_code, payload.len());
  if let Some(local_mask) = mask {
    let [_, b, ..] = &mut header;
    *b |= MASK_MASK;
    if let Some(key) = header.get_mut(header_len..header_len.wrapping_add(4)) {
      key.copy_from_slice(&local_mask);
    }
    header_len = header_len.wrapping_add(4);
  }
  buffer.reserve(header_len.wrapping_add(payload.len()));
  buffer.extend_from_slice(header.get(..header_len).unwrap_or_default());
  let payload_start = buffer.len();
  buffer.extend_from_slice(payload);
  if let Some(local_mask) = mask {
    if local_mask != [0; 4] {
      unmask(buffer.get_mut(payload_start..).unwrap_or_default(), local_mask);
    }
  }
}

/// Encodes into `buffer` and writes everything with a single call.
pub(crate) fn write_frame<T>(
  buffer: &mut Vec<u8>,
  fin: bool,
  mask: Option<[u8; 4]>,
  op_code: OpCode,
  payload: &[u8],
  transport: &mut T,
) -> crate::Result<()>
where
  T: Transport,
{
  buffer.clear();
  encode_frame(buffer, fin, mask, op_code, payload);
  _trace!(fin, is_masked = mask.is_some(), ?op_code, payload_len = payload.len(), "Sending frame");
  transport.write_all(buffer)
}
