use crate::web_socket::{
  read_frame_info::ReadFrameInfo, unmask, web_socket_writer::encode_frame, OpCode,
};
use alloc::vec::Vec;

/// Represents a WebSocket frame.
///
/// The payload is always stored unmasked. `mask` only tells which key was or will be used on the
/// wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
  fin: bool,
  mask: Option<[u8; 4]>,
  op_code: OpCode,
  payload: Vec<u8>,
}

impl Frame {
  /// Creates a new instance with the given parameters.
  #[inline]
  pub fn new(fin: bool, mask: Option<[u8; 4]>, op_code: OpCode, payload: Vec<u8>) -> Self {
    Self { fin, mask, op_code, payload }
  }

  /// Final and unmasked frame.
  #[inline]
  pub fn new_fin(op_code: OpCode, payload: Vec<u8>) -> Self {
    Self::new(true, None, op_code, payload)
  }

  /// Unfinished and unmasked frame.
  #[inline]
  pub fn new_unfin(op_code: OpCode, payload: Vec<u8>) -> Self {
    Self::new(false, None, op_code, payload)
  }

  /// Decodes a single frame from the beginning of `bytes`, advancing it past the frame.
  #[inline]
  pub fn decode(bytes: &mut &[u8], max_payload_len: usize) -> crate::Result<Self> {
    let info = ReadFrameInfo::from_bytes(bytes, max_payload_len)?;
    let Some((payload, rest)) = bytes.split_at_checked(info.payload_len) else {
      return Err(crate::Error::UnexpectedBufferState);
    };
    *bytes = rest;
    let mut payload = payload.to_vec();
    if let Some(mask) = info.mask {
      unmask(&mut payload, mask);
    }
    Ok(Self { fin: info.fin, mask: info.mask, op_code: info.op_code, payload })
  }

  /// Appends the wire representation of this frame into `buffer`.
  #[inline]
  pub fn encode(&self, buffer: &mut Vec<u8>) {
    encode_frame(buffer, self.fin, self.mask, self.op_code, &self.payload);
  }

  /// Indicates if this is the final frame in a message.
  #[inline]
  pub fn fin(&self) -> bool {
    self.fin
  }

  /// Masking key
  #[inline]
  pub fn mask(&self) -> Option<[u8; 4]> {
    self.mask
  }

  /// See [`OpCode`].
  #[inline]
  pub fn op_code(&self) -> OpCode {
    self.op_code
  }

  /// Unmasked frame payload.
  #[inline]
  pub fn payload(&self) -> &[u8] {
    &self.payload
  }

  /// Owned payload
  #[inline]
  pub fn into_payload(self) -> Vec<u8> {
    self.payload
  }
}

#[cfg(test)]
mod tests {
  use crate::web_socket::{Frame, OpCode, WebSocketError};
  use alloc::{vec, vec::Vec};

  #[test]
  fn length_classes() {
    for (len, header_len, len_code) in
      [(0, 2, 0), (1, 2, 1), (125, 2, 125), (126, 4, 126), (65535, 4, 126), (65536, 10, 127)]
    {
      let frame = Frame::new_fin(OpCode::Binary, vec![7; len]);
      let mut buffer = Vec::new();
      frame.encode(&mut buffer);
      assert_eq!(buffer.len(), header_len + len);
      assert_eq!(buffer[0], 0b1000_0010);
      assert_eq!(buffer[1], len_code);
      match len_code {
        126 => assert_eq!(u16::from_be_bytes([buffer[2], buffer[3]]), len as u16),
        127 => assert_eq!(u64::from_be_bytes(buffer[2..10].try_into().unwrap()), len as u64),
        _ => {}
      }
      let mut bytes = buffer.as_slice();
      assert_eq!(Frame::decode(&mut bytes, usize::MAX).unwrap(), frame);
      assert!(bytes.is_empty());
    }
  }

  #[test]
  fn masked_frames_are_decoded_back() {
    for len in [0, 1, 125, 126, 65535, 65536] {
      let payload = (0..len).map(|idx| idx as u8).collect::<Vec<_>>();
      let frame = Frame::new(false, Some([1, 2, 3, 4]), OpCode::Text, payload);
      let mut buffer = Vec::new();
      frame.encode(&mut buffer);
      assert_eq!(buffer[1] & 0b1000_0000, 0b1000_0000);
      let mut bytes = buffer.as_slice();
      assert_eq!(Frame::decode(&mut bytes, usize::MAX).unwrap(), frame);
    }
  }

  #[test]
  fn zeroed_mask_leaves_payload_untouched() {
    let frame = Frame::new(true, Some([0; 4]), OpCode::Text, b"abc".to_vec());
    let mut buffer = Vec::new();
    frame.encode(&mut buffer);
    assert_eq!(buffer, [0b1000_0001, 0b1000_0011, 0, 0, 0, 0, b'a', b'b', b'c']);
  }

  #[test]
  fn non_minimal_lengths_are_accepted() {
    let mut buffer = vec![0b1000_0001, 127, 0, 0, 0, 0, 0, 0, 0, 2, b'h', b'i'];
    buffer.extend_from_slice(&[0b1000_0001, 126, 0, 1, b'!']);
    let mut bytes = buffer.as_slice();
    assert_eq!(Frame::decode(&mut bytes, usize::MAX).unwrap().payload(), b"hi");
    assert_eq!(Frame::decode(&mut bytes, usize::MAX).unwrap().payload(), b"!");
  }

  #[test]
  fn invalid_headers() {
    let cases: [(&[u8], fn(&WebSocketError) -> bool); 4] = [
      (&[0b1100_0001, 0], |err| matches!(err, WebSocketError::ReservedBitsAreNotZero)),
      (&[0b0000_1001, 0], |err| matches!(err, WebSocketError::UnexpectedFragmentedControlFrame)),
      (&[0b1000_1001, 126, 0, 126], |err| matches!(err, WebSocketError::VeryLargeControlFrame)),
      (&[0b1000_0011, 0], |err| matches!(err, WebSocketError::InvalidOpCodeByte { provided: 3 })),
    ];
    for (mut bytes, is_expected) in cases {
      let err = Frame::decode(&mut bytes, usize::MAX).unwrap_err();
      assert!(is_expected(err.web_socket_error().unwrap()));
    }
  }

  #[test]
  fn payload_ceiling() {
    let mut bytes = &[0b1000_0010, 126, 0, 200][..];
    let err = Frame::decode(&mut bytes, 199).unwrap_err();
    assert!(matches!(err.web_socket_error(), Some(WebSocketError::VeryLargePayload)));
  }

  #[test]
  fn truncated_frames() {
    assert!(Frame::decode(&mut &[0b1000_0010][..], usize::MAX).is_err());
    assert!(Frame::decode(&mut &[0b1000_0010, 3, 1][..], usize::MAX).is_err());
  }
}
