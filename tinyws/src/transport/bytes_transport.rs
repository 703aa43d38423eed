use crate::{misc::ConnectionState, transport::Transport};
use alloc::vec::Vec;

/// In-memory transport. Reads consume `input` and writes are appended to `output`.
///
/// Useful for tests and for hosts that receive whole buffers from somewhere else.
#[derive(Debug)]
pub struct BytesTransport {
  chunk_len: usize,
  idx: usize,
  input: Vec<u8>,
  output: Vec<u8>,
  state: ConnectionState,
}

impl BytesTransport {
  /// Opened instance that will yield `input` when read.
  #[inline]
  pub fn new(input: Vec<u8>) -> Self {
    Self { chunk_len: usize::MAX, idx: 0, input, output: Vec::new(), state: ConnectionState::Open }
  }

  /// Each read returns at most `chunk_len` bytes, emulating short reads.
  #[inline]
  #[must_use]
  pub fn with_chunk_len(mut self, chunk_len: usize) -> Self {
    self.chunk_len = chunk_len.max(1);
    self
  }

  /// Bytes that weren't read yet.
  #[inline]
  pub fn input(&self) -> &[u8] {
    self.input.get(self.idx..).unwrap_or_default()
  }

  /// Everything that was written.
  #[inline]
  pub fn output(&self) -> &[u8] {
    &self.output
  }

  /// Appends more bytes that will be yielded by subsequent reads.
  #[inline]
  pub fn push_input(&mut self, bytes: &[u8]) {
    self.input.extend_from_slice(bytes);
  }

  /// Returns and clears everything that was written.
  #[inline]
  pub fn take_output(&mut self) -> Vec<u8> {
    core::mem::take(&mut self.output)
  }
}

impl Default for BytesTransport {
  #[inline]
  fn default() -> Self {
    Self::new(Vec::new())
  }
}

impl Transport for BytesTransport {
  #[inline]
  fn close(&mut self) {
    if self.state.close() {
      _trace!("In-memory transport closed");
    }
  }

  #[inline]
  fn has_data(&mut self) -> bool {
    self.state.is_open() && !self.input().is_empty()
  }

  #[inline]
  fn is_open(&self) -> bool {
    self.state.is_open()
  }

  #[inline]
  fn read(&mut self, bytes: &mut [u8]) -> crate::Result<usize> {
    self.state.ensure_open(crate::Error::UnexpectedStreamReadEOF)?;
    let working = self.input();
    if working.is_empty() {
      // Nothing else will ever arrive.
      let _ = self.state.close();
      return Ok(0);
    }
    let len = working.len().min(bytes.len()).min(self.chunk_len);
    bytes.get_mut(..len).unwrap_or_default().copy_from_slice(working.get(..len).unwrap_or_default());
    self.idx = self.idx.wrapping_add(len);
    Ok(len)
  }

  #[inline]
  fn write_all(&mut self, bytes: &[u8]) -> crate::Result<()> {
    self.state.ensure_open(crate::Error::UnexpectedStreamWriteEOF)?;
    self.output.extend_from_slice(bytes);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crate::transport::{BytesTransport, Transport};
  use alloc::vec::Vec;

  #[test]
  fn short_reads_are_honored() {
    let mut transport = BytesTransport::new(b"abcde".to_vec()).with_chunk_len(2);
    let mut buffer = [0; 8];
    assert_eq!(transport.read(&mut buffer).unwrap(), 2);
    assert_eq!(&buffer[..2], b"ab");
    assert_eq!(transport.read(&mut buffer).unwrap(), 2);
    assert_eq!(transport.read(&mut buffer).unwrap(), 1);
    assert_eq!(&buffer[..1], b"e");
  }

  #[test]
  fn exhausted_input_closes_the_transport() {
    let mut transport = BytesTransport::new(b"a".to_vec());
    let mut buffer = [0; 4];
    assert_eq!(transport.read(&mut buffer).unwrap(), 1);
    assert!(transport.is_open());
    assert_eq!(transport.read(&mut buffer).unwrap(), 0);
    assert!(!transport.is_open());
    assert!(transport.write_all(b"x").is_err());
  }

  #[test]
  fn read_line_stops_at_line_feed() {
    let mut transport = BytesTransport::new(b"GET / HTTP/1.1\r\nHost: a\r\n".to_vec());
    let mut line = Vec::new();
    assert_eq!(transport.read_line(&mut line, 64).unwrap(), 16);
    assert_eq!(line, b"GET / HTTP/1.1\r\n");
    assert!(transport.read_line(&mut Vec::new(), 4).is_err());
  }

  #[test]
  fn read_line_fails_on_premature_close() {
    let mut transport = BytesTransport::new(b"HTTP/1.1".to_vec());
    assert!(transport.read_line(&mut Vec::new(), 64).is_err());
  }
}
