use crate::{
  transport::Transport,
  web_socket::{read_frame_info::ReadFrameInfo, unmask, Frame, WebSocketError, READ_CHUNK_LEN},
};
use alloc::vec::Vec;

/// Decodes exactly one frame, unmasking its payload if necessary.
pub(crate) fn read_frame<T>(max_payload_len: usize, transport: &mut T) -> crate::Result<Frame>
where
  T: Transport,
{
  let info = ReadFrameInfo::from_transport(max_payload_len, transport)?;
  let mut payload = Vec::with_capacity(info.payload_len.min(READ_CHUNK_LEN));
  let mut chunk = [0; READ_CHUNK_LEN];
  while payload.len() < info.payload_len {
    let len = info.payload_len.wrapping_sub(payload.len()).min(READ_CHUNK_LEN);
    let local_chunk = chunk.get_mut(..len).unwrap_or_default();
    read_exact(local_chunk, transport)?;
    payload.extend_from_slice(local_chunk);
  }
  if let Some(mask) = info.mask {
    unmask(&mut payload, mask);
  }
  Ok(Frame::new(info.fin, info.mask, info.op_code, payload))
}

pub(crate) fn read_array<const N: usize, T>(transport: &mut T) -> crate::Result<[u8; N]>
where
  T: Transport,
{
  let mut array = [0; N];
  read_exact(&mut array, transport)?;
  Ok(array)
}

/// Keeps reading while the transport is open. Zero-length reads are retried.
fn read_exact<T>(bytes: &mut [u8], transport: &mut T) -> crate::Result<()>
where
  T: Transport,
{
  let mut read = 0;
  while read < bytes.len() {
    if !transport.is_open() {
      return Err(WebSocketError::ClosedConnection.into());
    }
    let local_read = transport.read(bytes.get_mut(read..).unwrap_or_default())?;
    if local_read == 0 {
      core::hint::spin_loop();
      continue;
    }
    read = read.wrapping_add(local_read);
  }
  Ok(())
}
