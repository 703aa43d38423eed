//! A computer communications protocol, providing full-duplex communication channels over a
//! single TCP connection.

mod close_reason;
mod fragments_policy;
mod frame;
#[cfg(feature = "web-socket-handshake")]
pub mod handshake;
mod message;
mod message_assembler;
mod misc;
mod op_code;
mod read_frame_info;
#[cfg(test)]
mod tests;
mod unmask;
#[cfg(feature = "web-socket-handshake")]
mod web_socket_client;
#[cfg(feature = "web-socket-handshake")]
mod web_socket_connector;
mod web_socket_error;
mod web_socket_event;
mod web_socket_reader;
#[cfg(feature = "web-socket-handshake")]
mod web_socket_server;
mod web_socket_writer;

use crate::{rng::Rng, transport::Transport};
use alloc::vec::Vec;
pub use close_reason::CloseReason;
pub use fragments_policy::FragmentsPolicy;
pub use frame::Frame;
pub use message::{Message, MessageKind, MessageRole};
pub use message_assembler::{MessageAssembler, StreamState};
pub use op_code::OpCode;
pub use unmask::unmask;
#[cfg(feature = "web-socket-handshake")]
pub use web_socket_client::WebSocketClient;
#[cfg(feature = "web-socket-handshake")]
pub use web_socket_connector::WebSocketConnector;
pub use web_socket_error::WebSocketError;
pub use web_socket_event::WebSocketEvent;
#[cfg(feature = "web-socket-handshake")]
pub use web_socket_server::WebSocketServer;

pub(crate) const FIN_MASK: u8 = 0b1000_0000;
pub(crate) const MASK_MASK: u8 = 0b1000_0000;
/// The maximum allowed payload length of control frames.
pub const MAX_CONTROL_PAYLOAD_LEN: usize = 125;
pub(crate) const MAX_HEADER_LEN: usize = 14;
pub(crate) const OP_CODE_MASK: u8 = 0b0000_1111;
pub(crate) const PAYLOAD_LEN_MASK: u8 = 0b0111_1111;
/// Size of the scratch buffer used to read payloads.
pub const READ_CHUNK_LEN: usize = 512;
pub(crate) const RSV_MASK: u8 = 0b0111_0000;

/// Whether a fragmented message is in progress in one direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamMode {
  /// Complete messages.
  Normal,
  /// A fragmented message was started and not yet finished.
  Streaming,
}

/// Protocol engine of a single connection.
///
/// Owns the transport, decodes and assembles incoming frames, answers pings and closes, and
/// encodes outgoing messages. Masking must be enabled on clients and disabled on servers.
#[derive(Debug)]
pub struct WebSocket<RNG, T> {
  assembler: MessageAssembler,
  close_reason: CloseReason,
  max_payload_len: usize,
  rng: RNG,
  send_mode: StreamMode,
  transport: T,
  use_masking: bool,
  writer_buffer: Vec<u8>,
}

impl<RNG, T> WebSocket<RNG, T>
where
  RNG: Rng,
  T: Transport,
{
  /// Wraps an already established connection.
  #[inline]
  pub fn new(rng: RNG, transport: T, use_masking: bool) -> Self {
    Self {
      assembler: MessageAssembler::default(),
      close_reason: CloseReason::None,
      max_payload_len: crate::_MAX_PAYLOAD_LEN,
      rng,
      send_mode: StreamMode::Normal,
      transport,
      use_masking,
      writer_buffer: Vec::new(),
    }
  }

  /// If the transport is still open.
  #[inline]
  pub fn available(&self) -> bool {
    self.transport.is_open()
  }

  /// Code sent or received in a close frame. [`CloseReason::AbnormalClosure`] if the
  /// transport failed.
  #[inline]
  pub fn close_reason(&self) -> CloseReason {
    self.close_reason
  }

  /// See [`FragmentsPolicy`].
  #[inline]
  pub fn fragments_policy(&self) -> FragmentsPolicy {
    self.assembler.policy()
  }

  /// If there are bytes waiting to be read.
  #[inline]
  pub fn has_data(&mut self) -> bool {
    self.transport.has_data()
  }

  /// Frames and messages can't be larger than this value.
  #[inline]
  pub fn max_payload_len(&self) -> usize {
    self.max_payload_len
  }

  /// Inbound fragmentation state.
  #[inline]
  pub fn recv_mode(&self) -> StreamMode {
    if self.assembler.is_streaming() {
      StreamMode::Streaming
    } else {
      StreamMode::Normal
    }
  }

  /// Outbound fragmentation state.
  #[inline]
  pub fn send_mode(&self) -> StreamMode {
    self.send_mode
  }

  /// Underlying transport
  #[inline]
  pub fn transport(&self) -> &T {
    &self.transport
  }

  /// Mutable underlying transport
  #[inline]
  pub fn transport_mut(&mut self) -> &mut T {
    &mut self.transport
  }

  /// If outgoing frames are masked.
  #[inline]
  pub fn use_masking(&self) -> bool {
    self.use_masking
  }

  /// A fragmented message that is being received keeps its original policy. The new one applies
  /// from the next message onwards.
  #[inline]
  pub fn set_fragments_policy(&mut self, policy: FragmentsPolicy) {
    self.assembler.set_policy(policy);
  }

  /// Defaults to 64 MiB.
  #[inline]
  pub fn set_max_payload_len(&mut self, max_payload_len: usize) {
    self.max_payload_len = max_payload_len;
  }

  /// Clients must mask, servers must not.
  #[inline]
  pub fn set_use_masking(&mut self, use_masking: bool) {
    self.use_masking = use_masking;
  }

  /// Sends a close frame with `reason` and closes the transport.
  ///
  /// Does nothing if the transport is already closed. The transport is closed even if the frame
  /// can't be written, in which case the write error is returned.
  #[inline]
  pub fn close(&mut self, reason: CloseReason) -> crate::Result<()> {
    if !self.transport.is_open() {
      return Ok(());
    }
    _debug!("Closing connection with {reason:?}");
    self.close_reason = reason;
    let code = reason.code().map(u16::to_be_bytes);
    let payload = code.as_ref().map_or(&[][..], |el| &el[..]);
    let rslt = self.write_raw(true, OpCode::Close, payload);
    self.transport.close();
    rslt
  }

  /// Sends a ping frame. Payloads larger than [`MAX_CONTROL_PAYLOAD_LEN`] are rejected without
  /// touching the transport.
  #[inline]
  pub fn ping(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.write_control(OpCode::Ping, payload)
  }

  /// Reads every available frame, calling `cb` for each produced message.
  ///
  /// Returns `true` if at least one message was produced.
  #[inline]
  pub fn poll(&mut self, mut cb: impl FnMut(Message)) -> crate::Result<bool> {
    let mut produced = false;
    while self.transport.is_open() && self.transport.has_data() {
      let message = self.recv_frame()?;
      if !message.is_empty() {
        produced = true;
        cb(message);
      }
    }
    Ok(produced)
  }

  /// Sends a pong frame. Payloads larger than [`MAX_CONTROL_PAYLOAD_LEN`] are rejected without
  /// touching the transport.
  #[inline]
  pub fn pong(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.write_control(OpCode::Pong, payload)
  }

  /// Decodes at most one frame.
  ///
  /// Returns an empty message if nothing is available or if the frame is an intermediate part of
  /// an aggregated message. Received pings are answered and received closes are echoed before
  /// being returned.
  ///
  /// Protocol violations close the connection with the corresponding [`CloseReason`].
  #[inline]
  pub fn recv(&mut self) -> crate::Result<Message> {
    if !self.transport.is_open() {
      return Err(WebSocketError::ClosedConnection.into());
    }
    if !self.transport.has_data() {
      return Ok(Message::empty());
    }
    self.recv_frame()
  }

  /// Reads frames until a non-empty message is produced, blocking as long as the transport
  /// blocks.
  #[inline]
  pub fn recv_blocking(&mut self) -> crate::Result<Message> {
    loop {
      if !self.transport.is_open() {
        return Err(WebSocketError::ClosedConnection.into());
      }
      let message = self.recv_frame()?;
      if !message.is_empty() {
        return Ok(message);
      }
    }
  }

  /// Sends a complete text or binary message.
  #[inline]
  pub fn send(&mut self, kind: MessageKind, payload: &[u8]) -> crate::Result<()> {
    let op_code = data_op_code(kind)?;
    if self.send_mode == StreamMode::Streaming {
      return Err(WebSocketError::UnexpectedSendMode.into());
    }
    self.check_payload_len(payload)?;
    self.write_raw(true, op_code, payload)
  }

  /// Shortcut for [`MessageKind::Binary`] messages.
  #[inline]
  pub fn send_binary(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.send(MessageKind::Binary, payload)
  }

  /// Shortcut for [`MessageKind::Text`] messages.
  #[inline]
  pub fn send_text(&mut self, payload: &str) -> crate::Result<()> {
    self.send(MessageKind::Text, payload.as_bytes())
  }

  /// Sends the first fragment of a message.
  #[inline]
  pub fn begin_stream(&mut self, kind: MessageKind, payload: &[u8]) -> crate::Result<()> {
    let op_code = data_op_code(kind)?;
    if self.send_mode == StreamMode::Streaming {
      return Err(WebSocketError::UnexpectedSendMode.into());
    }
    self.check_payload_len(payload)?;
    self.write_raw(false, op_code, payload)?;
    self.send_mode = StreamMode::Streaming;
    Ok(())
  }

  /// Sends an intermediate fragment of the message started by [`Self::begin_stream`].
  #[inline]
  pub fn continue_stream(&mut self, payload: &[u8]) -> crate::Result<()> {
    if self.send_mode == StreamMode::Normal {
      return Err(WebSocketError::UnexpectedSendMode.into());
    }
    self.check_payload_len(payload)?;
    self.write_raw(false, OpCode::Continuation, payload)
  }

  /// Sends the last fragment of the message started by [`Self::begin_stream`].
  #[inline]
  pub fn end_stream(&mut self, payload: &[u8]) -> crate::Result<()> {
    if self.send_mode == StreamMode::Normal {
      return Err(WebSocketError::UnexpectedSendMode.into());
    }
    self.check_payload_len(payload)?;
    self.write_raw(true, OpCode::Continuation, payload)?;
    self.send_mode = StreamMode::Normal;
    Ok(())
  }

  fn check_payload_len(&self, payload: &[u8]) -> crate::Result<()> {
    if payload.len() > self.max_payload_len {
      return Err(WebSocketError::VeryLargePayload.into());
    }
    Ok(())
  }

  /// Fatal errors end the connection. Protocol errors are reported to the peer, transport
  /// failures are not.
  fn fail(&mut self, err: crate::Error) -> crate::Error {
    match err.web_socket_error().and_then(WebSocketError::close_reason) {
      Some(reason) => {
        _debug!("Protocol error: {err:?}");
        let _rslt = self.close(reason);
      }
      None => {
        _debug!("Transport failure: {err:?}");
        if self.close_reason.is_none() {
          self.close_reason = CloseReason::AbnormalClosure;
        }
        self.transport.close();
      }
    }
    err
  }

  fn manage_close_frame(&mut self, payload: &[u8]) -> crate::Result<()> {
    let (reason, echo) = match payload {
      [] => (CloseReason::GoingAway, &[][..]),
      [_] => return Err(WebSocketError::InvalidCloseFrame.into()),
      [a, b, ..] => {
        (CloseReason::from(u16::from_be_bytes([*a, *b])), payload.get(..2).unwrap_or_default())
      }
    };
    _debug!("Received close frame with {reason:?}");
    self.close_reason = reason;
    // The peer may have already shut down its side.
    let _rslt = self.write_raw(true, OpCode::Close, echo);
    self.transport.close();
    Ok(())
  }

  fn recv_frame(&mut self) -> crate::Result<Message> {
    let frame = match web_socket_reader::read_frame(self.max_payload_len, &mut self.transport) {
      Ok(elem) => elem,
      Err(err) => return Err(self.fail(err)),
    };
    let message = match self.assembler.on_frame(frame, self.max_payload_len) {
      Ok(Some(elem)) => elem,
      Ok(None) => return Ok(Message::empty()),
      Err(err) => return Err(self.fail(err)),
    };
    let rslt = match message.kind() {
      MessageKind::Close => self.manage_close_frame(message.bytes()),
      MessageKind::Ping => {
        _trace!("Replying ping");
        self.write_raw(true, OpCode::Pong, message.bytes())
      }
      _ => Ok(()),
    };
    if let Err(err) = rslt {
      return Err(self.fail(err));
    }
    Ok(message)
  }

  fn write_control(&mut self, op_code: OpCode, payload: &[u8]) -> crate::Result<()> {
    if payload.len() > MAX_CONTROL_PAYLOAD_LEN {
      return Err(WebSocketError::VeryLargeControlFrame.into());
    }
    self.write_raw(true, op_code, payload)
  }

  fn write_raw(&mut self, fin: bool, op_code: OpCode, payload: &[u8]) -> crate::Result<()> {
    if !self.transport.is_open() {
      return Err(WebSocketError::ClosedConnection.into());
    }
    let mask = if self.use_masking { Some(self.rng.u8_4()) } else { None };
    let rslt = web_socket_writer::write_frame(
      &mut self.writer_buffer,
      fin,
      mask,
      op_code,
      payload,
      &mut self.transport,
    );
    if rslt.is_err() {
      if self.close_reason.is_none() {
        self.close_reason = CloseReason::AbnormalClosure;
      }
      self.transport.close();
    }
    rslt
  }
}

fn data_op_code(kind: MessageKind) -> crate::Result<OpCode> {
  match kind {
    MessageKind::Binary => Ok(OpCode::Binary),
    MessageKind::Text => Ok(OpCode::Text),
    MessageKind::Close | MessageKind::Empty | MessageKind::Ping | MessageKind::Pong => {
      Err(WebSocketError::InvalidMessageKind.into())
    }
  }
}
