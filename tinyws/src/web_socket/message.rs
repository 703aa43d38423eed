use crate::web_socket::OpCode;
use alloc::vec::Vec;

/// Kind of a [`Message`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageKind {
  /// UTF-8 text
  Text,
  /// Opaque bytes
  Binary,
  /// Ping control frame
  Ping,
  /// Pong control frame
  Pong,
  /// Close control frame
  Close,
  /// Nothing was produced.
  Empty,
}

impl MessageKind {
  pub(crate) fn from_op_code(op_code: OpCode) -> Self {
    match op_code {
      OpCode::Text => Self::Text,
      OpCode::Binary => Self::Binary,
      OpCode::Ping => Self::Ping,
      OpCode::Pong => Self::Pong,
      OpCode::Close => Self::Close,
      OpCode::Continuation => Self::Empty,
    }
  }
}

/// Position of a [`Message`] inside a fragmented sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageRole {
  /// Whole message.
  Complete,
  /// First part of a fragmented message.
  First,
  /// Intermediate part of a fragmented message.
  Continuation,
  /// Last part of a fragmented message.
  Last,
}

/// User-facing unit composed by one or more frames.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
  bytes: Vec<u8>,
  kind: MessageKind,
  role: MessageRole,
}

impl Message {
  /// Creates a new instance with the given parameters.
  #[inline]
  pub fn new(kind: MessageKind, role: MessageRole, bytes: Vec<u8>) -> Self {
    Self { bytes, kind, role }
  }

  /// Complete message without content.
  #[inline]
  pub fn empty() -> Self {
    Self::new(MessageKind::Empty, MessageRole::Complete, Vec::new())
  }

  /// Payload
  #[inline]
  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  /// Owned payload
  #[inline]
  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }

  /// See [`MessageKind`].
  #[inline]
  pub fn kind(&self) -> MessageKind {
    self.kind
  }

  /// See [`MessageRole`].
  #[inline]
  pub fn role(&self) -> MessageRole {
    self.role
  }

  /// Payload as a string. Partial text messages can end in the middle of a character.
  #[inline]
  pub fn text(&self) -> crate::Result<&str> {
    Ok(core::str::from_utf8(&self.bytes)?)
  }

  /// Shortcut for [`MessageKind::Binary`].
  #[inline]
  pub fn is_binary(&self) -> bool {
    self.kind == MessageKind::Binary
  }

  /// Shortcut for [`MessageKind::Close`].
  #[inline]
  pub fn is_close(&self) -> bool {
    self.kind == MessageKind::Close
  }

  /// Shortcut for [`MessageKind::Empty`].
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.kind == MessageKind::Empty
  }

  /// Shortcut for [`MessageKind::Ping`].
  #[inline]
  pub fn is_ping(&self) -> bool {
    self.kind == MessageKind::Ping
  }

  /// Shortcut for [`MessageKind::Pong`].
  #[inline]
  pub fn is_pong(&self) -> bool {
    self.kind == MessageKind::Pong
  }

  /// Shortcut for [`MessageKind::Text`].
  #[inline]
  pub fn is_text(&self) -> bool {
    self.kind == MessageKind::Text
  }

  /// Shortcut for [`MessageRole::Complete`].
  #[inline]
  pub fn is_complete(&self) -> bool {
    self.role == MessageRole::Complete
  }

  /// Shortcut for [`MessageRole::First`].
  #[inline]
  pub fn is_first(&self) -> bool {
    self.role == MessageRole::First
  }

  /// Shortcut for [`MessageRole::Continuation`].
  #[inline]
  pub fn is_partial(&self) -> bool {
    self.role == MessageRole::Continuation
  }

  /// Shortcut for [`MessageRole::Last`].
  #[inline]
  pub fn is_last(&self) -> bool {
    self.role == MessageRole::Last
  }
}
