/// Status code used to indicate why an endpoint closed the WebSocket connection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CloseReason {
  /// No code was recorded or the received code isn't known.
  #[default]
  None,
  /// Normal closure.
  NormalClosure,
  /// An endpoint is going away.
  GoingAway,
  /// Closing connection due to a protocol error.
  ProtocolError,
  /// An endpoint received a type of data that it can't accept.
  UnsupportedData,
  /// Closing frame without a status code. Never sent on the wire.
  NoStatusRcvd,
  /// Connection dropped without a closing frame. Never sent on the wire.
  AbnormalClosure,
  /// Received data that is not consistent with the type of the message.
  InvalidPayloadData,
  /// Generic policy violation.
  PolicyViolation,
  /// Received a very large message.
  MessageTooBig,
  /// An unexpected condition prevented the request from being fulfilled.
  InternalServerError,
}

impl CloseReason {
  /// Numeric representation. [`CloseReason::None`] has none.
  #[inline]
  pub fn code(self) -> Option<u16> {
    Some(match self {
      Self::None => return None,
      Self::NormalClosure => 1000,
      Self::GoingAway => 1001,
      Self::ProtocolError => 1002,
      Self::UnsupportedData => 1003,
      Self::NoStatusRcvd => 1005,
      Self::AbnormalClosure => 1006,
      Self::InvalidPayloadData => 1007,
      Self::PolicyViolation => 1008,
      Self::MessageTooBig => 1009,
      Self::InternalServerError => 1011,
    })
  }

  /// If a reason was recorded.
  #[inline]
  pub fn is_none(self) -> bool {
    matches!(self, Self::None)
  }
}

impl From<u16> for CloseReason {
  #[inline]
  fn from(from: u16) -> Self {
    match from {
      1000 => Self::NormalClosure,
      1001 => Self::GoingAway,
      1002 => Self::ProtocolError,
      1003 => Self::UnsupportedData,
      1005 => Self::NoStatusRcvd,
      1006 => Self::AbnormalClosure,
      1007 => Self::InvalidPayloadData,
      1008 => Self::PolicyViolation,
      1009 => Self::MessageTooBig,
      1011 => Self::InternalServerError,
      _ => Self::None,
    }
  }
}
