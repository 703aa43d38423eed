use crate::web_socket::CloseReason;

/// WebSocket Error
#[derive(Debug)]
pub enum WebSocketError {
  /// The connection was closed before or during the operation.
  ClosedConnection,
  /// Received close frame has invalid parameters.
  InvalidCloseFrame,
  /// Only text and binary messages can be sent as data.
  InvalidMessageKind,
  /// Op code is reserved or unknown.
  InvalidOpCodeByte {
    /// Received byte
    provided: u8,
  },
  /// A header required by the opening handshake is missing or has an unexpected value.
  MissingHeader {
    /// Lowercase header name
    name: &'static str,
  },
  /// The `Sec-WebSocket-Accept` value doesn't match the sent key.
  MismatchedAcceptKey,
  /// Status code is expected to be 101.
  MissingSwitchingProtocols,
  /// Reserved bits are not zero.
  ReservedBitsAreNotZero,
  /// Opening handshakes must use `GET`.
  UnexpectedHttpMethod,
  /// Received control frame wasn't supposed to be fragmented.
  UnexpectedFragmentedControlFrame,
  /// For example, the first frame of a message is a continuation.
  UnexpectedFrame,
  /// For example, a complete message was sent while an outbound stream was open.
  UnexpectedSendMode,
  /// Control frames have a maximum allowed size.
  VeryLargeControlFrame,
  /// The opening handshake exceeded the allowed size.
  VeryLargeHttp,
  /// Frame or message payload exceeds the defined threshold.
  VeryLargePayload,
}

impl WebSocketError {
  /// Code sent to the peer when this error is fatal to a connection. Transport failures and
  /// errors scoped to a single call have none.
  #[inline]
  pub fn close_reason(&self) -> Option<CloseReason> {
    match self {
      Self::InvalidCloseFrame
      | Self::InvalidOpCodeByte { .. }
      | Self::ReservedBitsAreNotZero
      | Self::UnexpectedFragmentedControlFrame
      | Self::UnexpectedFrame
      | Self::VeryLargeControlFrame => Some(CloseReason::ProtocolError),
      Self::VeryLargePayload => Some(CloseReason::MessageTooBig),
      Self::ClosedConnection
      | Self::InvalidMessageKind
      | Self::MismatchedAcceptKey
      | Self::MissingHeader { .. }
      | Self::MissingSwitchingProtocols
      | Self::UnexpectedHttpMethod
      | Self::UnexpectedSendMode
      | Self::VeryLargeHttp => None,
    }
  }
}
