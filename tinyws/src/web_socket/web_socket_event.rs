use crate::web_socket::CloseReason;

/// Connection-level happenings reported by the client and server facades.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WebSocketEvent {
  /// The opening handshake succeeded.
  ConnectionOpened,
  /// The connection was closed, locally or remotely. Reported once per connection.
  ConnectionClosed(CloseReason),
  /// A ping frame was received and already answered.
  GotPing,
  /// A pong frame was received.
  GotPong,
}
