use crate::{
  rng::Rng,
  transport::Transport,
  web_socket::{
    CloseReason, FragmentsPolicy, Message, MessageKind, StreamMode, WebSocket, WebSocketEvent,
  },
};
use alloc::boxed::Box;

type EventCb = Box<dyn FnMut(WebSocketEvent)>;
type MessageCb = Box<dyn FnMut(Message)>;

/// Callback-driven facade over an established [`WebSocket`].
///
/// Messages and events are dispatched synchronously from [`WebSocketClient::poll`] and
/// [`WebSocketClient::read_blocking`]. [`WebSocketEvent::ConnectionOpened`] is delivered by the
/// first poll.
pub struct WebSocketClient<RNG, T> {
  event_cb: Option<EventCb>,
  has_notified_close: bool,
  is_open_pending: bool,
  message_cb: Option<MessageCb>,
  ws: WebSocket<RNG, T>,
}

impl<RNG, T> WebSocketClient<RNG, T>
where
  RNG: Rng,
  T: Transport,
{
  /// Wraps an endpoint whose opening handshake already succeeded.
  #[inline]
  pub fn new(ws: WebSocket<RNG, T>) -> Self {
    Self { event_cb: None, has_notified_close: false, is_open_pending: true, message_cb: None, ws }
  }

  /// If the connection is still open. With `active_test`, a ping is sent first so that a dead
  /// transport can be noticed.
  #[inline]
  pub fn available(&mut self, active_test: bool) -> bool {
    if active_test && self.ws.available() {
      let _rslt = self.ws.ping(&[]);
    }
    let is_available = self.ws.available();
    if !is_available {
      self.notify_close();
    }
    is_available
  }

  /// Closes the connection. See [`WebSocket::close`].
  #[inline]
  pub fn close(&mut self, reason: CloseReason) -> crate::Result<()> {
    let rslt = self.ws.close(reason);
    self.notify_close();
    rslt
  }

  /// See [`WebSocket::close_reason`].
  #[inline]
  pub fn close_reason(&self) -> CloseReason {
    self.ws.close_reason()
  }

  /// Finishes an outbound stream started by [`Self::stream`] or [`Self::stream_binary`].
  #[inline]
  pub fn end(&mut self) -> crate::Result<()> {
    self.ws.end_stream(&[])
  }

  /// Callback for connection events.
  #[inline]
  pub fn on_event(&mut self, cb: impl FnMut(WebSocketEvent) + 'static) {
    self.event_cb = Some(Box::new(cb));
  }

  /// Callback for data messages.
  #[inline]
  pub fn on_message(&mut self, cb: impl FnMut(Message) + 'static) {
    self.message_cb = Some(Box::new(cb));
  }

  /// See [`WebSocket::ping`].
  #[inline]
  pub fn ping(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.ws.ping(payload)
  }

  /// Reads everything that is available, dispatching messages and events. Returns `true` if
  /// at least one message was produced.
  #[inline]
  pub fn poll(&mut self) -> crate::Result<bool> {
    if self.is_open_pending {
      self.is_open_pending = false;
      self.notify_event(WebSocketEvent::ConnectionOpened);
    }
    let mut produced = false;
    while self.ws.available() && self.ws.has_data() {
      let message = match self.ws.recv() {
        Ok(elem) => elem,
        Err(err) => {
          if !self.ws.available() {
            self.notify_close();
          }
          return Err(err);
        }
      };
      if !message.is_empty() {
        produced = true;
        self.dispatch(message);
      }
    }
    if !self.ws.available() {
      self.notify_close();
    }
    Ok(produced)
  }

  /// See [`WebSocket::pong`].
  #[inline]
  pub fn pong(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.ws.pong(payload)
  }

  /// Blocks until a non-empty message arrives. Events are still dispatched but the message is
  /// returned instead of being passed to the message callback.
  #[inline]
  pub fn read_blocking(&mut self) -> crate::Result<Message> {
    let rslt = self.ws.recv_blocking();
    if let Ok(message) = &rslt {
      self.dispatch_event(message.kind());
    }
    if !self.ws.available() {
      self.notify_close();
    }
    rslt
  }

  /// Sends a text message. Continues the current outbound stream if there is one.
  #[inline]
  pub fn send(&mut self, payload: &str) -> crate::Result<()> {
    self.send_or_continue(MessageKind::Text, payload.as_bytes())
  }

  /// Sends a binary message. Continues the current outbound stream if there is one.
  #[inline]
  pub fn send_binary(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.send_or_continue(MessageKind::Binary, payload)
  }

  /// See [`WebSocket::set_fragments_policy`].
  #[inline]
  pub fn set_fragments_policy(&mut self, policy: FragmentsPolicy) {
    self.ws.set_fragments_policy(policy);
  }

  /// Starts an outbound fragmented text message.
  #[inline]
  pub fn stream(&mut self, payload: &str) -> crate::Result<()> {
    self.ws.begin_stream(MessageKind::Text, payload.as_bytes())
  }

  /// Starts an outbound fragmented binary message.
  #[inline]
  pub fn stream_binary(&mut self, payload: &[u8]) -> crate::Result<()> {
    self.ws.begin_stream(MessageKind::Binary, payload)
  }

  /// Underlying endpoint
  #[inline]
  pub fn web_socket(&self) -> &WebSocket<RNG, T> {
    &self.ws
  }

  /// Mutable underlying endpoint
  #[inline]
  pub fn web_socket_mut(&mut self) -> &mut WebSocket<RNG, T> {
    &mut self.ws
  }

  fn dispatch(&mut self, message: Message) {
    match message.kind() {
      MessageKind::Binary | MessageKind::Text => {
        if let Some(cb) = &mut self.message_cb {
          cb(message);
        }
      }
      kind => self.dispatch_event(kind),
    }
  }

  fn dispatch_event(&mut self, kind: MessageKind) {
    match kind {
      MessageKind::Close => self.notify_close(),
      MessageKind::Ping => self.notify_event(WebSocketEvent::GotPing),
      MessageKind::Pong => self.notify_event(WebSocketEvent::GotPong),
      MessageKind::Binary | MessageKind::Empty | MessageKind::Text => {}
    }
  }

  fn notify_close(&mut self) {
    if self.has_notified_close {
      return;
    }
    self.has_notified_close = true;
    self.notify_event(WebSocketEvent::ConnectionClosed(self.ws.close_reason()));
  }

  fn notify_event(&mut self, event: WebSocketEvent) {
    if let Some(cb) = &mut self.event_cb {
      cb(event);
    }
  }

  fn send_or_continue(&mut self, kind: MessageKind, payload: &[u8]) -> crate::Result<()> {
    match self.ws.send_mode() {
      StreamMode::Normal => self.ws.send(kind, payload),
      StreamMode::Streaming => self.ws.continue_stream(payload),
    }
  }
}

impl<RNG, T> core::fmt::Debug for WebSocketClient<RNG, T>
where
  RNG: core::fmt::Debug,
  T: core::fmt::Debug,
{
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("WebSocketClient")
      .field("has_notified_close", &self.has_notified_close)
      .field("is_open_pending", &self.is_open_pending)
      .field("ws", &self.ws)
      .finish_non_exhaustive()
  }
}
