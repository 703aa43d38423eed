use crate::{
  rng::Rng,
  transport::{Listener, Transport},
  web_socket::{handshake::server_handshake, FragmentsPolicy, WebSocket, WebSocketClient},
};

/// Accepts connections and performs the server side of the opening handshake.
#[derive(Debug)]
pub struct WebSocketServer<L> {
  fragments_policy: FragmentsPolicy,
  listener: L,
  max_payload_len: usize,
}

impl<L> WebSocketServer<L>
where
  L: Listener,
{
  /// Wraps a listener that may or may not be bound.
  #[inline]
  pub fn new(listener: L) -> Self {
    Self {
      fragments_policy: FragmentsPolicy::Aggregate,
      listener,
      max_payload_len: crate::_MAX_PAYLOAD_LEN,
    }
  }

  /// Takes a pending connection and performs the handshake. Returns `None` if nothing is
  /// pending.
  ///
  /// Accepted endpoints never mask outgoing frames. The raw transport is closed if the
  /// handshake fails.
  #[inline]
  pub fn accept<RNG>(
    &mut self,
    rng: RNG,
  ) -> crate::Result<Option<WebSocketClient<RNG, L::Transport>>>
  where
    RNG: Rng,
  {
    let Some(mut transport) = self.listener.accept()? else {
      return Ok(None);
    };
    match server_handshake(&mut transport) {
      Ok(_path) => {
        _debug!("Accepted WebSocket connection at {_path}");
      }
      Err(err) => {
        transport.close();
        return Err(err);
      }
    }
    let mut ws = WebSocket::new(rng, transport, false);
    ws.set_fragments_policy(self.fragments_policy);
    ws.set_max_payload_len(self.max_payload_len);
    Ok(Some(WebSocketClient::new(ws)))
  }

  /// If the listener is accepting connections.
  #[inline]
  pub fn available(&self) -> bool {
    self.listener.is_open()
  }

  /// Stops listening. Accepted connections are not affected.
  #[inline]
  pub fn close(&mut self) {
    self.listener.close();
  }

  /// Binds the listener to `port`.
  #[inline]
  pub fn listen(&mut self, port: u16) -> crate::Result<()> {
    self.listener.listen(port)
  }

  /// Underlying listener
  #[inline]
  pub fn listener(&self) -> &L {
    &self.listener
  }

  /// If a connection is waiting to be accepted.
  #[inline]
  pub fn poll(&mut self) -> bool {
    self.listener.poll()
  }

  /// Policy of accepted connections.
  #[inline]
  pub fn set_fragments_policy(&mut self, policy: FragmentsPolicy) {
    self.fragments_policy = policy;
  }

  /// Maximum payload length of accepted connections.
  #[inline]
  pub fn set_max_payload_len(&mut self, max_payload_len: usize) {
    self.max_payload_len = max_payload_len;
  }
}
