#[cfg(feature = "std")]
use crate::misc::{host_header, WsUrl};
use crate::{
  rng::{simple_seed, Rng, Xorshift64},
  transport::Transport,
  web_socket::{handshake::client_handshake, FragmentsPolicy, WebSocket, WebSocketClient},
};
use alloc::{
  format,
  string::{String, ToString},
  vec::Vec,
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Client options applied before and after the opening handshake.
#[derive(Debug)]
pub struct WebSocketConnector<RNG> {
  fragments_policy: FragmentsPolicy,
  headers: Vec<(String, String)>,
  max_payload_len: usize,
  rng: RNG,
}

impl<RNG> WebSocketConnector<RNG>
where
  RNG: Rng,
{
  /// `Authorization: Basic base64(user:password)`.
  #[inline]
  #[must_use]
  pub fn basic_auth(self, user: &str, password: &str) -> Self {
    let credentials = STANDARD.encode(format!("{user}:{password}"));
    self.header("Authorization", &format!("Basic {credentials}"))
  }

  /// Defaults to [`FragmentsPolicy::Aggregate`].
  #[inline]
  #[must_use]
  pub fn fragments_policy(mut self, elem: FragmentsPolicy) -> Self {
    self.fragments_policy = elem;
    self
  }

  /// Additional header that must be sent in the request. Replaces a default header with the
  /// same name.
  #[inline]
  #[must_use]
  pub fn header(mut self, name: &str, value: &str) -> Self {
    self.headers.push((name.to_string(), value.to_string()));
    self
  }

  /// Defaults to 64 MiB.
  #[inline]
  #[must_use]
  pub fn max_payload_len(mut self, elem: usize) -> Self {
    self.max_payload_len = elem;
    self
  }

  /// Random number generator used for the handshake key and for masking keys.
  #[inline]
  pub fn rng<NRNG>(self, elem: NRNG) -> WebSocketConnector<NRNG> {
    WebSocketConnector {
      fragments_policy: self.fragments_policy,
      headers: self.headers,
      max_payload_len: self.max_payload_len,
      rng: elem,
    }
  }

  /// Performs the opening handshake over an already connected `transport`.
  ///
  /// `host` is sent as is in the `Host` header. The transport is closed if the handshake fails.
  #[inline]
  pub fn connect<T>(
    mut self,
    host: &str,
    path: &str,
    mut transport: T,
  ) -> crate::Result<WebSocketClient<RNG, T>>
  where
    T: Transport,
  {
    let headers =
      self.headers.iter().map(|(name, value)| (name.as_str(), value.as_str())).collect::<Vec<_>>();
    if let Err(err) = client_handshake(&headers, host, path, &mut self.rng, &mut transport) {
      transport.close();
      return Err(err);
    }
    let mut ws = WebSocket::new(self.rng, transport, true);
    ws.set_fragments_policy(self.fragments_policy);
    ws.set_max_payload_len(self.max_payload_len);
    Ok(WebSocketClient::new(ws))
  }

  /// Connects through TCP to a `ws://` URI.
  #[cfg(feature = "std")]
  #[inline]
  pub fn connect_uri(
    self,
    uri: &str,
  ) -> crate::Result<WebSocketClient<RNG, crate::transport::TcpTransport>> {
    let url = WsUrl::parse(uri)?;
    if url.is_secure() {
      return Err(crate::Error::UnsupportedScheme);
    }
    let transport = crate::transport::TcpTransport::connect(url.hostname(), url.port())?;
    self.connect_url(&url, transport)
  }

  /// Connects through TCP to `host` at `port`.
  #[cfg(feature = "std")]
  #[inline]
  pub fn connect_tcp(
    self,
    host: &str,
    port: u16,
    path: &str,
  ) -> crate::Result<WebSocketClient<RNG, crate::transport::TcpTransport>> {
    let transport = crate::transport::TcpTransport::connect(host, port)?;
    self.connect(&host_header(host, port, false), path, transport)
  }

  /// Connects through TLS to a `wss://` URI.
  #[cfg(feature = "rustls")]
  #[inline]
  pub fn connect_tls_uri(
    self,
    uri: &str,
  ) -> crate::Result<WebSocketClient<RNG, crate::transport::TlsTransport>> {
    let url = WsUrl::parse(uri)?;
    if !url.is_secure() {
      return Err(crate::Error::UnsupportedScheme);
    }
    let transport = crate::transport::TlsTransport::connect(url.hostname(), url.port())?;
    self.connect_url(&url, transport)
  }

  #[cfg(feature = "std")]
  fn connect_url<T>(
    mut self,
    url: &WsUrl<'_>,
    transport: T,
  ) -> crate::Result<WebSocketClient<RNG, T>>
  where
    T: Transport,
  {
    if !url.user().is_empty() {
      self = self.basic_auth(url.user(), url.password());
    }
    self.connect(&url.host_header(), url.resource(), transport)
  }
}

impl Default for WebSocketConnector<Xorshift64> {
  #[inline]
  fn default() -> Self {
    Self {
      fragments_policy: FragmentsPolicy::Aggregate,
      headers: Vec::new(),
      max_payload_len: crate::_MAX_PAYLOAD_LEN,
      rng: Xorshift64::from(simple_seed()),
    }
  }
}
