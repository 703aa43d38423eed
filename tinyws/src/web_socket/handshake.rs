//! Opening handshake of both roles.
//!
//! Only the subset of HTTP/1.1 needed to upgrade a connection is supported.


use crate::{
  misc::{bytes_split1, _trim_bytes},
  rng::Rng,
  transport::Transport,
  web_socket::WebSocketError,
};
use alloc::{string::String, vec::Vec};
use base64::{engine::general_purpose::STANDARD, Engine};
use httparse::{Header, Request, Response, Status, EMPTY_HEADER};
use sha1::{Digest, Sha1};

/// Maximum number of bytes of a request or response head.
pub const MAX_READ_LEN: usize = 2 * 1024;
/// Maximum number of headers of a request or response.
pub const MAX_READ_HEADER_LEN: usize = 64;

/// Sends the opening request and validates the response.
///
/// `headers` are written after the default ones. A custom header with the same name as a
/// default one replaces it.
#[inline]
pub fn client_handshake<RNG, T>(
  headers: &[(&str, &str)],
  host: &str,
  path: &str,
  rng: &mut RNG,
  transport: &mut T,
) -> crate::Result<()>
where
  RNG: Rng,
  T: Transport,
{
  let mut key_buffer = [0; 26];
  let mut buffer = Vec::new();
  let key = build_req(&mut buffer, headers, host, &mut key_buffer, path, rng);
  let mut expected_buffer = [0; 30];
  let expected = derived_key(&mut expected_buffer, key);
  transport.write_all(&buffer)?;
  buffer.clear();
  let _ = read_line(&mut buffer, transport)?;
  if !buffer.starts_with(b"HTTP/1.1 101") {
    _debug!("Handshake response didn't switch protocols");
    return Err(WebSocketError::MissingSwitchingProtocols.into());
  }
  read_remaining_head(&mut buffer, transport)?;
  let mut httparse_headers = [EMPTY_HEADER; MAX_READ_HEADER_LEN];
  let mut res = Response::new(&mut httparse_headers);
  if let Status::Partial = res.parse(&buffer)? {
    return Err(crate::Error::UnexpectedBufferState);
  }
  if res.code != Some(101) {
    return Err(WebSocketError::MissingSwitchingProtocols.into());
  }
  verify_common_header(res.headers)?;
  let Some(accept) = header_value(res.headers, "sec-websocket-accept") else {
    _debug!("Handshake response without sec-websocket-accept");
    return Err(WebSocketError::MissingHeader { name: "sec-websocket-accept" }.into());
  };
  if _trim_bytes(accept) != expected {
    _debug!("Handshake response with a mismatched sec-websocket-accept");
    return Err(WebSocketError::MismatchedAcceptKey.into());
  }
  _debug!("Client handshake succeeded");
  Ok(())
}

/// Reads and validates the opening request, then writes the response. Returns the request path.
#[inline]
pub fn server_handshake<T>(transport: &mut T) -> crate::Result<String>
where
  T: Transport,
{
  let mut buffer = Vec::new();
  let _ = read_line(&mut buffer, transport)?;
  read_remaining_head(&mut buffer, transport)?;
  let mut httparse_headers = [EMPTY_HEADER; MAX_READ_HEADER_LEN];
  let mut req = Request::new(&mut httparse_headers);
  if let Status::Partial = req.parse(&buffer)? {
    return Err(crate::Error::UnexpectedBufferState);
  }
  if !req.method.unwrap_or_default().eq_ignore_ascii_case("get") {
    _debug!("Handshake request with an unexpected method");
    return Err(WebSocketError::UnexpectedHttpMethod.into());
  }
  verify_common_header(req.headers)?;
  if !has_header_key_and_value(req.headers, "sec-websocket-version", b"13") {
    _debug!("Handshake request without sec-websocket-version 13");
    return Err(WebSocketError::MissingHeader { name: "sec-websocket-version" }.into());
  }
  let key = header_value(req.headers, "sec-websocket-key").map(_trim_bytes).unwrap_or_default();
  if key.is_empty() {
    _debug!("Handshake request without sec-websocket-key");
    return Err(WebSocketError::MissingHeader { name: "sec-websocket-key" }.into());
  }
  let mut key_buffer = [0; 30];
  let accept = derived_key(&mut key_buffer, key);
  let mut res = Vec::new();
  build_res(&mut res, accept);
  let path = String::from(req.path.unwrap_or("/"));
  transport.write_all(&res)?;
  _debug!("Server handshake succeeded");
  Ok(path)
}

/// `base64(sha1(key + GUID))`, the value of `Sec-WebSocket-Accept`.
///
/// ```rust
/// let mut buffer = [0; 30];
/// let key = b"dGhlIHNhbXBsZSBub25jZQ==";
/// let accept = tinyws::web_socket::handshake::derived_key(&mut buffer, key);
/// assert_eq!(accept, b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
/// ```
#[inline]
pub fn derived_key<'buffer>(buffer: &'buffer mut [u8; 30], key: &[u8]) -> &'buffer [u8] {
  let mut sha1 = Sha1::new();
  sha1.update(key);
  sha1.update(b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11");
  base64_from_array(&sha1.finalize().into(), buffer)
}

pub(crate) fn gen_key<'buffer>(buffer: &'buffer mut [u8; 26], rng: &mut impl Rng) -> &'buffer [u8] {
  base64_from_array(&rng.u8_16(), buffer)
}

fn base64_from_array<'output, const I: usize, const O: usize>(
  input: &[u8; I],
  output: &'output mut [u8; O],
) -> &'output [u8] {
  let len = STANDARD.encode_slice(input, output).unwrap_or_default();
  output.get(..len).unwrap_or_default()
}

/// Client request. Returns the `Sec-WebSocket-Key` that was sent.
fn build_req<'kb>(
  buffer: &mut Vec<u8>,
  headers: &[(&str, &'kb str)],
  host: &str,
  key_buffer: &'kb mut [u8; 26],
  path: &str,
  rng: &mut impl Rng,
) -> &'kb [u8] {
  let has_custom =
    |name: &str| headers.iter().any(|(key, _)| key.trim().eq_ignore_ascii_case(name));
  let custom_key = headers.iter().find_map(|(name, value)| {
    name.trim().eq_ignore_ascii_case("sec-websocket-key").then(|| value.trim().as_bytes())
  });
  let key = match custom_key {
    Some(elem) => elem,
    None => gen_key(key_buffer, rng),
  };
  let path = if path.is_empty() { "/" } else { path };
  extend_rn(buffer, &[b"GET ", path.as_bytes(), b" HTTP/1.1"]);
  if !has_custom("host") {
    extend_rn(buffer, &[b"Host: ", host.as_bytes()]);
  }
  if !has_custom("sec-websocket-key") {
    extend_rn(buffer, &[b"Sec-WebSocket-Key: ", key]);
  }
  if !has_custom("upgrade") {
    extend_rn(buffer, &[b"Upgrade: websocket"]);
  }
  if !has_custom("connection") {
    extend_rn(buffer, &[b"Connection: Upgrade"]);
  }
  if !has_custom("sec-websocket-version") {
    extend_rn(buffer, &[b"Sec-WebSocket-Version: 13"]);
  }
  for (name, value) in headers {
    extend_rn(buffer, &[name.as_bytes(), b": ", value.as_bytes()]);
  }
  extend_rn(buffer, &[]);
  key
}

/// Server response
fn build_res(buffer: &mut Vec<u8>, accept: &[u8]) {
  extend_rn(buffer, &[b"HTTP/1.1 101 Switching Protocols"]);
  extend_rn(buffer, &[b"Connection: Upgrade"]);
  extend_rn(buffer, &[b"Upgrade: websocket"]);
  extend_rn(buffer, &[b"Sec-WebSocket-Version: 13"]);
  extend_rn(buffer, &[b"Sec-WebSocket-Accept: ", accept]);
  extend_rn(buffer, &[]);
}

fn extend_rn(buffer: &mut Vec<u8>, parts: &[&[u8]]) {
  for part in parts {
    buffer.extend_from_slice(part);
  }
  buffer.extend_from_slice(b"\r\n");
}

fn has_header_key_and_value(headers: &[Header<'_>], key: &str, value: &[u8]) -> bool {
  headers.iter().any(|header| {
    header.name.trim().eq_ignore_ascii_case(key)
      && bytes_split1(header.value, b',').any(|el| _trim_bytes(el).eq_ignore_ascii_case(value))
  })
}

fn header_value<'bytes>(headers: &[Header<'bytes>], key: &str) -> Option<&'bytes [u8]> {
  headers
    .iter()
    .find_map(|header| header.name.trim().eq_ignore_ascii_case(key).then_some(header.value))
}

fn read_line<T>(buffer: &mut Vec<u8>, transport: &mut T) -> crate::Result<usize>
where
  T: Transport,
{
  transport.read_line(buffer, MAX_READ_LEN.saturating_sub(buffer.len()))
}

/// Reads header lines until an empty one.
fn read_remaining_head<T>(buffer: &mut Vec<u8>, transport: &mut T) -> crate::Result<()>
where
  T: Transport,
{
  loop {
    let start = buffer.len();
    let _ = read_line(buffer, transport)?;
    if matches!(buffer.get(start..), Some(b"\r\n" | b"\n")) {
      return Ok(());
    }
  }
}

fn verify_common_header(headers: &[Header<'_>]) -> crate::Result<()> {
  if !has_header_key_and_value(headers, "connection", b"upgrade") {
    _debug!("Handshake without connection: upgrade");
    return Err(WebSocketError::MissingHeader { name: "connection" }.into());
  }
  if !has_header_key_and_value(headers, "upgrade", b"websocket") {
    _debug!("Handshake without upgrade: websocket");
    return Err(WebSocketError::MissingHeader { name: "upgrade" }.into());
  }
  Ok(())
}
