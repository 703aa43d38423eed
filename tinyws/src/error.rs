use core::fmt::{Debug, Display, Formatter};

/// Grouped individual errors
#[derive(Debug)]
pub enum Error {
  // External - Misc
  //
  #[cfg(feature = "web-socket-handshake")]
  HttpParse(httparse::Error),
  #[cfg(feature = "rustls")]
  RustlsError(rustls::Error),
  #[cfg(feature = "rustls")]
  InvalidDnsName(rustls::pki_types::InvalidDnsNameError),

  // External - Std
  //
  #[cfg(feature = "std")]
  IoError(std::io::Error),
  TryFromIntError(core::num::TryFromIntError),
  Utf8Error(core::str::Utf8Error),

  // Generic
  //
  /// A buffer was partially read or write but should in fact be fully processed.
  UnexpectedBufferState,
  /// Unexpected end of file when reading from a transport.
  UnexpectedStreamReadEOF,
  /// Unexpected end of file when writing to a transport.
  UnexpectedStreamWriteEOF,
  /// A URL couldn't be split into host, port and resource.
  InvalidUrl,
  /// The scheme of a URL is not supported by the selected transport.
  UnsupportedScheme,

  // Internal
  //
  WebSocketError(crate::web_socket::WebSocketError),
}

impl Display for Error {
  #[inline]
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    <Self as Debug>::fmt(self, f)
  }
}

impl core::error::Error for Error {}

impl From<Error> for () {
  #[inline]
  fn from(_: Error) -> Self {}
}

#[cfg(feature = "web-socket-handshake")]
impl From<httparse::Error> for Error {
  #[inline]
  #[track_caller]
  fn from(from: httparse::Error) -> Self {
    Self::HttpParse(from)
  }
}

#[cfg(feature = "rustls")]
impl From<rustls::Error> for Error {
  #[inline]
  #[track_caller]
  fn from(from: rustls::Error) -> Self {
    Self::RustlsError(from)
  }
}

#[cfg(feature = "rustls")]
impl From<rustls::pki_types::InvalidDnsNameError> for Error {
  #[inline]
  #[track_caller]
  fn from(from: rustls::pki_types::InvalidDnsNameError) -> Self {
    Self::InvalidDnsName(from)
  }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
  #[inline]
  #[track_caller]
  fn from(from: std::io::Error) -> Self {
    Self::IoError(from)
  }
}

impl From<core::num::TryFromIntError> for Error {
  #[inline]
  #[track_caller]
  fn from(from: core::num::TryFromIntError) -> Self {
    Self::TryFromIntError(from)
  }
}

impl From<core::str::Utf8Error> for Error {
  #[inline]
  #[track_caller]
  fn from(from: core::str::Utf8Error) -> Self {
    Self::Utf8Error(from)
  }
}

impl From<crate::web_socket::WebSocketError> for Error {
  #[inline]
  #[track_caller]
  fn from(from: crate::web_socket::WebSocketError) -> Self {
    Self::WebSocketError(from)
  }
}

impl Error {
  /// If this error was originated from the WebSocket layer, returns its inner representation.
  #[inline]
  pub fn web_socket_error(&self) -> Option<&crate::web_socket::WebSocketError> {
    if let Self::WebSocketError(elem) = self {
      Some(elem)
    } else {
      None
    }
  }
}
