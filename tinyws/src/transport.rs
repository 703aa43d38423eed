//! Ordered byte streams that carry WebSocket connections.

mod bytes_transport;
#[cfg(feature = "rustls")]
mod rustls;
#[cfg(feature = "std")]
mod std;

use alloc::vec::Vec;
pub use bytes_transport::BytesTransport;
#[cfg(feature = "rustls")]
pub use self::rustls::TlsTransport;
#[cfg(feature = "std")]
pub use self::std::{TcpAcceptor, TcpTransport};

/// A synchronous and ordered stream of bytes.
///
/// Reads are best-effort: implementations can return fewer bytes than requested, including zero
/// when nothing is available at the moment. Callers that need an exact amount must keep reading
/// while [`Transport::is_open`] holds.
pub trait Transport {
  /// Closes the underlying connection. Subsequent calls are no-ops.
  fn close(&mut self);

  /// If there are bytes that can be read without blocking.
  fn has_data(&mut self) -> bool;

  /// If the connection is still alive from the local point of view.
  fn is_open(&self) -> bool;

  /// Pulls some bytes from this source into the specified buffer, returning how many bytes
  /// were read. `Ok(0)` means that nothing was available.
  fn read(&mut self, bytes: &mut [u8]) -> crate::Result<usize>;

  /// Appends bytes into `buffer` up to and including a `\n`. Returns the number of appended
  /// bytes.
  ///
  /// Fails if the connection is closed before a line ends or if the line exceeds `max_len`.
  #[inline]
  fn read_line(&mut self, buffer: &mut Vec<u8>, max_len: usize) -> crate::Result<usize> {
    let mut byte = [0; 1];
    let mut read = 0usize;
    loop {
      if read >= max_len {
        return Err(crate::web_socket::WebSocketError::VeryLargeHttp.into());
      }
      if !self.is_open() {
        return Err(crate::Error::UnexpectedStreamReadEOF);
      }
      if self.read(&mut byte)? == 0 {
        core::hint::spin_loop();
        continue;
      }
      buffer.push(byte[0]);
      read = read.wrapping_add(1);
      if byte[0] == b'\n' {
        return Ok(read);
      }
    }
  }

  /// Attempts to write all elements of `bytes`.
  fn write_all(&mut self, bytes: &[u8]) -> crate::Result<()>;
}

impl<T> Transport for &mut T
where
  T: Transport,
{
  #[inline]
  fn close(&mut self) {
    (*self).close();
  }

  #[inline]
  fn has_data(&mut self) -> bool {
    (*self).has_data()
  }

  #[inline]
  fn is_open(&self) -> bool {
    (**self).is_open()
  }

  #[inline]
  fn read(&mut self, bytes: &mut [u8]) -> crate::Result<usize> {
    (*self).read(bytes)
  }

  #[inline]
  fn read_line(&mut self, buffer: &mut Vec<u8>, max_len: usize) -> crate::Result<usize> {
    (*self).read_line(buffer, max_len)
  }

  #[inline]
  fn write_all(&mut self, bytes: &[u8]) -> crate::Result<()> {
    (*self).write_all(bytes)
  }
}

/// Always closed.
impl Transport for () {
  #[inline]
  fn close(&mut self) {}

  #[inline]
  fn has_data(&mut self) -> bool {
    false
  }

  #[inline]
  fn is_open(&self) -> bool {
    false
  }

  #[inline]
  fn read(&mut self, _: &mut [u8]) -> crate::Result<usize> {
    Ok(0)
  }

  #[inline]
  fn write_all(&mut self, _: &[u8]) -> crate::Result<()> {
    Err(crate::Error::UnexpectedStreamWriteEOF)
  }
}

/// Accepts incoming connections, server side.
pub trait Listener {
  /// Transport of each accepted connection.
  type Transport: Transport;

  /// Takes the next pending connection, if any.
  fn accept(&mut self) -> crate::Result<Option<Self::Transport>>;

  /// Stops listening.
  fn close(&mut self);

  /// If the listener is bound and accepting connections.
  fn is_open(&self) -> bool;

  /// Binds to all interfaces at `port`.
  fn listen(&mut self, port: u16) -> crate::Result<()>;

  /// If there is at least one connection, or a failure, waiting to be returned by
  /// [`Listener::accept`].
  fn poll(&mut self) -> bool;
}
