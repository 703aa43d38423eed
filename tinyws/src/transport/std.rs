use crate::transport::{Listener, Transport};
use std::{
  io::{ErrorKind, Read, Write},
  net::{TcpListener, TcpStream},
};

/// Plain TCP connection. Reads block until at least one byte arrives.
#[derive(Debug)]
pub struct TcpTransport {
  stream: Option<TcpStream>,
}

impl TcpTransport {
  /// Resolves `host` and connects to the first address that accepts the connection.
  #[inline]
  pub fn connect(host: &str, port: u16) -> crate::Result<Self> {
    let stream = TcpStream::connect((host, port))?;
    stream.set_nodelay(true)?;
    Ok(Self { stream: Some(stream) })
  }

  /// Underlying stream, if still open.
  #[inline]
  pub fn stream(&self) -> Option<&TcpStream> {
    self.stream.as_ref()
  }
}

impl From<TcpStream> for TcpTransport {
  #[inline]
  fn from(from: TcpStream) -> Self {
    Self { stream: Some(from) }
  }
}

impl Transport for TcpTransport {
  #[inline]
  fn close(&mut self) {
    if let Some(stream) = self.stream.take() {
      _debug!("Closing TCP stream");
      let _rslt = stream.shutdown(std::net::Shutdown::Both);
    }
  }

  #[inline]
  fn has_data(&mut self) -> bool {
    let Some(stream) = &self.stream else {
      return false;
    };
    match peek(stream) {
      Ok(has_data) => has_data,
      Err(_err) => {
        self.close();
        false
      }
    }
  }

  #[inline]
  fn is_open(&self) -> bool {
    self.stream.is_some()
  }

  #[inline]
  fn read(&mut self, bytes: &mut [u8]) -> crate::Result<usize> {
    let Some(stream) = &mut self.stream else {
      return Err(crate::Error::UnexpectedStreamReadEOF);
    };
    match stream.read(bytes) {
      Ok(0) if !bytes.is_empty() => {
        self.close();
        Ok(0)
      }
      Ok(read) => Ok(read),
      Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => Ok(0),
      Err(err) => {
        self.close();
        Err(err.into())
      }
    }
  }

  #[inline]
  fn write_all(&mut self, bytes: &[u8]) -> crate::Result<()> {
    let Some(stream) = &mut self.stream else {
      return Err(crate::Error::UnexpectedStreamWriteEOF);
    };
    if let Err(err) = stream.write_all(bytes) {
      self.close();
      return Err(err.into());
    }
    Ok(())
  }
}

/// Non-blocking TCP listener.
#[derive(Debug, Default)]
pub struct TcpAcceptor {
  listener: Option<TcpListener>,
  pending: Option<crate::Result<TcpStream>>,
}

impl TcpAcceptor {
  /// Port actually bound. Useful when listening on port `0`.
  #[inline]
  pub fn local_port(&self) -> Option<u16> {
    Some(self.listener.as_ref()?.local_addr().ok()?.port())
  }

  fn try_accept(&mut self) -> crate::Result<Option<TcpStream>> {
    let Some(listener) = &self.listener else {
      return Ok(None);
    };
    match listener.accept() {
      Ok((stream, _addr)) => {
        _debug!("Accepted connection from {_addr}");
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        Ok(Some(stream))
      }
      Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
      Err(err) => Err(err.into()),
    }
  }
}

impl Listener for TcpAcceptor {
  type Transport = TcpTransport;

  #[inline]
  fn accept(&mut self) -> crate::Result<Option<Self::Transport>> {
    let stream = match self.pending.take() {
      Some(elem) => Some(elem?),
      None => self.try_accept()?,
    };
    Ok(stream.map(TcpTransport::from))
  }

  #[inline]
  fn close(&mut self) {
    self.listener = None;
    self.pending = None;
  }

  #[inline]
  fn is_open(&self) -> bool {
    self.listener.is_some()
  }

  #[inline]
  fn listen(&mut self, port: u16) -> crate::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    listener.set_nonblocking(true)?;
    self.listener = Some(listener);
    Ok(())
  }

  #[inline]
  fn poll(&mut self) -> bool {
    if self.pending.is_none() {
      self.pending = match self.try_accept() {
        Ok(elem) => elem.map(Ok),
        Err(err) => {
          _debug!("Failed to accept connection: {err:?}");
          Some(Err(err))
        }
      };
    }
    self.pending.is_some()
  }
}

pub(crate) fn peek(stream: &TcpStream) -> std::io::Result<bool> {
  stream.set_nonblocking(true)?;
  let rslt = match stream.peek(&mut [0; 1]) {
    // Orderly shutdown, the next read will notice.
    Ok(0) => Ok(true),
    Ok(_) => Ok(true),
    Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(false),
    Err(err) => Err(err),
  };
  stream.set_nonblocking(false)?;
  rslt
}
