use crate::transport::Transport;
use alloc::{string::String, sync::Arc};
use rustls::{pki_types::ServerName, ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::{
  io::{ErrorKind, Read, Write},
  net::TcpStream,
};

/// TCP connection wrapped by a TLS client session. Certificates are verified against the
/// Mozilla root store.
#[derive(Debug)]
pub struct TlsTransport {
  stream: Option<StreamOwned<ClientConnection, TcpStream>>,
}

impl TlsTransport {
  /// Connects to `host` and performs the TLS handshake on the first read or write.
  #[inline]
  pub fn connect(host: &str, port: u16) -> crate::Result<Self> {
    let root_store = RootCertStore { roots: webpki_roots::TLS_SERVER_ROOTS.to_vec() };
    let config = ClientConfig::builder().with_root_certificates(root_store).with_no_client_auth();
    Self::connect_with_config(host, port, Arc::new(config))
  }

  /// Same as [`TlsTransport::connect`] but with a custom `rustls` configuration.
  #[inline]
  pub fn connect_with_config(
    host: &str,
    port: u16,
    config: Arc<ClientConfig>,
  ) -> crate::Result<Self> {
    let server_name = ServerName::try_from(String::from(host))?;
    let connection = ClientConnection::new(config, server_name)?;
    let tcp = TcpStream::connect((host, port))?;
    tcp.set_nodelay(true)?;
    Ok(Self { stream: Some(StreamOwned::new(connection, tcp)) })
  }
}

impl Transport for TlsTransport {
  #[inline]
  fn close(&mut self) {
    if let Some(mut stream) = self.stream.take() {
      stream.conn.send_close_notify();
      let _rslt = stream.conn.complete_io(&mut stream.sock);
      let _rslt = stream.sock.shutdown(std::net::Shutdown::Both);
    }
  }

  #[inline]
  fn has_data(&mut self) -> bool {
    let Some(stream) = &mut self.stream else {
      return false;
    };
    let has_plaintext =
      stream.conn.process_new_packets().map(|el| el.plaintext_bytes_to_read() > 0).unwrap_or(false);
    has_plaintext || crate::transport::std::peek(&stream.sock).unwrap_or(false)
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
    if let Err(err) = stream.write_all(bytes).and_then(|()| stream.flush()) {
      self.close();
      return Err(err.into());
    }
    Ok(())
  }
}
