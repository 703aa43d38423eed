use std::{
  io::{BufRead, BufReader},
  sync::mpsc,
  thread,
  time::Duration,
};
use tinyws::{
  misc::WsUrl,
  rng::StdRng,
  transport::TcpAcceptor,
  web_socket::{CloseReason, MessageKind, WebSocketConnector, WebSocketEvent, WebSocketServer},
};

/// Sends every line of the standard input and prints every received text message.
pub(crate) fn connect(uri: &str, cb: fn(&str)) -> tinyws::Result<()> {
  if WsUrl::parse(uri)?.is_secure() {
    return connect_tls(uri, cb);
  }
  let mut client = WebSocketConnector::default().rng(StdRng::default()).connect_uri(uri)?;
  let (sender, receiver) = mpsc::channel();
  let _jh = thread::spawn(move || {
    for line in BufReader::new(std::io::stdin()).lines().map_while(Result::ok) {
      if sender.send(line).is_err() {
        break;
      }
    }
  });
  client.on_message(move |message| {
    if let Ok(text) = message.text() {
      cb(text);
    }
  });
  client.on_event(|event| {
    if let WebSocketEvent::ConnectionClosed(reason) = event {
      eprintln!("Connection closed: {reason:?}");
    }
  });
  while client.available(false) {
    let _ = client.poll()?;
    while let Ok(line) = receiver.try_recv() {
      client.send(&line)?;
    }
    thread::sleep(Duration::from_millis(10));
  }
  Ok(())
}

#[cfg(feature = "rustls")]
fn connect_tls(uri: &str, cb: fn(&str)) -> tinyws::Result<()> {
  let mut client = WebSocketConnector::default().rng(StdRng::default()).connect_tls_uri(uri)?;
  loop {
    let message = client.read_blocking()?;
    if message.is_close() {
      break;
    }
    if let Ok(text) = message.text() {
      cb(text);
    }
  }
  Ok(())
}

#[cfg(not(feature = "rustls"))]
fn connect_tls(_: &str, _: fn(&str)) -> tinyws::Result<()> {
  Err(tinyws::Error::UnsupportedScheme)
}

/// Echoes back every message of every connection, one connection at a time.
pub(crate) fn serve(uri: &str, binary: fn(&[u8]), error: fn(tinyws::Error)) -> tinyws::Result<()> {
  let url = WsUrl::parse(uri)?;
  let mut server = WebSocketServer::new(TcpAcceptor::default());
  server.listen(url.port())?;
  while server.available() {
    if !server.poll() {
      thread::sleep(Duration::from_millis(10));
      continue;
    }
    let mut client = match server.accept(StdRng::default()) {
      Ok(Some(elem)) => elem,
      Ok(None) => continue,
      Err(err) => {
        error(err);
        continue;
      }
    };
    loop {
      let message = match client.read_blocking() {
        Ok(elem) => elem,
        Err(err) => {
          error(err);
          break;
        }
      };
      if message.is_close() {
        break;
      }
      let rslt = match message.kind() {
        MessageKind::Binary => {
          binary(message.bytes());
          client.send_binary(message.bytes())
        }
        MessageKind::Text => message.text().and_then(|text| {
          println!("{text}");
          client.send(text)
        }),
        _ => Ok(()),
      };
      if let Err(err) = rslt {
        error(err);
        let _rslt = client.close(CloseReason::InternalServerError);
        break;
      }
    }
  }
  Ok(())
}
