use crate::{
  misc::ConnectionState,
  rng::Xorshift64,
  transport::{BytesTransport, Transport},
  web_socket::{
    CloseReason, FragmentsPolicy, Frame, Message, MessageKind, MessageRole, OpCode, StreamMode,
    WebSocket, WebSocketError,
  },
};
use alloc::{vec, vec::Vec};

fn encoded(frames: &[Frame]) -> Vec<u8> {
  let mut buffer = Vec::new();
  for frame in frames {
    frame.encode(&mut buffer);
  }
  buffer
}

fn decoded(mut bytes: &[u8]) -> Vec<Frame> {
  let mut frames = Vec::new();
  while !bytes.is_empty() {
    frames.push(Frame::decode(&mut bytes, usize::MAX).unwrap());
  }
  frames
}

fn client(frames: &[Frame]) -> WebSocket<Xorshift64, BytesTransport> {
  WebSocket::new(Xorshift64::from(11), BytesTransport::new(encoded(frames)), true)
}

fn server(frames: &[Frame]) -> WebSocket<Xorshift64, BytesTransport> {
  WebSocket::new(Xorshift64::from(11), BytesTransport::new(encoded(frames)), false)
}

fn ws_error(err: &crate::Error) -> &WebSocketError {
  err.web_socket_error().unwrap()
}

/// Accepts nothing. Stays open until explicitly closed.
#[derive(Debug, Default)]
struct UnwritableTransport {
  state: ConnectionState,
}

impl Transport for UnwritableTransport {
  fn close(&mut self) {
    let _ = self.state.close();
  }

  fn has_data(&mut self) -> bool {
    false
  }

  fn is_open(&self) -> bool {
    self.state.is_open()
  }

  fn read(&mut self, _: &mut [u8]) -> crate::Result<usize> {
    Ok(0)
  }

  fn write_all(&mut self, _: &[u8]) -> crate::Result<()> {
    Err(crate::Error::UnexpectedStreamWriteEOF)
  }
}

#[test]
fn aggregated_message_with_interleaved_ping() {
  let mut ws = client(&[
    Frame::new_unfin(OpCode::Text, b"He".to_vec()),
    Frame::new_fin(OpCode::Ping, b"p".to_vec()),
    Frame::new_unfin(OpCode::Continuation, b"llo".to_vec()),
    Frame::new_fin(OpCode::Continuation, b"!".to_vec()),
  ]);
  assert!(ws.recv().unwrap().is_empty());
  assert_eq!(ws.recv_mode(), StreamMode::Streaming);
  let ping = ws.recv().unwrap();
  assert_eq!((ping.kind(), ping.bytes()), (MessageKind::Ping, &b"p"[..]));
  assert_eq!(ws.recv_mode(), StreamMode::Streaming);
  assert!(ws.recv().unwrap().is_empty());
  let message = ws.recv().unwrap();
  assert_eq!(message, Message::new(MessageKind::Text, MessageRole::Complete, b"Hello!".to_vec()));
  assert_eq!(ws.recv_mode(), StreamMode::Normal);
  assert!(ws.recv().unwrap().is_empty());
  let pongs = decoded(ws.transport().output());
  assert_eq!(pongs.len(), 1);
  assert_eq!(pongs[0].op_code(), OpCode::Pong);
  assert_eq!(pongs[0].payload(), b"p");
  assert!(pongs[0].mask().is_some());
}

#[test]
fn notified_fragments_through_poll() {
  let mut ws = server(&[
    Frame::new(false, Some([1, 2, 3, 4]), OpCode::Binary, vec![1, 2]),
    Frame::new(false, Some([5, 6, 7, 8]), OpCode::Continuation, vec![3]),
    Frame::new(true, Some([9, 9, 9, 9]), OpCode::Continuation, vec![4, 5, 6]),
  ]);
  ws.set_fragments_policy(FragmentsPolicy::Notify);
  let mut messages = Vec::new();
  assert!(ws.poll(|message| messages.push(message)).unwrap());
  let parts = messages.iter().map(|el| (el.kind(), el.role(), el.bytes())).collect::<Vec<_>>();
  assert_eq!(
    parts,
    [
      (MessageKind::Binary, MessageRole::First, &[1, 2][..]),
      (MessageKind::Binary, MessageRole::Continuation, &[3][..]),
      (MessageKind::Binary, MessageRole::Last, &[4, 5, 6][..]),
    ]
  );
  assert!(!ws.poll(|_| {}).unwrap());
}

#[test]
fn policy_change_in_the_middle_of_a_message_keeps_the_connection() {
  let mut ws = server(&[
    Frame::new_unfin(OpCode::Text, b"He".to_vec()),
    Frame::new_fin(OpCode::Continuation, b"llo".to_vec()),
    Frame::new_unfin(OpCode::Text, b"a".to_vec()),
  ]);
  assert!(ws.recv().unwrap().is_empty());
  ws.set_fragments_policy(FragmentsPolicy::Notify);
  assert_eq!(ws.fragments_policy(), FragmentsPolicy::Notify);
  let message = ws.recv().unwrap();
  assert_eq!(message, Message::new(MessageKind::Text, MessageRole::Complete, b"Hello".to_vec()));
  let message = ws.recv().unwrap();
  assert_eq!(message, Message::new(MessageKind::Text, MessageRole::First, b"a".to_vec()));
  assert!(ws.available());
  assert_eq!(ws.close_reason(), CloseReason::None);
  assert!(ws.transport().output().is_empty());
}

#[test]
fn failed_close_frames_still_close_the_transport() {
  let mut ws = WebSocket::new(Xorshift64::from(3), UnwritableTransport::default(), true);
  assert!(ws.available());
  let err = ws.close(CloseReason::GoingAway).unwrap_err();
  assert!(matches!(err, crate::Error::UnexpectedStreamWriteEOF));
  assert!(!ws.available());
  assert_eq!(ws.close_reason(), CloseReason::GoingAway);
  ws.close(CloseReason::NormalClosure).unwrap();
  assert_eq!(ws.close_reason(), CloseReason::GoingAway);
}

#[test]
fn local_close_is_encoded_and_idempotent() {
  let mut ws = server(&[]);
  ws.close(CloseReason::ProtocolError).unwrap();
  assert_eq!(ws.transport().output(), [0b1000_1000, 2, 0x03, 0xEA]);
  assert_eq!(ws.close_reason(), CloseReason::ProtocolError);
  assert!(!ws.available());
  ws.close(CloseReason::NormalClosure).unwrap();
  assert_eq!(ws.transport().output().len(), 4);
  assert_eq!(ws.close_reason(), CloseReason::ProtocolError);
}

#[test]
fn peer_close_is_decoded_and_echoed() {
  let mut ws = server(&[
    Frame::new(true, Some([1, 2, 3, 4]), OpCode::Close, vec![0x03, 0xE8, b'b', b'y', b'e']),
    Frame::new_fin(OpCode::Text, b"ignored".to_vec()),
  ]);
  let message = ws.recv().unwrap();
  assert!(message.is_close());
  assert_eq!(ws.close_reason(), CloseReason::NormalClosure);
  assert!(!ws.available());
  assert_eq!(ws.transport().output(), [0b1000_1000, 2, 0x03, 0xE8]);
  assert!(matches!(ws_error(&ws.recv().unwrap_err()), WebSocketError::ClosedConnection));
}

#[test]
fn peer_close_without_or_with_unknown_code() {
  let mut ws = client(&[Frame::new_fin(OpCode::Close, vec![])]);
  assert!(ws.recv().unwrap().is_close());
  assert_eq!(ws.close_reason(), CloseReason::GoingAway);
  let echo = decoded(ws.transport().output());
  assert_eq!((echo[0].op_code(), echo[0].payload()), (OpCode::Close, &[][..]));

  let mut ws = client(&[Frame::new_fin(OpCode::Close, 4000u16.to_be_bytes().to_vec())]);
  assert!(ws.recv().unwrap().is_close());
  assert_eq!(ws.close_reason(), CloseReason::None);
  assert_eq!(decoded(ws.transport().output())[0].payload(), 4000u16.to_be_bytes());
}

#[test]
fn oversized_control_frames_are_rejected_locally() {
  let mut ws = client(&[]);
  let err = ws.ping(&[0; 126]).unwrap_err();
  assert!(matches!(ws_error(&err), WebSocketError::VeryLargeControlFrame));
  let err = ws.pong(&[0; 126]).unwrap_err();
  assert!(matches!(ws_error(&err), WebSocketError::VeryLargeControlFrame));
  assert!(ws.transport().output().is_empty());
  assert!(ws.available());
  ws.ping(&[0; 125]).unwrap();
  assert_eq!(decoded(ws.transport().output())[0].payload(), [0; 125]);
}

#[test]
fn outbound_streams() {
  let mut ws = server(&[]);
  assert!(matches!(
    ws_error(&ws.continue_stream(b"x").unwrap_err()),
    WebSocketError::UnexpectedSendMode
  ));
  assert!(matches!(ws_error(&ws.end_stream(b"x").unwrap_err()), WebSocketError::UnexpectedSendMode));
  ws.begin_stream(MessageKind::Text, b"He").unwrap();
  assert_eq!(ws.send_mode(), StreamMode::Streaming);
  assert!(matches!(ws_error(&ws.send_text("no").unwrap_err()), WebSocketError::UnexpectedSendMode));
  assert!(matches!(
    ws_error(&ws.begin_stream(MessageKind::Binary, b"no").unwrap_err()),
    WebSocketError::UnexpectedSendMode
  ));
  ws.continue_stream(b"llo").unwrap();
  ws.ping(b"between").unwrap();
  ws.end_stream(b"!").unwrap();
  assert_eq!(ws.send_mode(), StreamMode::Normal);
  ws.send_binary(&[1]).unwrap();
  let frames = decoded(ws.transport().output());
  let summary =
    frames.iter().map(|el| (el.fin(), el.op_code(), el.payload())).collect::<Vec<_>>();
  assert_eq!(
    summary,
    [
      (false, OpCode::Text, &b"He"[..]),
      (false, OpCode::Continuation, &b"llo"[..]),
      (true, OpCode::Ping, &b"between"[..]),
      (true, OpCode::Continuation, &b"!"[..]),
      (true, OpCode::Binary, &[1][..]),
    ]
  );
  assert!(frames.iter().all(|el| el.mask().is_none()));
}

#[test]
fn only_data_kinds_can_be_sent() {
  let mut ws = client(&[]);
  for kind in [MessageKind::Close, MessageKind::Empty, MessageKind::Ping, MessageKind::Pong] {
    assert!(matches!(ws_error(&ws.send(kind, b"").unwrap_err()), WebSocketError::InvalidMessageKind));
  }
  assert!(ws.transport().output().is_empty());
}

#[test]
fn client_frames_are_masked() {
  let mut ws = client(&[]);
  ws.send_text("Hello").unwrap();
  let output = ws.transport().output();
  assert_eq!(output[1], 0b1000_0101);
  assert_eq!(output.len(), 2 + 4 + 5);
  assert_ne!(&output[6..], b"Hello");
  assert_eq!(decoded(output)[0].payload(), b"Hello");
}

#[test]
fn protocol_errors_close_the_connection() {
  let mut ws = server(&[Frame::new(false, Some([1; 4]), OpCode::Continuation, vec![1])]);
  let err = ws.recv().unwrap_err();
  assert!(matches!(ws_error(&err), WebSocketError::UnexpectedFrame));
  assert!(!ws.available());
  assert_eq!(ws.close_reason(), CloseReason::ProtocolError);
  assert_eq!(ws.transport().output(), [0b1000_1000, 2, 0x03, 0xEA]);
}

#[test]
fn very_large_payloads_close_with_message_too_big() {
  let mut ws = server(&[Frame::new(true, Some([1; 4]), OpCode::Binary, vec![0; 300])]);
  ws.set_max_payload_len(256);
  let err = ws.recv().unwrap_err();
  assert!(matches!(ws_error(&err), WebSocketError::VeryLargePayload));
  assert_eq!(ws.close_reason(), CloseReason::MessageTooBig);
  assert_eq!(ws.transport().output(), [0b1000_1000, 2, 0x03, 0xF1]);
  let mut ws = server(&[]);
  ws.set_max_payload_len(2);
  assert!(ws.send_binary(&[1, 2, 3]).is_err());
  assert!(ws.transport().output().is_empty());
}

#[test]
fn transport_failures_are_abnormal_closures() {
  let mut ws = client(&[]);
  ws.transport_mut().push_input(&[0b1000_0001, 5, b'a', b'b']);
  let err = ws.recv().unwrap_err();
  assert!(matches!(ws_error(&err), WebSocketError::ClosedConnection));
  assert_eq!(ws.close_reason(), CloseReason::AbnormalClosure);
  assert!(ws.transport().output().is_empty());
  assert!(!ws.available());
  assert!(ws.send_text("late").is_err());
}

#[test]
fn short_reads_and_large_payloads() {
  let payload = (0..70_000u32).map(|el| el as u8).collect::<Vec<_>>();
  let frames = encoded(&[Frame::new(true, Some([7, 1, 2, 3]), OpCode::Binary, payload.clone())]);
  let transport = BytesTransport::new(frames).with_chunk_len(97);
  let mut ws = WebSocket::new(Xorshift64::from(1), transport, false);
  let message = ws.recv_blocking().unwrap();
  assert_eq!(message.bytes(), payload.as_slice());
}

#[test]
fn nothing_available_yields_empty_messages() {
  let mut ws = client(&[]);
  assert!(ws.recv().unwrap().is_empty());
  assert!(ws.available());
  ws.transport_mut().close();
  assert!(ws.recv().is_err());
}

#[cfg(feature = "web-socket-handshake")]
mod facades {
  use crate::{
    rng::Xorshift64,
    transport::{BytesTransport, Transport},
    web_socket::{
      handshake::derived_key, CloseReason, Frame, OpCode, WebSocket, WebSocketClient,
      WebSocketConnector, WebSocketEvent,
    },
  };
  use alloc::{format, rc::Rc, string::String, vec::Vec};
  use core::cell::RefCell;

  #[test]
  fn client_dispatches_messages_and_events_once() {
    let mut input = Vec::new();
    Frame::new_fin(OpCode::Text, b"hi".to_vec()).encode(&mut input);
    Frame::new_fin(OpCode::Ping, b"p".to_vec()).encode(&mut input);
    Frame::new_fin(OpCode::Pong, Vec::new()).encode(&mut input);
    Frame::new_fin(OpCode::Close, 1000u16.to_be_bytes().to_vec()).encode(&mut input);
    let ws = WebSocket::new(Xorshift64::from(3), BytesTransport::new(input), true);
    let mut client = WebSocketClient::new(ws);
    let events = Rc::new(RefCell::new(Vec::new()));
    let messages = Rc::new(RefCell::new(Vec::new()));
    let events_clone = Rc::clone(&events);
    let messages_clone = Rc::clone(&messages);
    client.on_event(move |event| events_clone.borrow_mut().push(event));
    client.on_message(move |message| messages_clone.borrow_mut().push(message.into_bytes()));
    assert!(client.poll().unwrap());
    assert!(!client.poll().unwrap());
    assert!(!client.available(true));
    client.close(CloseReason::NormalClosure).unwrap();
    assert_eq!(*messages.borrow(), [b"hi".to_vec()]);
    assert_eq!(
      *events.borrow(),
      [
        WebSocketEvent::ConnectionOpened,
        WebSocketEvent::GotPing,
        WebSocketEvent::GotPong,
        WebSocketEvent::ConnectionClosed(CloseReason::NormalClosure),
      ]
    );
  }

  #[test]
  fn client_send_continues_open_streams() {
    let ws = WebSocket::new(Xorshift64::from(3), BytesTransport::default(), false);
    let mut client = WebSocketClient::new(ws);
    client.stream("a").unwrap();
    client.send("b").unwrap();
    client.end().unwrap();
    client.send_binary(&[1]).unwrap();
    let mut output = client.web_socket().transport().output();
    let mut op_codes = Vec::new();
    while !output.is_empty() {
      let frame = Frame::decode(&mut output, usize::MAX).unwrap();
      op_codes.push((frame.fin(), frame.op_code()));
    }
    assert_eq!(
      op_codes,
      [
        (false, OpCode::Text),
        (false, OpCode::Continuation),
        (true, OpCode::Continuation),
        (true, OpCode::Binary),
      ]
    );
  }

  #[test]
  fn connector_sends_credentials_and_configures_the_endpoint() {
    let key = "dGhlIHNhbXBsZSBub25jZQ==";
    let mut buffer = [0; 30];
    let accept = core::str::from_utf8(derived_key(&mut buffer, key.as_bytes())).unwrap();
    let res = format!(
      "HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\
       Sec-WebSocket-Accept: {accept}\r\n\r\n"
    );
    let client = WebSocketConnector::default()
      .basic_auth("user", "pass")
      .header("Sec-WebSocket-Key", key)
      .max_payload_len(10)
      .connect("localhost", "/", BytesTransport::new(res.into_bytes()))
      .unwrap();
    let request = String::from_utf8(client.web_socket().transport().output().to_vec()).unwrap();
    assert!(request.contains("Authorization: Basic dXNlcjpwYXNz\r\n"));
    assert_eq!(client.web_socket().max_payload_len(), 10);
    assert!(client.web_socket().use_masking());
  }

  #[test]
  fn failed_handshakes_close_the_transport() {
    let mut transport = BytesTransport::new(b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());
    assert!(WebSocketConnector::default().connect("localhost", "/", &mut transport).is_err());
    assert!(!transport.is_open());
  }

  #[cfg(feature = "std")]
  #[test]
  fn tcp_echo() {
    use crate::{rng::StdRng, transport::TcpAcceptor, web_socket::WebSocketServer};
    use std::{thread, time::Duration};

    #[cfg(feature = "_tracing-tree")]
    let _rslt = crate::misc::tracing_tree_init(None);
    let mut server = WebSocketServer::new(TcpAcceptor::default());
    server.listen(0).unwrap();
    let port = server.listener().local_port().unwrap();
    let client_jh = thread::spawn(move || {
      let mut client =
        WebSocketConnector::default().connect_tcp("127.0.0.1", port, "/echo").unwrap();
      client.send("Hello").unwrap();
      let message = client.read_blocking().unwrap();
      assert_eq!(message.text().unwrap(), "Hello");
      client.close(CloseReason::NormalClosure).unwrap();
    });
    while !server.poll() {
      thread::sleep(Duration::from_millis(1));
    }
    let mut peer = server.accept(StdRng::default()).unwrap().unwrap();
    assert!(!peer.web_socket().use_masking());
    let message = peer.read_blocking().unwrap();
    peer.send(message.text().unwrap()).unwrap();
    let close = peer.read_blocking().unwrap();
    assert!(close.is_close());
    assert_eq!(peer.close_reason(), CloseReason::NormalClosure);
    client_jh.join().unwrap();
    server.close();
    assert!(!server.available());
  }
}
