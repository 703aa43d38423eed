//! WebSocket

#![no_main]

use tinyws::{
  rng::{simple_seed, Xorshift64},
  transport::BytesTransport,
  web_socket::{Frame, OpCode, WebSocket},
};

libfuzzer_sys::fuzz_target!(|data: (OpCode, bool, Vec<u8>)| {
  let (op_code, fin, payload) = data;
  let mut bytes = Vec::new();
  Frame::new(fin, Some([1, 2, 3, 4]), op_code, payload).encode(&mut bytes);
  let transport = BytesTransport::new(bytes);
  let mut ws = WebSocket::new(Xorshift64::from(simple_seed()), transport, false);
  ws.set_max_payload_len(u16::MAX.into());
  let _rslt = ws.recv();
});
