//! Parse

#![no_main]

use tinyws::web_socket::Frame;

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
  let mut bytes = data;
  while let Ok(_frame) = Frame::decode(&mut bytes, u16::MAX.into()) {}
});
