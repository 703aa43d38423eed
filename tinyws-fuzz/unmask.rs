//! Unmask

#![no_main]

libfuzzer_sys::fuzz_target!(|data: (Vec<u8>, [u8; 4])| {
  let (mut bytes, mask) = data;
  let original = bytes.clone();
  tinyws::web_socket::unmask(&mut bytes, mask);
  tinyws::web_socket::unmask(&mut bytes, mask);
  assert_eq!(bytes, original);
});
