//! Miscellaneous

mod connection_state;
mod ws_url;

pub use connection_state::ConnectionState;
pub use ws_url::WsUrl;
#[cfg(all(feature = "std", feature = "web-socket-handshake"))]
pub(crate) use ws_url::host_header;

/// A tracing register with optioned parameters.
#[cfg(feature = "_tracing-tree")]
#[inline]
pub fn tracing_tree_init(
  fallback_opt: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
  use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
  let fallback = fallback_opt.unwrap_or("");
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
  let tracing_tree = tracing_tree::HierarchicalLayer::default()
    .with_indent_amount(2)
    .with_indent_lines(true)
    .with_targets(true)
    .with_thread_ids(true)
    .with_verbose_entry(false)
    .with_verbose_exit(false)
    .with_writer(std::io::stderr);
  tracing_subscriber::Registry::default().with(env_filter).with(tracing_tree).try_init()
}

/// Splits `bytes` at every `elem` occurrence.
#[cfg(feature = "web-socket-handshake")]
pub(crate) fn bytes_split1(bytes: &[u8], elem: u8) -> impl Iterator<Item = &[u8]> {
  bytes.split(move |byte| *byte == elem)
}

/// Removes leading and trailing ASCII whitespaces.
pub(crate) fn _trim_bytes(bytes: &[u8]) -> &[u8] {
  let mut local = bytes;
  while let [first, rest @ ..] = local {
    if first.is_ascii_whitespace() {
      local = rest;
    } else {
      break;
    }
  }
  while let [rest @ .., last] = local {
    if last.is_ascii_whitespace() {
      local = rest;
    } else {
      break;
    }
  }
  local
}
