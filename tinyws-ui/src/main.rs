//! Command-line interface of TinyWS

#[cfg(feature = "clap")]
mod clap;
#[cfg(feature = "web-socket")]
mod web_socket;

fn main() -> tinyws::Result<()> {
  let _rslt = tinyws::misc::tracing_tree_init(None);
  #[cfg(feature = "clap")]
  clap::init()?;
  Ok(())
}
