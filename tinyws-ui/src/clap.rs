use clap::Parser;

pub(crate) fn init() -> tinyws::Result<()> {
  let args = Cli::parse();
  match args.commands {
    Commands::_Nothing => {}
    #[cfg(feature = "web-socket")]
    Commands::Ws(elem) => match (elem.connect, elem.serve) {
      (None, None) | (Some(_), Some(_)) => {
        eprintln!("Please connect to a server using `-c` or listen to requests using `-s`");
      }
      (None, Some(uri)) => {
        crate::web_socket::serve(
          &uri,
          |payload| println!("{payload:?}"),
          |err| eprintln!("{err}"),
        )?;
      }
      (Some(uri), None) => {
        crate::web_socket::connect(&uri, |payload| println!("{payload}"))?;
      }
    },
  }
  Ok(())
}

/// Command-line interface for the TinyWS WebSocket engine
#[derive(Debug, clap::Parser)]
#[command(author, long_about = None, name = "tinyws", version)]
struct Cli {
  #[command(subcommand)]
  commands: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
  #[clap(skip)]
  _Nothing,
  #[cfg(feature = "web-socket")]
  Ws(Ws),
}

/// WebSocket
#[cfg(feature = "web-socket")]
#[derive(Debug, clap::Args)]
struct Ws {
  /// Connects to a server
  #[arg(short = 'c', value_name = "URI")]
  connect: Option<String>,
  /// Echoes every message received by a local server
  #[arg(short = 's', value_name = "URI")]
  serve: Option<String>,
}
