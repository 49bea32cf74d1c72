#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use seabattle::{init_logging, run_client, Server, ServerConfig};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the match server.
    Serve {
        #[arg(long, default_value = seabattle::DEFAULT_BIND)]
        bind: String,
        #[arg(long, default_value_t = 600, help = "Drop lobby connections silent for this long")]
        idle_timeout_secs: u64,
        #[arg(long, default_value_t = 30, help = "Timeout for a single frame read or write")]
        io_timeout_secs: u64,
        #[arg(long, default_value_t = seabattle::DEFAULT_MAX_FRAME_SIZE)]
        max_frame_size: u32,
    },
    /// Connect to a server and play from the terminal.
    Client {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            idle_timeout_secs,
            io_timeout_secs,
            max_frame_size,
        } => {
            let config = ServerConfig {
                bind,
                io_timeout: Duration::from_secs(io_timeout_secs),
                idle_timeout: Duration::from_secs(idle_timeout_secs),
                max_frame_size,
            };
            let server = Server::bind(config).await?;
            println!("Seabattle server listening on {}", server.local_addr()?);
            server
                .run(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        eprintln!("Failed to listen for ctrl-c: {}", e);
                    }
                })
                .await?;
        }
        Commands::Client { connect } => {
            println!("Connecting to {}...", connect);
            run_client(&connect).await?;
        }
    }
    Ok(())
}
