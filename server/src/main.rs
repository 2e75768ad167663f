use clap::Parser;
use log::{error, info};
use server::admin::run_admin_console;
use server::listener::Server;
use shared::DEFAULT_PORT;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

/// Parses command-line arguments, binds the listener, then runs the accept
/// loop alongside the operator console.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::new(&address).await?;

    info!("Chat server started. Lines typed here are sent to everyone.");

    let registry = server.registry();
    tokio::spawn(async move {
        run_admin_console(registry, BufReader::new(tokio::io::stdin())).await;
    });

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            // A pending stdin read blocks runtime shutdown
            std::process::exit(0);
        }
    }

    Ok(())
}
