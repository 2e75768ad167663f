use clap::Parser;
use client::network::{Client, ClientExit};
use log::info;
use shared::DEFAULT_PORT;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let client = Client::connect(&args.server).await?;
    let exit = client
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    info!("Client stopped: {:?}", exit);

    // A pending stdin read blocks runtime shutdown
    if exit != ClientExit::InputClosed {
        std::process::exit(0);
    }

    Ok(())
}
