//! Client connection: relays console input to the server and prints what comes back

use crate::commands::{Command, Input, EXIT_TEXT, HELP_TEXT, UNKNOWN_COMMAND_TEXT};
use log::{error, info};
use shared::{decode, encode};
use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

pub const CONNECTED_TEXT: &str = "Connected to chat. Please enter your name:";

pub const CLOSED_TEXT: &str = "Connection closed.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why the client stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientExit {
    /// The user typed `/exit`
    UserExit,
    /// The server closed the connection
    ServerClosed,
    /// Console input reached end of stream
    InputClosed,
}

/// A chat connection over any line-based transport; TCP by default
pub struct Client<R = BufReader<OwnedReadHalf>, W = OwnedWriteHalf> {
    lines: Lines<R>,
    writer: W,
}

impl Client {
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        info!("Connected to {}", addr);

        let (read_half, writer) = stream.into_split();
        Ok(Client::new(BufReader::new(read_half), writer))
    }
}

impl<R, W> Client<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Client {
            lines: reader.lines(),
            writer,
        }
    }

    /// Runs until the user exits, the server hangs up or `input` ends
    ///
    /// Incoming lines are decoded and printed to `output`. Console lines are
    /// either handled as local commands or encoded and sent.
    pub async fn run<I, O>(mut self, input: I, mut output: O) -> Result<ClientExit, ClientError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        print_line(&mut output, CONNECTED_TEXT).await?;

        let mut console = input.lines();

        let exit = loop {
            tokio::select! {
                incoming = self.lines.next_line() => {
                    match incoming {
                        Ok(Some(line)) => print_line(&mut output, &decode(&line)).await?,
                        Ok(None) => break ClientExit::ServerClosed,
                        Err(e) => {
                            error!("Error receiving message: {}", e);
                            break ClientExit::ServerClosed;
                        }
                    }
                },

                typed = console.next_line() => {
                    let Some(line) = typed? else {
                        break ClientExit::InputClosed;
                    };

                    match Input::parse(&line) {
                        Input::Message(text) => self.send(&text).await?,
                        Input::Command(Command::Help) => {
                            for help in HELP_TEXT {
                                print_line(&mut output, help).await?;
                            }
                        }
                        Input::Command(Command::Exit) => {
                            print_line(&mut output, EXIT_TEXT).await?;
                            break ClientExit::UserExit;
                        }
                        Input::Command(Command::Unknown(_)) => {
                            print_line(&mut output, UNKNOWN_COMMAND_TEXT).await?;
                        }
                    }
                },
            }
        };

        if let Err(e) = self.writer.shutdown().await {
            error!("Error closing connection: {}", e);
        }
        print_line(&mut output, CLOSED_TEXT).await?;

        Ok(exit)
    }

    async fn send(&mut self, text: &str) -> Result<(), ClientError> {
        self.writer.write_all(encode(text).as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

async fn print_line<O>(output: &mut O, text: &str) -> std::io::Result<()>
where
    O: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
