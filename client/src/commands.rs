//! Local slash-commands recognised by the client
//!
//! Commands never travel over the wire. A line is a command only if it
//! starts with `/`, and it must match a known command exactly.

/// Lines printed for `/help`
pub const HELP_TEXT: &[&str] = &[
    "Available commands:",
    "/help - show available commands",
    "/exit - leave the chat",
];

pub const EXIT_TEXT: &str = "You left the chat.";

pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Type /help for a list of commands.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Unknown(String),
}

/// One line of console input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Message(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        if !line.starts_with('/') {
            return Input::Message(line.to_string());
        }

        let command = match line {
            "/help" => Command::Help,
            "/exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };
        Input::Command(command)
    }
}
