//! Line-oriented text protocol for driving a session from another process.
//!
//! The framing follows GTP: each request is one line with an optional
//! numeric id, each response starts with `=` (success) or `?` (failure),
//! echoes the id, and ends with a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `reset` - Start a new match with the same settings
//! - `place <side> <square>` - e.g. `place A B2`
//! - `move <side> <from> <to>` - e.g. `move B C2 C3`
//! - `end_turn <side>` - Always refused while the turn still owes an action
//! - `genmove` - Let the AI play the current owner's turn
//! - `legal <square>` - Destinations for the piece on `square`
//! - `showboard` - Board as text
//! - `state` - Snapshot as JSON
//!
//! When the session has an AI side, a successful human command that hands
//! the turn to that side is answered by the AI straight away; its actions
//! are appended to the response after `ai`.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{debug, warn};

use crate::board::{Side, Square};
use crate::session::{AiAction, Config, Session};

const KNOWN_COMMANDS: &[&str] = &[
    "end_turn",
    "genmove",
    "known_command",
    "legal",
    "list_commands",
    "move",
    "name",
    "place",
    "protocol_version",
    "quit",
    "reset",
    "showboard",
    "state",
    "version",
];

/// Protocol front end owning one session.
pub struct ProtocolEngine {
    session: Session,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ProtocolEngine {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::with_config(config),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Serve requests from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            if !success {
                debug!(%command, %message, "command refused");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric id from the start of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        match line[..end].parse::<u32>() {
            Ok(id) => (Some(id), line[end..].trim()),
            Err(_) => (None, line),
        }
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(message) => (true, message),
            Err(err) => (false, err.to_string()),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok("seega".to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "protocol_version" => Ok("1".to_string()),
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "known_command" => {
                let cmd = arg(args, 0)?.to_lowercase();
                Ok(KNOWN_COMMANDS.contains(&cmd.as_str()).to_string())
            }
            "quit" => Ok(String::new()),

            "reset" => {
                self.session.reset()?;
                Ok(String::new())
            }

            "place" => {
                let side: Side = arg(args, 0)?.parse()?;
                let at: Square = arg(args, 1)?.parse()?;
                self.session.place(side, at.row, at.col)?;
                Ok(self.auto_reply())
            }

            "move" => {
                let side: Side = arg(args, 0)?.parse()?;
                let from: Square = arg(args, 1)?.parse()?;
                let to: Square = arg(args, 2)?.parse()?;
                let outcome = self.session.play_move(side, from, to)?;

                let mut words: Vec<String> =
                    outcome.captured.iter().map(|sq| format!("x{sq}")).collect();
                if let Some(sq) = outcome.must_continue_from {
                    words.push(format!("chain {sq}"));
                }
                if let Some(winner) = outcome.winner {
                    words.push(format!("winner {winner}"));
                }
                let reply = self.auto_reply();
                if !reply.is_empty() {
                    words.push(reply);
                }
                Ok(words.join(" "))
            }

            "end_turn" => {
                let side: Side = arg(args, 0)?.parse()?;
                self.session.end_turn(side)?;
                Ok(String::new())
            }

            "genmove" => {
                let turn = self.session.run_ai_turn()?;
                let mut message = format_trace(&turn.trace);
                let reply = self.auto_reply();
                if !reply.is_empty() {
                    message.push(' ');
                    message.push_str(&reply);
                }
                Ok(message)
            }

            "legal" => {
                let from: Square = arg(args, 0)?.parse()?;
                let dests: Vec<String> = self
                    .session
                    .legal_moves_from(from)
                    .iter()
                    .map(Square::to_string)
                    .collect();
                Ok(dests.join(" "))
            }

            "showboard" => Ok(format!("\n{}", self.session.board())),

            "state" => Ok(serde_json::to_string(&self.session.snapshot())?),

            _ => anyhow::bail!("unknown command: {command}"),
        }
    }

    /// Let the configured AI side answer if the turn just passed to it.
    fn auto_reply(&mut self) -> String {
        let Some(ai_side) = self.session.config().ai_side else {
            return String::new();
        };
        if self.session.turn().owner() != Some(ai_side) {
            return String::new();
        }
        match self.session.run_ai_turn() {
            Ok(turn) => format!("ai {}", format_trace(&turn.trace)),
            Err(err) => {
                warn!(%err, "AI could not answer");
                String::new()
            }
        }
    }
}

fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("missing argument"))
}

fn format_trace(trace: &[AiAction]) -> String {
    trace
        .iter()
        .map(AiAction::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
