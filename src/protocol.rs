//! Line-oriented text protocol carrying the session operations.
//!
//! Each request is one line: an optional numeric id, a command name, and
//! arguments. Responses follow the GTP convention: `=` on success, `?` on
//! failure, the id echoed, then the payload and a blank line. The `move`
//! and `score` commands take a JSON request body and answer with JSON.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return protocol version (1)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `komi <value>` - Replace the engine with one using this komi
//! - `depth <plies>` - Replace the engine with one searching this deep
//! - `move <json>` - Apply a move request and answer with the AI's reply
//! - `score <json>` - Score a board
//!
//! ## Example
//!
//! ```
//! use baduk_ai::protocol::Server;
//! use baduk_ai::search::EngineConfig;
//!
//! let mut server = Server::new(EngineConfig::default());
//! let mut out = Vec::new();
//! server.run("1 name\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "=1 baduk-ai\n\n");
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::search::{Engine, EngineConfig};
use crate::session::{self, ErrorResponse, MoveRequest, ScoreRequest, SessionError};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "depth",
    "known_command",
    "komi",
    "list_commands",
    "move",
    "name",
    "protocol_version",
    "quit",
    "score",
    "version",
];

/// Protocol server state: just the engine, since games are not stored.
pub struct Server {
    engine: Engine,
}

impl Default for Server {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Server {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let (command, args) = match command_line.split_once(char::is_whitespace) {
                Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
                None => (command_line.to_lowercase(), ""),
            };
            if command.is_empty() {
                continue;
            }

            debug!(%command, "received command");
            let (success, message) = self.execute(&command, args);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            let sep = if message.is_empty() { "" } else { " " };
            write!(output, "{prefix}{id_str}{sep}{message}\n\n")
                .context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &str) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "komi" => match args.parse::<f64>() {
                Ok(komi) if komi.is_finite() => {
                    self.reconfigure(EngineConfig {
                        komi,
                        ..*self.engine.config()
                    });
                    (true, String::new())
                }
                _ => (false, "invalid komi".to_string()),
            },

            "depth" => match args.parse::<u8>() {
                Ok(depth) if depth >= 1 => {
                    self.reconfigure(EngineConfig {
                        depth,
                        ..*self.engine.config()
                    });
                    (true, String::new())
                }
                _ => (false, "invalid depth".to_string()),
            },

            "move" => self.handle_json::<MoveRequest, _>(args, |engine, req| {
                session::play(engine, req)
            }),

            "score" => self.handle_json::<ScoreRequest, _>(args, |engine, req| {
                session::score(engine, req)
            }),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn reconfigure(&mut self, config: EngineConfig) {
        self.engine = Engine::new(config);
    }

    /// Decode a JSON request, run `op`, and encode either the response or
    /// an `{"error": ...}` body.
    fn handle_json<Req, Resp>(
        &self,
        args: &str,
        op: impl FnOnce(&Engine, &Req) -> Result<Resp, SessionError>,
    ) -> (bool, String)
    where
        Req: serde::de::DeserializeOwned,
        Resp: Serialize,
    {
        let req: Req = match serde_json::from_str(args) {
            Ok(req) => req,
            Err(err) => {
                return (false, error_body(&format!("invalid request: {err}")));
            }
        };
        match op(&self.engine, &req) {
            Ok(resp) => match serde_json::to_string(&resp) {
                Ok(body) => (true, body),
                Err(err) => (false, error_body(&err.to_string())),
            },
            Err(err) => (false, encode_error(&err)),
        }
    }
}

fn encode_error(err: &SessionError) -> String {
    serde_json::to_string(&ErrorResponse::from(err)).unwrap_or_else(|_| err.to_string())
}

fn error_body(message: &str) -> String {
    let resp = ErrorResponse {
        error: message.to_string(),
    };
    serde_json::to_string(&resp).unwrap_or_else(|_| message.to_string())
}
