//! Parsing of [UCI] commands into a typed [`Command`].
//!
//! The parser is deliberately forgiving: unknown or malformed input becomes
//! [`Command::Unknown`] and is reported rather than acted on, since a
//! tournament manager is expected to send well-formed commands.
//!
//! [UCI]: https://www.chessprogramming.org/UCI

use crate::search::Depth;

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Uci,
    IsReady,
    NewGame,
    SetPosition {
        key: Option<String>,
        moves: Vec<String>,
    },
    Go {
        depth: Option<Depth>,
        wtime: Option<u64>,
        btime: Option<u64>,
        winc: Option<u64>,
        binc: Option<u64>,
        movetime: Option<u64>,
        infinite: bool,
    },
    SetOption {
        name: String,
        value: Option<String>,
    },
    Eval,
    Stop,
    Quit,
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return Command::Unknown(input.to_string());
        }

        match parts[0] {
            "uci" => Command::Uci,
            "isready" => Command::IsReady,
            "ucinewgame" => Command::NewGame,
            "position" => parse_position(&parts),
            "go" => parse_go(&parts),
            "setoption" => parse_setoption(&parts, input),
            "eval" => Command::Eval,
            "stop" => Command::Stop,
            "quit" => Command::Quit,
            _ => Command::Unknown(input.to_string()),
        }
    }
}

fn parse_position(parts: &[&str]) -> Command {
    let moves_index = parts.iter().position(|&part| part == "moves");
    let key = parts
        .iter()
        .position(|&part| part == "fen")
        .map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(" "));
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..]
            .iter()
            .map(|part| (*part).to_string())
            .collect()
    });
    Command::SetPosition { key, moves }
}

fn parse_go(parts: &[&str]) -> Command {
    let mut depth = None;
    let mut wtime = None;
    let mut btime = None;
    let mut winc = None;
    let mut binc = None;
    let mut movetime = None;
    let mut infinite = false;

    let mut index = 1;
    while index < parts.len() {
        match parts[index] {
            "depth" if index + 1 < parts.len() => depth = parts[index + 1].parse().ok(),
            "wtime" if index + 1 < parts.len() => wtime = parts[index + 1].parse().ok(),
            "btime" if index + 1 < parts.len() => btime = parts[index + 1].parse().ok(),
            "winc" if index + 1 < parts.len() => winc = parts[index + 1].parse().ok(),
            "binc" if index + 1 < parts.len() => binc = parts[index + 1].parse().ok(),
            "movetime" if index + 1 < parts.len() => movetime = parts[index + 1].parse().ok(),
            "infinite" => infinite = true,
            _ => {}
        }
        if parts[index] == "infinite" {
            index += 1;
        } else {
            index += 2;
        }
    }

    Command::Go {
        depth,
        wtime,
        btime,
        winc,
        binc,
        movetime,
        infinite,
    }
}

fn parse_setoption(parts: &[&str], input: &str) -> Command {
    if parts.len() < 3 || parts[1] != "name" {
        return Command::Unknown(input.to_string());
    }
    let value_index = parts.iter().position(|&part| part == "value");
    let name = parts[2..value_index.unwrap_or(parts.len())].join(" ");
    if name.is_empty() {
        return Command::Unknown(input.to_string());
    }
    let value = value_index.map(|index| parts[index + 1..].join(" "));
    Command::SetOption { name, value }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_handshake_commands() {
        assert_eq!(Command::parse("uci"), Command::Uci);
        assert_eq!(Command::parse("isready"), Command::IsReady);
        assert_eq!(Command::parse("ucinewgame"), Command::NewGame);
        assert_eq!(Command::parse("stop"), Command::Stop);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("eval"), Command::Eval);
    }

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position startpos moves e2e4 e7e5"),
            Command::SetPosition {
                key: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
        assert_eq!(
            Command::parse(
                "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4"
            ),
            Command::SetPosition {
                key: Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()),
                moves: vec!["e2e4".to_string()]
            }
        );
        assert_eq!(
            Command::parse("position startpos"),
            Command::SetPosition {
                key: None,
                moves: vec![]
            }
        );
    }

    #[test]
    fn parse_go_with_clocks() {
        assert_eq!(
            Command::parse("go depth 6 wtime 300000 btime 300000 winc 2000 binc 2000"),
            Command::Go {
                depth: Some(6),
                wtime: Some(300_000),
                btime: Some(300_000),
                winc: Some(2000),
                binc: Some(2000),
                movetime: None,
                infinite: false,
            }
        );
        assert_eq!(
            Command::parse("go movetime 5000"),
            Command::Go {
                depth: None,
                wtime: None,
                btime: None,
                winc: None,
                binc: None,
                movetime: Some(5000),
                infinite: false,
            }
        );
        assert_eq!(
            Command::parse("go infinite"),
            Command::Go {
                depth: None,
                wtime: None,
                btime: None,
                winc: None,
                binc: None,
                movetime: None,
                infinite: true,
            }
        );
    }

    #[test]
    fn parse_options() {
        assert_eq!(
            Command::parse("setoption name AggressiveMode value true"),
            Command::SetOption {
                name: "AggressiveMode".to_string(),
                value: Some("true".to_string())
            }
        );
        assert_eq!(
            Command::parse("setoption name Strategy value pvs"),
            Command::SetOption {
                name: "Strategy".to_string(),
                value: Some("pvs".to_string())
            }
        );
        assert_eq!(
            Command::parse("setoption name Ponder"),
            Command::SetOption {
                name: "Ponder".to_string(),
                value: None
            }
        );
        assert_eq!(
            Command::parse("setoption value 42"),
            Command::Unknown("setoption value 42".to_string())
        );
    }

    #[test]
    fn unknown_commands_are_preserved() {
        assert_eq!(
            Command::parse("xyzzy now"),
            Command::Unknown("xyzzy now".to_string())
        );
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }
}
