//! Command parser for the board session protocol.
//!
//! Parses incoming text lines into structured `Command` variants that the
//! session loop can dispatch on.

use glam::DVec3;
use tracing::warn;

use crate::board::Coordinate;
use crate::geometry::Direction;
use crate::piece::PlayerId;

/// How the `create` command orients a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Facing {
    Direction(Direction),
    /// Continuous yaw in degrees, snapped to the nearest cardinal.
    Yaw(f64),
}

/// A parsed client-to-session command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Synchronization ping; the session must reply `readyok`.
    IsReady,

    /// Set a board option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Drop the current game and its pieces, keeping board and options.
    NewGame,

    /// Build a board: `create <world> <x> <y> <z> facing <dir>|yaw <deg>`.
    Create {
        world: String,
        anchor: DVec3,
        facing: Facing,
    },

    /// Start spawning pieces, optionally from a FEN placement field.
    Spawn { fen: Option<String> },

    /// Advance the host loop by `count` ticks.
    Tick { count: u64 },

    /// A player claims the piece on a square.
    Claim {
        player: PlayerId,
        coordinate: Coordinate,
    },

    /// Move the game to its next phase.
    Advance,

    /// Report the current phase.
    Phase,

    /// Print the game as a JSON record.
    Save,

    /// Replace the game with one restored from a JSON record.
    Load { json: String },

    /// Terminate the session.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "isready" => Some(Command::IsReady),
        "newgame" => Some(Command::NewGame),
        "advance" => Some(Command::Advance),
        "phase" => Some(Command::Phase),
        "save" => Some(Command::Save),
        "quit" => Some(Command::Quit),

        "setoption" => parse_setoption(&tokens),
        "create" => parse_create(&tokens),
        "spawn" => parse_spawn(&tokens),
        "tick" => parse_tick(&tokens),
        "claim" => parse_claim(&tokens),
        "load" => parse_load(trimmed),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name_parts, value_parts) = match value_idx {
        Some(vi) => (&tokens[2..vi], &tokens[vi + 1..]),
        None => (&tokens[2..], &tokens[tokens.len()..]),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses `create <world> <x> <y> <z> facing <dir>` or `... yaw <deg>`.
fn parse_create(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 7 {
        warn!("malformed create: expected 'create <world> <x> <y> <z> facing <dir>|yaw <deg>'");
        return None;
    }

    let mut xyz = [0.0; 3];
    for (slot, token) in xyz.iter_mut().zip(&tokens[2..5]) {
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => *slot = v,
            _ => {
                warn!(value = token, "invalid anchor coordinate");
                return None;
            }
        }
    }

    let facing = match (tokens[5], tokens[6]) {
        ("facing", dir) => match Direction::from_name(dir) {
            Some(d) => Facing::Direction(d),
            None => {
                warn!(value = dir, "unknown direction");
                return None;
            }
        },
        ("yaw", deg) => match deg.parse::<f64>() {
            Ok(v) => Facing::Yaw(v),
            Err(_) => {
                warn!(value = deg, "invalid yaw");
                return None;
            }
        },
        (other, _) => {
            warn!(keyword = other, "expected 'facing' or 'yaw'");
            return None;
        }
    };

    Some(Command::Create {
        world: tokens[1].to_string(),
        anchor: DVec3::from_array(xyz),
        facing,
    })
}

/// Parses `spawn [<fen>]`.
fn parse_spawn(tokens: &[&str]) -> Option<Command> {
    match tokens.len() {
        1 => Some(Command::Spawn { fen: None }),
        2 => Some(Command::Spawn {
            fen: Some(tokens[1].to_string()),
        }),
        _ => {
            warn!("malformed spawn: expected 'spawn [<fen>]'");
            None
        }
    }
}

/// Parses `tick [<n>]`.
fn parse_tick(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Tick { count: 1 }),
        Some(n) => match n.parse::<u64>() {
            Ok(count) => Some(Command::Tick { count }),
            Err(_) => {
                warn!(value = n, "invalid tick count");
                None
            }
        },
    }
}

/// Parses `claim <player-uuid> <coordinate>`.
fn parse_claim(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed claim: expected 'claim <player> <coordinate>'");
        return None;
    }
    let Some(player) = PlayerId::parse(tokens[1]) else {
        warn!(value = tokens[1], "invalid player id");
        return None;
    };
    match Coordinate::parse(tokens[2]) {
        Ok(coordinate) => Some(Command::Claim { player, coordinate }),
        Err(e) => {
            warn!(error = %e, "invalid coordinate");
            None
        }
    }
}

/// Parses `load <json>`, taking everything after the keyword as the record.
fn parse_load(line: &str) -> Option<Command> {
    let json = line.strip_prefix("load").unwrap_or("").trim();
    if json.is_empty() {
        warn!("malformed load: expected 'load <json>'");
        return None;
    }
    Some(Command::Load {
        json: json.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("advance"), Some(Command::Advance));
        assert_eq!(parse_command("phase"), Some(Command::Phase));
        assert_eq!(parse_command("save"), Some(Command::Save));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name SquareWidth value 4"),
            Some(Command::SetOption {
                name: "SquareWidth".to_string(),
                value: Some("4".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name Rows"),
            Some(Command::SetOption {
                name: "Rows".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_create_with_direction() {
        assert_eq!(
            parse_command("create overworld 10 64 -20 facing east"),
            Some(Command::Create {
                world: "overworld".to_string(),
                anchor: DVec3::new(10.0, 64.0, -20.0),
                facing: Facing::Direction(Direction::East),
            })
        );
    }

    #[test]
    fn parse_create_with_yaw() {
        assert_eq!(
            parse_command("create nether 0.5 70 3 yaw -92.5"),
            Some(Command::Create {
                world: "nether".to_string(),
                anchor: DVec3::new(0.5, 70.0, 3.0),
                facing: Facing::Yaw(-92.5),
            })
        );
    }

    #[test]
    fn parse_create_malformed_returns_none() {
        assert_eq!(parse_command("create overworld 1 2 facing north"), None);
        assert_eq!(parse_command("create overworld 1 2 x facing north"), None);
        assert_eq!(parse_command("create overworld 1 2 3 facing up"), None);
        assert_eq!(parse_command("create overworld 1 2 3 pitch 10"), None);
        assert_eq!(parse_command("create overworld 1 2 3 yaw left"), None);
        assert_eq!(parse_command("create overworld inf 2 3 facing north"), None);
    }

    #[test]
    fn parse_spawn_variants() {
        assert_eq!(parse_command("spawn"), Some(Command::Spawn { fen: None }));
        assert_eq!(
            parse_command("spawn 4k3/8/8/8/8/8/8/4K3"),
            Some(Command::Spawn {
                fen: Some("4k3/8/8/8/8/8/8/4K3".to_string())
            })
        );
        assert_eq!(parse_command("spawn a b"), None);
    }

    #[test]
    fn parse_tick_count() {
        assert_eq!(parse_command("tick"), Some(Command::Tick { count: 1 }));
        assert_eq!(parse_command("tick 12"), Some(Command::Tick { count: 12 }));
        assert_eq!(parse_command("tick -1"), None);
    }

    #[test]
    fn parse_claim_command() {
        assert_eq!(
            parse_command("claim 00000000-0000-0000-0000-000000000001 e1"),
            Some(Command::Claim {
                player: PlayerId(Uuid::from_u128(1)),
                coordinate: Coordinate::parse("E1").unwrap(),
            })
        );
        assert_eq!(parse_command("claim steve E1"), None);
        assert_eq!(
            parse_command("claim 00000000-0000-0000-0000-000000000001 Z9"),
            None
        );
        assert_eq!(parse_command("claim"), None);
    }

    #[test]
    fn parse_load_keeps_whole_json() {
        assert_eq!(
            parse_command(r#"load {"a": [1, 2]}"#),
            Some(Command::Load {
                json: r#"{"a": [1, 2]}"#.to_string()
            })
        );
        assert_eq!(parse_command("load"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
        assert_eq!(parse_command("\ttick 2 "), Some(Command::Tick { count: 2 }));
    }
}
