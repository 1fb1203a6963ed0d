//! Session state management.
//!
//! Holds the board options, the current board, the sandbox world pieces
//! are spawned into, the host tick loop and the running game. Each command
//! writes its response lines to the given writer.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use glam::DVec3;
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{Board, BoardFactory, WorldId};
use crate::config::{BoardConfig, ConfigError, OPTION_NAMES};
use crate::game::{ClaimError, Game, PhaseError};
use crate::geometry::Orientation;
use crate::piece::{LayoutError, PieceLayout};
use crate::protocol::{Command, Facing};
use crate::record::{GameRecord, RecordError};
use crate::spawn::{PieceSpawnScheduler, SandboxWorld, SpawnFuture, TickLoop};

/// Failures reported to the client as `error <message>`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no board; use 'create' first")]
    NoBoard,

    #[error("no game in progress")]
    NoGame,

    #[error("pieces are already spawning")]
    SpawnInProgress,

    #[error("pieces are already on the board; use 'newgame' first")]
    AlreadySpawned,

    #[error("option '{0}' needs a value")]
    MissingValue(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Whether the session loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Mutable state of one protocol session.
pub struct Session {
    config: BoardConfig,
    board: Option<Rc<Board>>,
    world: Option<Rc<RefCell<SandboxWorld>>>,
    ticks: TickLoop,
    spawner: PieceSpawnScheduler,
    pending: Option<SpawnFuture>,
    game: Option<Game>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            config: BoardConfig::default(),
            board: None,
            world: None,
            ticks: TickLoop::new(),
            spawner: PieceSpawnScheduler::new(),
            pending: None,
            game: None,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board(&self) -> Option<&Rc<Board>> {
        self.board.as_ref()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn world(&self) -> Option<&Rc<RefCell<SandboxWorld>>> {
        self.world.as_ref()
    }

    /// Runs one command. Failures the client caused are written as
    /// `error <message>`; only I/O failures are returned.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        let result = match command {
            Command::IsReady => {
                writeln!(out, "readyok")?;
                Ok(())
            }
            Command::SetOption { name, value } => self.set_option(&name, value.as_deref()),
            Command::NewGame => {
                self.new_game();
                Ok(())
            }
            Command::Create {
                world,
                anchor,
                facing,
            } => {
                let orientation = match facing {
                    Facing::Direction(d) => Orientation::from_direction(d),
                    Facing::Yaw(yaw) => Orientation::from_yaw(yaw),
                };
                let board = self.create_board(WorldId::new(world), anchor, orientation);
                let c = board.center();
                writeln!(
                    out,
                    "board {} {} {} {}",
                    c.x,
                    c.y,
                    c.z,
                    board.orientation().facing().name()
                )?;
                Ok(())
            }
            Command::Spawn { fen } => self.spawn(fen.as_deref(), out),
            Command::Tick { count } => self.tick(count, out),
            Command::Claim { player, coordinate } => self.game_mut().and_then(|game| {
                let piece = game.claim(player, coordinate)?;
                let player = piece.player().unwrap_or(player);
                writeln!(out, "claimed {} {}", coordinate, player)?;
                Ok(())
            }),
            Command::Advance => self.game_mut().and_then(|game| {
                let phase = game.advance_phase()?;
                writeln!(out, "phase {}", phase)?;
                Ok(())
            }),
            Command::Phase => self.game_ref().and_then(|game| {
                writeln!(out, "phase {}", game.phase())?;
                Ok(())
            }),
            Command::Save => self.game_ref().and_then(|game| {
                let json = GameRecord::from_game(game).to_json()?;
                writeln!(out, "game {}", json)?;
                Ok(())
            }),
            Command::Load { json } => self.load(&json, out),
            Command::Quit => return Ok(Flow::Quit),
        };

        match result {
            Ok(()) => {}
            Err(CommandError::Session(e)) => {
                warn!(error = %e, "command failed");
                writeln!(out, "error {}", e)?;
            }
            Err(CommandError::Io(e)) => return Err(e),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn game_ref(&self) -> Result<&Game, CommandError> {
        self.game.as_ref().ok_or(SessionError::NoGame.into())
    }

    fn game_mut(&mut self) -> Result<&mut Game, CommandError> {
        self.game.as_mut().ok_or(SessionError::NoGame.into())
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), CommandError> {
        if !OPTION_NAMES.contains(&name) {
            let unknown = ConfigError::UnknownOption(name.to_string());
            return Err(SessionError::from(unknown).into());
        }
        let value = value.ok_or_else(|| SessionError::MissingValue(name.to_string()))?;
        self.config.set_option(name, value).map_err(SessionError::from)?;
        Ok(())
    }

    /// Drops the game, any spawn in flight and the spawned entities. The
    /// board and options stay.
    pub fn new_game(&mut self) {
        self.ticks = TickLoop::new();
        self.pending = None;
        self.game = None;
        if let Some(board) = &self.board {
            self.world = Some(Rc::new(RefCell::new(SandboxWorld::new(
                board.world().clone(),
            ))));
        }
    }

    /// Builds a board from the current options and makes it the session's
    /// board, starting a new game on it.
    pub fn create_board(
        &mut self,
        world: WorldId,
        anchor: DVec3,
        orientation: Orientation,
    ) -> Rc<Board> {
        let board = Rc::new(BoardFactory::create_board(
            world,
            anchor,
            orientation,
            &self.config,
        ));
        self.board = Some(board.clone());
        self.new_game();
        board
    }

    fn spawn<W: Write>(&mut self, fen: Option<&str>, out: &mut W) -> Result<(), CommandError> {
        let board = self.board.clone().ok_or(SessionError::NoBoard)?;
        let world = self.world.clone().ok_or(SessionError::NoBoard)?;
        if self.pending.is_some() {
            return Err(SessionError::SpawnInProgress.into());
        }
        if self.game.is_some() {
            return Err(SessionError::AlreadySpawned.into());
        }
        let layout = match fen {
            Some(fen) => PieceLayout::from_fen(fen).map_err(SessionError::from)?,
            None => PieceLayout::standard(),
        };

        writeln!(out, "spawning {}", layout.len())?;
        info!(world = %board.world(), pieces = layout.len(), "spawn requested");
        self.pending = Some(
            self.spawner
                .spawn_pieces(board, world, layout, &mut self.ticks),
        );
        // An empty layout is already resolved.
        self.collect_spawn(out)?;
        Ok(())
    }

    /// Runs up to `count` ticks, stopping early once no task is left.
    fn tick<W: Write>(&mut self, count: u64, out: &mut W) -> Result<(), CommandError> {
        for _ in 0..count {
            if self.ticks.is_idle() {
                break;
            }
            self.ticks.tick();
            self.collect_spawn(out)?;
        }
        Ok(())
    }

    /// Turns a finished spawn into a game and reports it once.
    fn collect_spawn<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(result) = self.pending.as_mut().and_then(SpawnFuture::try_take) else {
            return Ok(());
        };
        self.pending = None;
        match result {
            Ok(pieces) => {
                writeln!(out, "spawned {}", pieces.len())?;
                if let Some(board) = &self.board {
                    self.game = Some(Game::new(board.clone(), pieces));
                }
            }
            Err(e) => {
                writeln!(out, "spawnfailed {}", e)?;
            }
        }
        Ok(())
    }

    fn load<W: Write>(&mut self, json: &str, out: &mut W) -> Result<(), CommandError> {
        let game = GameRecord::from_json(json)
            .and_then(|r| r.restore())
            .map_err(SessionError::from)?;
        self.config = *game.board().config();
        self.board = Some(game.board().clone());
        self.new_game();
        writeln!(out, "loaded {} {}", game.pieces().len(), game.phase())?;
        self.game = Some(game);
        Ok(())
    }
}

/// Internal split between client errors and output failures.
enum CommandError {
    Session(SessionError),
    Io(io::Error),
}

impl From<SessionError> for CommandError {
    fn from(e: SessionError) -> Self {
        CommandError::Session(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

impl From<ClaimError> for CommandError {
    fn from(e: ClaimError) -> Self {
        CommandError::Session(e.into())
    }
}

impl From<PhaseError> for CommandError {
    fn from(e: PhaseError) -> Self {
        CommandError::Session(e.into())
    }
}

impl From<RecordError> for CommandError {
    fn from(e: RecordError) -> Self {
        CommandError::Session(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn run(session: &mut Session, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            if let Some(cmd) = parse_command(line) {
                if session.execute(cmd, &mut out).unwrap() == Flow::Quit {
                    break;
                }
            }
        }
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn isready_replies_readyok() {
        let mut s = Session::new();
        assert_eq!(run(&mut s, &["isready"]), vec!["readyok"]);
    }

    #[test]
    fn create_reports_center_and_facing() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "setoption name SquareWidth value 1",
                "setoption name SquareHeight value 1",
                "setoption name BorderThickness value 0",
                "setoption name FrameThickness value 0",
                "create overworld 0 64 0 facing east",
            ],
        );
        assert_eq!(out, vec!["board 4 64.5 4 EAST"]);
        assert_eq!(s.board().unwrap().bounds().size().x, 8.0);
    }

    #[test]
    fn spawn_needs_a_board() {
        let mut s = Session::new();
        assert_eq!(
            run(&mut s, &["spawn"]),
            vec!["error no board; use 'create' first"]
        );
    }

    #[test]
    fn spawn_tick_claim_advance() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "create overworld 0 64 0 yaw 180",
                "spawn",
                "tick 7",
                "phase",
                "tick",
                "claim 00000000-0000-0000-0000-000000000001 d1",
                "claim 00000000-0000-0000-0000-000000000002 d1",
                "claim 00000000-0000-0000-0000-000000000002 a2",
                "advance",
                "phase",
            ],
        );
        assert_eq!(out[0], "board 12 64.5 -12 NORTH");
        assert_eq!(out[1], "spawning 32");
        assert_eq!(out[2], "error no game in progress");
        assert_eq!(out[3], "spawned 32");
        assert_eq!(out[4], "claimed D1 00000000-0000-0000-0000-000000000001");
        assert!(out[5].starts_with("error piece "));
        assert_eq!(out[6], "error Pawn pieces cannot be claimed");
        assert_eq!(out[7], "phase TURN_ORDER");
        assert_eq!(out[8], "phase TURN_ORDER");
        assert_eq!(s.world().unwrap().borrow().len(), 32);
    }

    #[test]
    fn spawn_failure_is_reported() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "setoption name Rows value 2",
                "create overworld 0 64 0 facing north",
                "spawn",
                "tick 10",
                "phase",
            ],
        );
        assert_eq!(out[1], "spawning 32");
        assert!(out[2].starts_with("spawnfailed layout square A7 "));
        assert_eq!(out[3], "error no game in progress");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn empty_layout_spawns_immediately() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &["create w 0 0 0 facing south", "spawn 8/8/8/8/8/8/8/8", "phase"],
        );
        assert_eq!(&out[1..], ["spawning 0", "spawned 0", "phase SELECTION"]);
    }

    #[test]
    fn second_spawn_is_rejected() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "create w 0 0 0 facing south",
                "spawn 4k3/8/8/8/8/8/8/4K3",
                "spawn",
                "tick",
                "spawn",
                "newgame",
                "spawn 4k3/8/8/8/8/8/8/4K3",
            ],
        );
        assert_eq!(
            &out[1..],
            [
                "spawning 2",
                "error pieces are already spawning",
                "spawned 2",
                "error pieces are already on the board; use 'newgame' first",
                "spawning 2",
            ]
        );
        assert!(s.world().unwrap().borrow().is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "create arena 5 70 5 facing west",
                "spawn",
                "tick 8",
                "claim 00000000-0000-0000-0000-0000000000aa g1",
                "save",
            ],
        );
        let saved = out.last().unwrap().strip_prefix("game ").unwrap().to_string();

        let mut restored = Session::new();
        let out = run(&mut restored, &[&format!("load {}", saved), "phase", "save"]);
        assert_eq!(out[0], "loaded 32 SELECTION");
        assert_eq!(out[1], "phase SELECTION");
        assert_eq!(out[2].strip_prefix("game ").unwrap(), saved);
    }

    #[test]
    fn option_errors_are_reported() {
        let mut s = Session::new();
        let out = run(
            &mut s,
            &[
                "setoption name Colour value 3",
                "setoption name Colour value x",
                "setoption name Colour",
                "setoption name Rows",
                "setoption name Rows value x",
            ],
        );
        assert_eq!(
            out,
            vec![
                "error unknown option 'Colour'",
                "error unknown option 'Colour'",
                "error unknown option 'Colour'",
                "error option 'Rows' needs a value",
                "error invalid value 'x' for option 'Rows'",
            ]
        );
    }

    #[test]
    fn huge_tick_count_returns_when_idle() {
        let mut s = Session::new();
        assert_eq!(
            run(&mut s, &["tick 18446744073709551615", "isready"]),
            vec!["readyok"]
        );

        let out = run(
            &mut s,
            &[
                "create overworld 0 64 0 facing north",
                "spawn",
                "tick 18446744073709551615",
                "phase",
            ],
        );
        assert_eq!(&out[1..], ["spawning 32", "spawned 32", "phase SELECTION"]);
        assert_eq!(s.ticks.now(), 8);
    }

    #[test]
    fn quit_stops_processing() {
        let mut s = Session::new();
        assert_eq!(run(&mut s, &["quit", "isready"]), Vec::<String>::new());
    }
}
