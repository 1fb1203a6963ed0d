//! Batched piece spawning across host ticks.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::iter::Peekable;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use glam::DVec3;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::materializer::{MaterializeError, PieceMaterializer};
use super::scheduler::{Repeat, TickScheduler};
use crate::board::{Board, Coordinate};
use crate::piece::{PieceLayout, PieceSpec, Team, UnitPiece};

/// Layout entries materialized per tick.
pub const BATCH_SIZE: usize = 4;

/// Pieces placed by a spawn run, keyed by coordinate.
pub type PlacedPieces = BTreeMap<Coordinate, UnitPiece>;

/// Why a spawn run stopped early.
///
/// Both variants carry the pieces placed before the failure. Their world
/// entities are left in place; cleaning them up is the caller's call.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("layout square {coordinate} is not on the board")]
    OffBoard {
        coordinate: Coordinate,
        placed: PlacedPieces,
    },

    #[error("failed to spawn piece at {coordinate}: {source}")]
    Materialize {
        coordinate: Coordinate,
        #[source]
        source: MaterializeError,
        placed: PlacedPieces,
    },
}

impl SpawnError {
    /// The layout square that failed.
    pub fn coordinate(&self) -> Coordinate {
        match self {
            SpawnError::OffBoard { coordinate, .. } => *coordinate,
            SpawnError::Materialize { coordinate, .. } => *coordinate,
        }
    }

    /// Pieces placed before the failure.
    pub fn placed(&self) -> &PlacedPieces {
        match self {
            SpawnError::OffBoard { placed, .. } => placed,
            SpawnError::Materialize { placed, .. } => placed,
        }
    }

    pub fn into_placed(self) -> PlacedPieces {
        match self {
            SpawnError::OffBoard { placed, .. } => placed,
            SpawnError::Materialize { placed, .. } => placed,
        }
    }
}

pub type SpawnResult = Result<PlacedPieces, SpawnError>;

#[derive(Default)]
struct Slot {
    resolved: bool,
    result: Option<SpawnResult>,
    waker: Option<Waker>,
}

/// Completion handle of a spawn run.
///
/// Resolves exactly once. Await it from an executor driven by the same
/// thread as the tick loop, or check it with [`SpawnFuture::try_take`]
/// between ticks.
pub struct SpawnFuture {
    slot: Rc<RefCell<Slot>>,
}

impl SpawnFuture {
    fn pending() -> (SpawnFuture, Completer) {
        let slot = Rc::new(RefCell::new(Slot::default()));
        (SpawnFuture { slot: slot.clone() }, Completer { slot })
    }

    fn ready(result: SpawnResult) -> SpawnFuture {
        let (future, completer) = SpawnFuture::pending();
        completer.resolve(result);
        future
    }

    /// True once the run has finished, whether or not the result was taken.
    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().resolved
    }

    /// Takes the result if the run has finished. Returns `None` while it is
    /// still running and after the result has been taken.
    pub fn try_take(&mut self) -> Option<SpawnResult> {
        self.slot.borrow_mut().result.take()
    }
}

impl Future for SpawnFuture {
    type Output = SpawnResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<SpawnResult> {
        let mut slot = self.slot.borrow_mut();
        match slot.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                // Stays pending forever once the result has been taken.
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

struct Completer {
    slot: Rc<RefCell<Slot>>,
}

impl Completer {
    fn resolve(&self, result: SpawnResult) {
        let waker = {
            let mut slot = self.slot.borrow_mut();
            if slot.resolved {
                return;
            }
            slot.resolved = true;
            slot.result = Some(result);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

enum Step {
    Continue,
    Done(SpawnResult),
}

/// Resumable state of one spawn run: the iterator position, the pieces
/// placed so far and the collaborators needed for the next batch.
struct SpawnJob<M> {
    board: Rc<Board>,
    materializer: Rc<RefCell<M>>,
    entries: Peekable<std::collections::btree_map::IntoIter<Coordinate, PieceSpec>>,
    placed: PlacedPieces,
    batch_size: usize,
    batches: u32,
}

impl<M: PieceMaterializer> SpawnJob<M> {
    fn run_batch(&mut self) -> Step {
        self.batches += 1;
        for _ in 0..self.batch_size {
            let Some((coordinate, spec)) = self.entries.next() else {
                break;
            };
            if let Err(step) = self.spawn_one(coordinate, spec) {
                return step;
            }
        }
        debug!(
            batch = self.batches,
            placed = self.placed.len(),
            "spawn batch done"
        );

        if self.entries.peek().is_none() {
            Step::Done(Ok(std::mem::take(&mut self.placed)))
        } else {
            Step::Continue
        }
    }

    fn spawn_one(&mut self, coordinate: Coordinate, spec: PieceSpec) -> Result<(), Step> {
        let Some(position) = self.board.spawn_position(coordinate) else {
            return Err(Step::Done(Err(SpawnError::OffBoard {
                coordinate,
                placed: std::mem::take(&mut self.placed),
            })));
        };
        let facing = facing_for(&self.board, spec.team);

        let spawned =
            self.materializer
                .borrow_mut()
                .spawn(self.board.world(), spec, position, facing);
        match spawned {
            Ok(entity) => {
                self.placed.insert(coordinate, UnitPiece::new(entity, spec));
                Ok(())
            }
            Err(source) => Err(Step::Done(Err(SpawnError::Materialize {
                coordinate,
                source,
                placed: std::mem::take(&mut self.placed),
            }))),
        }
    }
}

/// White looks down the board's forward axis, black looks back at it.
fn facing_for(board: &Board, team: Team) -> DVec3 {
    match team {
        Team::White => board.orientation().forward(),
        Team::Black => -board.orientation().forward(),
    }
}

/// Spawns a layout onto a board a few pieces per tick.
#[derive(Debug, Clone, Copy)]
pub struct PieceSpawnScheduler {
    batch_size: usize,
}

impl Default for PieceSpawnScheduler {
    fn default() -> Self {
        PieceSpawnScheduler {
            batch_size: BATCH_SIZE,
        }
    }
}

impl PieceSpawnScheduler {
    pub fn new() -> Self {
        PieceSpawnScheduler::default()
    }

    /// A scheduler with a custom batch size (at least one).
    pub fn with_batch_size(batch_size: usize) -> Self {
        PieceSpawnScheduler {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Starts spawning `layout` onto `board`.
    ///
    /// Registers a repeating task on `scheduler` that places up to
    /// `batch_size` pieces per tick in layout order, starting on the next
    /// tick. The returned future resolves with every placed piece once the
    /// layout is exhausted, or with the first failure. An empty layout, or
    /// one with a square the board lacks, resolves immediately without
    /// scheduling anything.
    pub fn spawn_pieces<M, S>(
        &self,
        board: Rc<Board>,
        materializer: Rc<RefCell<M>>,
        layout: PieceLayout,
        scheduler: &mut S,
    ) -> SpawnFuture
    where
        M: PieceMaterializer + 'static,
        S: TickScheduler + ?Sized,
    {
        let total = layout.len();
        if total == 0 {
            debug!(world = %board.world(), "empty layout, nothing to spawn");
            return SpawnFuture::ready(Ok(PlacedPieces::new()));
        }
        let off_board = layout
            .iter()
            .find(|(c, _)| board.grid().get(*c).is_none());
        if let Some((coordinate, _)) = off_board {
            warn!(world = %board.world(), %coordinate, "layout does not fit the board");
            return SpawnFuture::ready(Err(SpawnError::OffBoard {
                coordinate,
                placed: PlacedPieces::new(),
            }));
        }

        let (future, completer) = SpawnFuture::pending();
        let world = board.world().clone();
        let mut job = SpawnJob {
            board,
            materializer,
            entries: layout.into_iter().peekable(),
            placed: PlacedPieces::new(),
            batch_size: self.batch_size,
            batches: 0,
        };

        scheduler.run_repeating(
            1,
            1,
            Box::new(move |repeat: &mut Repeat| {
                if repeat.is_cancelled() {
                    return;
                }
                let Step::Done(result) = job.run_batch() else {
                    return;
                };
                repeat.cancel();
                match &result {
                    Ok(placed) => info!(
                        world = %world,
                        pieces = placed.len(),
                        ticks = job.batches,
                        "layout spawned"
                    ),
                    Err(e) => warn!(
                        world = %world,
                        placed = e.placed().len(),
                        error = %e,
                        "layout spawn failed"
                    ),
                }
                completer.resolve(result);
            }),
        );
        debug!(pieces = total, batch_size = self.batch_size, "spawn scheduled");
        future
    }
}
