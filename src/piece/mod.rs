//! Piece templates, placed pieces and layouts.

pub mod layout;
pub mod spec;
pub mod unit;

pub use layout::{LayoutError, PieceLayout, STANDARD_FEN};
pub use spec::{PieceSpec, PieceType, Team, ALL_PIECE_TYPES};
pub use unit::{EntityId, PlayerId, UnitPiece};
