//! Dodge logic
//!
//! Pure and deterministic:
//! - Geometry comes in as a `Snapshot`, decisions go out as `Relocation`s
//! - Seeded RNG only
//! - No page or platform dependencies

pub mod controller;
pub mod escape;
pub mod state;

pub use controller::{ClickVerdict, EvasionController, Relocation};
pub use escape::{Placement, diagonal_fallback, escape_placement, touch_placement, within_reach};
pub use state::{DodgeSource, EvasionState, PositionMode, grow_scale};
