// extensions/mod.rs
//
// The two per-frame engines this crate exists for: room transitions and
// path following. Each is a self-contained state updater driven by the
// host's step event; neither depends on the other.

pub mod path;
pub mod rng;
pub mod transition;

pub use path::{Path, PathDef, Repeat};
pub use rng::Rng;
pub use transition::{Transition, TransitionKind};
