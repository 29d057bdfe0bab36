// core/mod.rs
//
// Scene storage, step timing, and room sequencing.

pub mod director;
pub mod scene;
pub mod time;

pub use director::{Director, DEFAULT_TRANSITION_MS};
pub use scene::Scene;
pub use time::{Step, StepClock};
