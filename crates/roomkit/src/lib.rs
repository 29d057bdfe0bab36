pub mod api;
pub mod components;
pub mod core;
pub mod extensions;
pub mod raster;
pub mod systems;

// Re-export key types at crate root for convenience
pub use crate::api::room::{FrameSource, Room};
pub use crate::api::types::ObjectId;
pub use crate::components::object::Object;
pub use crate::core::director::{Director, DEFAULT_TRANSITION_MS};
pub use crate::core::scene::Scene;
pub use crate::core::time::{Step, StepClock};
pub use crate::extensions::path::{Path, PathDef, Repeat};
pub use crate::extensions::rng::Rng;
pub use crate::extensions::transition::{Transition, TransitionKind};
pub use crate::raster::pixmap::{Pixmap, Rgba8};
pub use crate::systems::motion;
