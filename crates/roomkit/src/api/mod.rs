// api/mod.rs
//
// Public contracts: object identity and the room/host seams.

pub mod room;
pub mod types;

pub use room::{FrameSource, Room};
pub use types::ObjectId;
