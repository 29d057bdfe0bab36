/// Unique identifier for an object in the scene.
///
/// Followers and other per-object state are keyed by this id rather than by
/// reference, so state maps stay valid across scene mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);
