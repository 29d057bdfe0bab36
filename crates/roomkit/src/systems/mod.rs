// systems/mod.rs
//
// Per-step update logic that operates over the scene.

pub mod motion;
