// extensions/path.rs
//
// Path following: moves scene objects along a polyline, waypoint by waypoint,
// with optional acceleration and deceleration on each segment. Followers are
// keyed by ObjectId; completion is reported through a drain queue.

use std::collections::HashMap;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::types::ObjectId;
use crate::components::object::Object;
use crate::core::scene::Scene;

/// How many times a follower traverses the path beyond the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Follow the path `n` more times after the first (0 = play once).
    Times(u32),
    /// Loop until `follow_stop` is called.
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(0)
    }
}

/// Serde-friendly path description: waypoint offsets in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathDef {
    pub points: Vec<(f32, f32)>,
}

/// State for one object currently following a path.
#[derive(Debug, Clone)]
struct FollowState {
    cruise: f32,
    accel: Option<f32>,
    decel: Option<f32>,
    /// Follower position at follow start; waypoints are offsets from here.
    origin: Vec2,
    repeat: Repeat,
    /// Index of the next waypoint; `points.len()` means the pass is done.
    dest: usize,
}

/// A movement pattern for scene objects: an ordered list of waypoint offsets.
///
/// The first waypoint is implicitly `(0, 0)` relative to wherever the
/// follower stands when `follow_start` is called, and is not stored. A path
/// has no position of its own; every follower moves in its own frame.
#[derive(Debug, Default)]
pub struct Path {
    /// Waypoints as offsets from each follower's start position.
    pub points: Vec<Vec2>,
    followers: HashMap<ObjectId, FollowState>,
    finished: Vec<ObjectId>,
}

impl Path {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            followers: HashMap::new(),
            finished: Vec::new(),
        }
    }

    /// Build a path from a serde-loaded definition.
    pub fn from_def(def: &PathDef) -> Self {
        Self::new(def.points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    /// Start moving `obj` along this path at `speed` units per step.
    ///
    /// With `accel`/`decel` unset the follower snaps to cruise speed on every
    /// segment; otherwise it accelerates from rest at each waypoint and
    /// decelerates inside the stopping distance of the next one. Restarting
    /// an already-following object replaces its state and re-anchors the path
    /// at the object's current position.
    pub fn follow_start(
        &mut self,
        obj: &Object,
        speed: f32,
        accel: Option<f32>,
        decel: Option<f32>,
        repeat: Repeat,
    ) {
        debug!("follow start: {:?} at speed {}", obj.id, speed);
        self.followers.insert(
            obj.id,
            FollowState {
                cruise: speed,
                accel,
                decel,
                origin: obj.pos,
                repeat,
                dest: 0,
            },
        );
    }

    /// Stop a follower immediately. No completion event fires.
    pub fn follow_stop(&mut self, id: ObjectId) -> bool {
        let removed = self.followers.remove(&id).is_some();
        if removed {
            debug!("follow stop: {:?}", id);
        }
        removed
    }

    /// Whether the object is currently following this path.
    pub fn is_following(&self, id: ObjectId) -> bool {
        self.followers.contains_key(&id)
    }

    /// Number of active followers.
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    /// Objects that finished the path since the last drain, in completion
    /// order. Each finished follower appears exactly once.
    pub fn drain_finished(&mut self) -> impl Iterator<Item = ObjectId> + '_ {
        self.finished.drain(..)
    }

    /// Advance every follower one step: steer velocities, advance waypoints,
    /// restart loops, and retire finished followers. Returns how many
    /// followers finished this step.
    ///
    /// Call before the motion integration for the same step.
    pub fn tick(&mut self, delta_mult: f32, scene: &mut Scene) -> usize {
        let ids: Vec<ObjectId> = self.followers.keys().copied().collect();
        let mut done = 0;

        for id in ids {
            let Some(obj) = scene.get_mut(id) else {
                // Follower left the scene; forget it without a completion event.
                debug!("follower {:?} despawned; dropping follow state", id);
                self.followers.remove(&id);
                continue;
            };
            let Some(st) = self.followers.get_mut(&id) else {
                continue;
            };

            // Arrival test: remaining distance per step below current speed.
            if st.dest < self.points.len() {
                let target = st.origin + self.points[st.dest];
                if (target - obj.pos).length() / delta_mult < obj.speed() {
                    st.dest += 1;
                    obj.set_speed(0.0);
                }
            }

            if st.dest < self.points.len() {
                let target = st.origin + self.points[st.dest];
                let delta = target - obj.pos;
                let dist = delta.length();
                // Screen coordinates: Y grows downward, so the bearing flips Y.
                let md = (-delta.y).atan2(delta.x);

                let mut deceling = false;
                if let Some(dc) = st.decel {
                    let stop_dist = obj.speed() * obj.speed() / (2.0 * dc);
                    if dist <= stop_dist {
                        obj.dec = Vec2::new(-(dc * md.cos()), dc * md.sin());
                        deceling = true;
                    } else {
                        obj.dec = Vec2::ZERO;
                    }
                } else {
                    obj.dec = Vec2::ZERO;
                }

                if deceling {
                    obj.acc = Vec2::ZERO;
                } else {
                    match st.accel {
                        Some(ac) if obj.speed() < st.cruise => {
                            obj.acc = Vec2::new(ac * md.cos(), -(ac * md.sin()));
                        }
                        _ => {
                            obj.set_speed(st.cruise);
                            obj.set_heading(md.to_degrees());
                            obj.acc = Vec2::ZERO;
                        }
                    }
                }
            } else {
                // Pass complete: loop from the current position or retire.
                match st.repeat {
                    Repeat::Forever => {
                        st.origin = obj.pos;
                        st.dest = 0;
                    }
                    Repeat::Times(n) if n > 0 => {
                        st.origin = obj.pos;
                        st.dest = 0;
                        st.repeat = Repeat::Times(n - 1);
                    }
                    Repeat::Times(_) => {
                        debug!("follow end: {:?}", id);
                        self.followers.remove(&id);
                        self.finished.push(id);
                        done += 1;
                    }
                }
            }
        }

        done
    }
}
