// core/director.rs
//
// Room sequencing with transitions: keeps the ordered room list, tracks which
// room is current, and arms a transition on the incoming room whenever a
// start/resume/end is requested with one.

use log::debug;

use crate::api::room::{FrameSource, Room};
use crate::core::time::Step;
use crate::extensions::transition::{Transition, TransitionKind};
use crate::raster::pixmap::Pixmap;

/// Default transition length in milliseconds.
pub const DEFAULT_TRANSITION_MS: f32 = 1500.0;

struct Slot {
    room: Box<dyn Room>,
    transition: Transition,
    started: bool,
}

/// Ordered room collection with transition support.
///
/// Rooms are addressed by index; the `next` argument of
/// [`Director::transition_end`] is signed, with negative values counting from
/// the end of the list. An out-of-range target is not an error: the current
/// room still ends, no transition is armed, and the director goes idle.
#[derive(Default)]
pub struct Director {
    slots: Vec<Slot>,
    current: Option<usize>,
}

impl Director {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            current: None,
        }
    }

    /// Append a room; returns its index.
    pub fn push(&mut self, room: Box<dyn Room>) -> usize {
        self.slots.push(Slot {
            room,
            transition: Transition::new(),
            started: false,
        });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the current room, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Whether some room is current.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Make `index` current without a transition. Starts the room the first
    /// time, restarts it thereafter. Returns false for a bad index.
    pub fn start(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        self.current = Some(index);
        slot.started = true;
        slot.room.on_start();
        true
    }

    /// Make `index` current without a transition, resuming it if it has run
    /// before and starting it otherwise.
    pub fn resume(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        self.current = Some(index);
        if slot.started {
            slot.room.on_resume();
        } else {
            slot.started = true;
            slot.room.on_start();
        }
        true
    }

    /// Arm a transition on a room directly, handing it an already-captured
    /// image. Returns false for a bad index.
    pub fn show_transition(
        &mut self,
        index: usize,
        kind: TransitionKind,
        image: Pixmap,
        duration_ms: f32,
    ) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.transition.show(kind, image, duration_ms);
                true
            }
            None => false,
        }
    }

    /// Start room `index` behind a transition from the current frame.
    pub fn transition_start(
        &mut self,
        frames: &mut dyn FrameSource,
        index: usize,
        kind: TransitionKind,
        duration_ms: f32,
    ) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        let shot = frames.screenshot();
        self.slots[index].transition.show(kind, shot, duration_ms);
        self.start(index)
    }

    /// Resume room `index` behind a transition from the current frame.
    pub fn transition_resume(
        &mut self,
        frames: &mut dyn FrameSource,
        index: usize,
        kind: TransitionKind,
        duration_ms: f32,
    ) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        let shot = frames.screenshot();
        self.slots[index].transition.show(kind, shot, duration_ms);
        self.resume(index)
    }

    /// End the current room and hand over to `next` (default: the following
    /// room) behind a transition. Negative indices count from the end of the
    /// room list. If the target is out of range the current room still ends,
    /// no transition is armed, and the director goes idle.
    pub fn transition_end(
        &mut self,
        frames: &mut dyn FrameSource,
        kind: TransitionKind,
        duration_ms: f32,
        next: Option<i64>,
        resume: bool,
    ) {
        let Some(cur) = self.current else {
            return;
        };
        let next_index = next.unwrap_or(cur as i64 + 1);
        let target = self.resolve(next_index);

        if let Some(t) = target {
            let shot = frames.screenshot();
            self.slots[t].transition.show(kind, shot, duration_ms);
        } else {
            debug!("next room {} out of range; ending without transition", next_index);
        }

        self.slots[cur].room.on_end();
        self.current = None;

        if let Some(t) = target {
            if resume {
                self.resume(t);
            } else {
                self.start(t);
            }
        }
    }

    /// Run one simulation step: the current room's step hook, then its
    /// transition. Returns the transition overlay to draw above the scene
    /// this frame, if one is active.
    pub fn step(&mut self, step: &Step) -> Option<&Pixmap> {
        let cur = self.current?;
        let slot = &mut self.slots[cur];
        slot.room.on_step(step);
        slot.transition.tick(step.delta_ms)
    }

    fn resolve(&self, index: i64) -> Option<usize> {
        let len = self.slots.len() as i64;
        if index >= -len && index < len {
            Some(if index < 0 { len + index } else { index } as usize)
        } else {
            None
        }
    }
}
