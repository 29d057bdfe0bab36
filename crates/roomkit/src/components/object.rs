use glam::Vec2;

use crate::api::types::ObjectId;

/// A movable scene object: position plus the kinematic channels the motion
/// system integrates each step.
///
/// Angles use screen coordinates: Y grows downward, and a positive heading
/// turns counterclockwise on screen. `heading` is retained while the object
/// is at rest so `set_speed` can restart motion in the last known direction.
#[derive(Debug, Clone)]
pub struct Object {
    /// Unique identifier.
    pub id: ObjectId,
    /// String tag for finding objects by name.
    pub tag: String,
    /// Whether this object is active (inactive objects are skipped).
    pub active: bool,
    /// Position in room space.
    pub pos: Vec2,
    /// Velocity in units per step.
    pub vel: Vec2,
    /// Acceleration, added to velocity each step.
    pub acc: Vec2,
    /// Deceleration; each component moves the matching velocity component
    /// toward zero by its magnitude each step, never past zero.
    pub dec: Vec2,
    heading: f32,
}

impl Object {
    /// Create a new object with the given id at the origin.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            dec: Vec2::ZERO,
            heading: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    /// Current scalar speed in units per step.
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Current heading in degrees (screen convention).
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Set the scalar speed, keeping the current heading.
    ///
    /// Works from rest: a stopped object keeps its last heading, so setting a
    /// speed aims it along that direction again.
    pub fn set_speed(&mut self, speed: f32) {
        self.vel = self.heading_vec() * speed;
    }

    /// Re-aim the current speed along a new heading, in degrees.
    pub fn set_heading(&mut self, degrees: f32) {
        let speed = self.vel.length();
        self.heading = degrees;
        self.vel = self.heading_vec() * speed;
    }

    /// Recompute the stored heading from the velocity, if moving.
    pub fn sync_heading(&mut self) {
        if self.vel.length_squared() > 0.0 {
            self.heading = (-self.vel.y).atan2(self.vel.x).to_degrees();
        }
    }

    fn heading_vec(&self) -> Vec2 {
        let rad = self.heading.to_radians();
        Vec2::new(rad.cos(), -rad.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_speed_from_rest_uses_stored_heading() {
        let mut obj = Object::new(ObjectId(1));
        obj.set_heading(90.0);
        obj.set_speed(5.0);
        // Heading 90 degrees is up-screen, i.e. negative Y.
        assert!(obj.vel.x.abs() < 1e-4);
        assert!((obj.vel.y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn set_heading_preserves_speed() {
        let mut obj = Object::new(ObjectId(1));
        obj.set_speed(3.0);
        obj.set_heading(180.0);
        assert!((obj.speed() - 3.0).abs() < 1e-4);
        assert!((obj.vel.x + 3.0).abs() < 1e-4);
    }

    #[test]
    fn sync_heading_reads_velocity() {
        let mut obj = Object::new(ObjectId(1));
        obj.vel = Vec2::new(0.0, -1.0); // moving up-screen
        obj.sync_heading();
        assert!((obj.heading() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn sync_heading_keeps_heading_at_rest() {
        let mut obj = Object::new(ObjectId(1));
        obj.set_heading(45.0);
        obj.sync_heading();
        assert!((obj.heading() - 45.0).abs() < 1e-4);
    }
}
