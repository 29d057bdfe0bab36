// systems/motion.rs
//
// Kinematic integration for scene objects. This is the host-engine side of
// the movement contract: extensions steer by writing velocity, acceleration,
// and deceleration channels; this system turns them into motion each step.

use crate::core::scene::Scene;

/// Integrate one step for every active object:
/// acceleration feeds velocity, deceleration pulls each velocity component
/// toward zero (never past it), and velocity feeds position. The stored
/// heading is refreshed from the resulting velocity.
pub fn step(scene: &mut Scene, delta_mult: f32) {
    for obj in scene.iter_mut() {
        if !obj.active {
            continue;
        }
        obj.vel += obj.acc * delta_mult;
        obj.vel.x = toward_zero(obj.vel.x, obj.dec.x.abs() * delta_mult);
        obj.vel.y = toward_zero(obj.vel.y, obj.dec.y.abs() * delta_mult);
        obj.pos += obj.vel * delta_mult;
        obj.sync_heading();
    }
}

fn toward_zero(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else if v < 0.0 {
        (v + amount).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::object::Object;
    use glam::Vec2;

    #[test]
    fn acceleration_integrates_into_position() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        let mut obj = Object::new(id);
        obj.acc = Vec2::new(2.0, 0.0);
        scene.spawn(obj);

        step(&mut scene, 1.0);
        step(&mut scene, 1.0);
        let obj = scene.get(id).unwrap();
        assert!((obj.vel.x - 4.0).abs() < 1e-4);
        assert!((obj.pos.x - 6.0).abs() < 1e-4); // 2 + 4
    }

    #[test]
    fn deceleration_never_reverses_velocity() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        let mut obj = Object::new(id);
        obj.vel = Vec2::new(3.0, -3.0);
        obj.dec = Vec2::new(2.0, 2.0);
        scene.spawn(obj);

        step(&mut scene, 1.0);
        let obj = scene.get(id).unwrap();
        assert!((obj.vel.x - 1.0).abs() < 1e-4);
        assert!((obj.vel.y + 1.0).abs() < 1e-4);

        step(&mut scene, 1.0);
        step(&mut scene, 1.0);
        let obj = scene.get(id).unwrap();
        assert_eq!(obj.vel, Vec2::ZERO);
    }

    #[test]
    fn deceleration_sign_is_ignored() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        let mut obj = Object::new(id);
        obj.vel = Vec2::new(5.0, 0.0);
        obj.dec = Vec2::new(-1.0, 0.0);
        scene.spawn(obj);

        step(&mut scene, 1.0);
        assert!((scene.get(id).unwrap().vel.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn inactive_objects_do_not_move() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        let mut obj = Object::new(id);
        obj.vel = Vec2::new(5.0, 0.0);
        obj.active = false;
        scene.spawn(obj);

        step(&mut scene, 1.0);
        assert_eq!(scene.get(id).unwrap().pos, Vec2::ZERO);
    }

    #[test]
    fn delta_mult_scales_motion() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        let mut obj = Object::new(id);
        obj.vel = Vec2::new(10.0, 0.0);
        scene.spawn(obj);

        step(&mut scene, 0.5);
        assert!((scene.get(id).unwrap().pos.x - 5.0).abs() < 1e-4);
    }
}
