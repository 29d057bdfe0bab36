// core/scene.rs
//
// Flat storage for the objects the path and motion systems drive. Lookups
// are linear scans; a room holds tens of followers, not thousands.

use crate::api::types::ObjectId;
use crate::components::object::Object;

pub struct Scene {
    objects: Vec<Object>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Hand out the next unused id. Ids are never reused within a scene, so
    /// follower maps keyed by id stay unambiguous across despawns.
    pub fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Remove an object by id, returning it if it was present. The order of
    /// the remaining objects is not preserved.
    pub fn despawn(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.swap_remove(idx))
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Mutable pass over every object; the motion system's entry point.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }

    /// First object carrying `tag`, if any.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.spawn(Object::new(id).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(id).map(|o| o.pos), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn despawn_removes_and_returns_the_object() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.spawn(Object::new(id));
        assert_eq!(scene.despawn(id).map(|o| o.id), Some(id));
        assert_eq!(scene.len(), 0);
        assert!(scene.get(id).is_none());
        assert!(scene.despawn(id).is_none());
    }

    #[test]
    fn ids_stay_unique_across_despawns() {
        let mut scene = Scene::new();
        let a = scene.alloc_id();
        scene.spawn(Object::new(a));
        scene.despawn(a);
        let b = scene.alloc_id();
        assert_ne!(a, b);
    }

    #[test]
    fn find_by_tag_matches_first_tagged_object() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.spawn(Object::new(id).with_tag("guard"));
        assert_eq!(scene.find_by_tag("guard").map(|o| o.id), Some(id));
        assert!(scene.find_by_tag("ghost").is_none());
    }
}
