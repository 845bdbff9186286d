//=========================================================================
// Scene Graph
//=========================================================================
//
// Generational arena of scene objects with parent/child links.
//
// Architecture:
//   entries: Vec<Entry { generation, object: Option<SceneObject> }>
//   free:    Vec<u32>   (recycled indices, generation bumped on reuse)
//
// Destroyed handles never alias new objects: an `ObjectId` is only alive
// while its generation matches the slot's generation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::{Quat, Vec3};
use log::trace;

//=== Internal Dependencies ===============================================

use super::SceneObject;

//=== ObjectId ============================================================

/// Handle to a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

//=== Entry ===============================================================

#[derive(Debug, Clone)]
struct Entry {
    generation: u32,
    object: Option<SceneObject>,
}

//=== SceneGraph ==========================================================

/// Owns every object of the host simulation.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    entries: Vec<Entry>,
    free: Vec<u32>,
    active_scene: String,
}

impl SceneGraph {
    //--- Construction -----------------------------------------------------

    pub fn new(active_scene: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            active_scene: active_scene.into(),
        }
    }

    //--- Active Scene -----------------------------------------------------

    /// Scene new objects are placed into.
    pub fn active_scene(&self) -> &str {
        &self.active_scene
    }

    pub fn set_active_scene(&mut self, scene: impl Into<String>) {
        self.active_scene = scene.into();
    }

    //--- Insertion & Removal ----------------------------------------------

    /// Inserts a detached object. Objects without a scene label join the
    /// active scene.
    pub fn insert(&mut self, mut object: SceneObject) -> ObjectId {
        object.parent = None;
        object.children.clear();
        if object.scene.is_empty() {
            object.scene = self.active_scene.clone();
        }

        let id = match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.generation = entry.generation.wrapping_add(1);
                entry.object = Some(object);
                ObjectId { index, generation: entry.generation }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry { generation: 0, object: Some(object) });
                ObjectId { index, generation: 0 }
            }
        };

        trace!(target: "scene", "Inserted object {}", id);
        id
    }

    /// Destroys an object and its whole subtree.
    ///
    /// Returns `false` if the handle was already dead.
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        self.detach(id);

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(entry) = self.entries.get_mut(current.index as usize) else {
                continue;
            };
            if let Some(object) = entry.object.take() {
                pending.extend(object.children);
                self.free.push(current.index);
                trace!(target: "scene", "Destroyed object {} ({})", current, object.name);
            }
        }

        true
    }

    /// Destroys every non-persistent root object of a scene.
    ///
    /// Returns the number of root objects torn down.
    pub fn unload_scene(&mut self, scene: &str) -> usize {
        let doomed: Vec<ObjectId> = self
            .iter()
            .filter(|(_, o)| o.parent.is_none() && o.scene == scene && !o.persistent)
            .map(|(id, _)| id)
            .collect();

        for id in &doomed {
            self.destroy(*id);
        }

        doomed.len()
    }

    //--- Access -----------------------------------------------------------

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.entries
            .get(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.object.as_mut())
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates live objects in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry.object.as_ref().map(|object| {
                (ObjectId { index: index as u32, generation: entry.generation }, object)
            })
        })
    }

    //--- Hierarchy --------------------------------------------------------

    /// Re-parents `child`, appending it as the last child of `parent`.
    ///
    /// The local transform is kept as-is. Returns `false` if either handle
    /// is dead or the move would create a cycle.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> bool {
        if !self.is_alive(child) {
            return false;
        }

        if let Some(parent) = parent {
            if !self.is_alive(parent) || self.is_ancestor_or_self(child, parent) {
                return false;
            }
        }

        self.detach(child);

        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.push(child);
            }
            if let Some(c) = self.get_mut(child) {
                c.parent = Some(parent);
            }
        }

        true
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id).and_then(|o| o.parent)
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: ObjectId) -> Option<ObjectId> {
        self.children(id).first().copied()
    }

    /// First live object with the given name, in index order.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    /// Direct child with the given name.
    pub fn find_child(&self, parent: ObjectId, name: &str) -> Option<ObjectId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|o| o.name == name))
    }

    /// All descendants of `root` in depth-first pre-order, excluding `root`.
    pub fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack: Vec<ObjectId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    //--- Transforms -------------------------------------------------------

    /// World-space position and rotation.
    pub fn world_transform(&self, id: ObjectId) -> Option<(Vec3, Quat)> {
        let object = self.get(id)?;
        let (mut position, mut rotation) = (object.local_position, object.local_rotation);

        let mut parent = object.parent;
        while let Some(pid) = parent {
            let p = self.get(pid)?;
            position = p.local_position + p.local_rotation * position;
            rotation = p.local_rotation * rotation;
            parent = p.parent;
        }

        Some((position, rotation))
    }

    pub fn world_position(&self, id: ObjectId) -> Option<Vec3> {
        self.world_transform(id).map(|(p, _)| p)
    }

    pub fn set_world_position(&mut self, id: ObjectId, position: Vec3) {
        let local = match self.parent(id).and_then(|p| self.world_transform(p)) {
            Some((pp, pr)) => pr.inverse() * (position - pp),
            None => position,
        };
        if let Some(object) = self.get_mut(id) {
            object.local_position = local;
        }
    }

    pub fn set_world_rotation(&mut self, id: ObjectId, rotation: Quat) {
        let local = match self.parent(id).and_then(|p| self.world_transform(p)) {
            Some((_, pr)) => pr.inverse() * rotation,
            None => rotation,
        };
        if let Some(object) = self.get_mut(id) {
            object.local_rotation = local;
        }
    }

    //--- Instantiation ----------------------------------------------------

    /// Deep-copies `source` and its subtree into the active scene.
    ///
    /// The copy is a detached, non-persistent root. Activation state is
    /// copied as-is; callers decide whether to activate.
    pub fn instantiate(&mut self, source: ObjectId) -> Option<ObjectId> {
        let root = self.clone_subtree(source, None)?;
        if let Some(object) = self.get_mut(root) {
            object.persistent = false;
        }
        Some(root)
    }

    fn clone_subtree(&mut self, source: ObjectId, parent: Option<ObjectId>) -> Option<ObjectId> {
        let mut copy = self.get(source)?.clone();
        let children = std::mem::take(&mut copy.children);
        copy.scene = self.active_scene.clone();

        let id = self.insert(copy);
        if let Some(parent) = parent {
            self.set_parent(id, Some(parent));
        }

        for child in children {
            self.clone_subtree(child, Some(id));
        }

        Some(id)
    }

    //--- Internal Helpers -------------------------------------------------

    fn detach(&mut self, child: ObjectId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }

    fn is_ancestor_or_self(&self, ancestor: ObjectId, mut id: ObjectId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new("Game")
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    //--- Arena ------------------------------------------------------------

    #[test]
    fn insert_assigns_active_scene() {
        let mut scene = SceneGraph::new("Menu");
        let id = scene.insert(SceneObject::new("a"));
        assert_eq!(scene.get(id).unwrap().scene, "Menu");
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn destroyed_handles_do_not_alias_reused_slots() {
        let mut scene = SceneGraph::default();
        let first = scene.insert(SceneObject::new("a"));
        assert!(scene.destroy(first));
        let second = scene.insert(SceneObject::new("b"));

        assert!(!scene.is_alive(first));
        assert!(scene.is_alive(second));
        assert_ne!(first, second);
        assert!(!scene.destroy(first));
    }

    #[test]
    fn destroy_removes_subtree_and_detaches() {
        let mut scene = SceneGraph::default();
        let root = scene.insert(SceneObject::new("root"));
        let mid = scene.insert(SceneObject::new("mid"));
        let leaf = scene.insert(SceneObject::new("leaf"));
        scene.set_parent(mid, Some(root));
        scene.set_parent(leaf, Some(mid));

        scene.destroy(mid);

        assert!(scene.is_alive(root));
        assert!(!scene.is_alive(mid));
        assert!(!scene.is_alive(leaf));
        assert!(scene.children(root).is_empty());
    }

    //--- Hierarchy --------------------------------------------------------

    #[test]
    fn set_parent_appends_last_and_moves_between_parents() {
        let mut scene = SceneGraph::default();
        let a = scene.insert(SceneObject::new("a"));
        let b = scene.insert(SceneObject::new("b"));
        let x = scene.insert(SceneObject::new("x"));
        let y = scene.insert(SceneObject::new("y"));

        scene.set_parent(x, Some(a));
        scene.set_parent(y, Some(a));
        assert_eq!(scene.children(a), &[x, y]);
        assert_eq!(scene.first_child(a), Some(x));

        scene.set_parent(x, Some(b));
        assert_eq!(scene.children(a), &[y]);
        assert_eq!(scene.parent(x), Some(b));
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut scene = SceneGraph::default();
        let a = scene.insert(SceneObject::new("a"));
        let b = scene.insert(SceneObject::new("b"));
        scene.set_parent(b, Some(a));

        assert!(!scene.set_parent(a, Some(b)));
        assert!(!scene.set_parent(a, Some(a)));
        assert_eq!(scene.parent(a), None);
    }

    #[test]
    fn find_helpers() {
        let mut scene = SceneGraph::default();
        let boot = scene.insert(SceneObject::new("Boot"));
        let slot = scene.insert(SceneObject::new("Slot1"));
        scene.set_parent(slot, Some(boot));

        assert_eq!(scene.find_by_name("Boot"), Some(boot));
        assert_eq!(scene.find_child(boot, "Slot1"), Some(slot));
        assert_eq!(scene.find_child(boot, "Slot2"), None);
        assert_eq!(scene.descendants(boot), vec![slot]);
    }

    //--- Transforms -------------------------------------------------------

    #[test]
    fn world_transform_composes_parents() {
        let mut scene = SceneGraph::default();
        let parent = scene.insert(
            SceneObject::new("p")
                .with_position(Vec3::new(10.0, 0.0, 0.0))
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let child = scene.insert(SceneObject::new("c").with_position(Vec3::new(1.0, 0.0, 0.0)));
        scene.set_parent(child, Some(parent));

        let world = scene.world_position(child).unwrap();
        assert!(approx(world, Vec3::new(10.0, 0.0, -1.0)));
    }

    #[test]
    fn set_world_position_under_parent() {
        let mut scene = SceneGraph::default();
        let parent = scene.insert(SceneObject::new("p").with_position(Vec3::new(5.0, 5.0, 5.0)));
        let child = scene.insert(SceneObject::new("c"));
        scene.set_parent(child, Some(parent));

        scene.set_world_position(child, Vec3::new(6.0, 5.0, 5.0));
        assert!(approx(scene.get(child).unwrap().local_position, Vec3::X));
    }

    //--- Instantiation ----------------------------------------------------

    #[test]
    fn instantiate_deep_copies_into_active_scene() {
        let mut scene = SceneGraph::new("Prototypes");
        let proto = scene.insert(SceneObject::new("engine"));
        let bolt = scene.insert(SceneObject::new("bolt"));
        scene.set_parent(bolt, Some(proto));
        scene.get_mut(proto).unwrap().persistent = true;

        scene.set_active_scene("Game");
        let copy = scene.instantiate(proto).unwrap();

        let object = scene.get(copy).unwrap();
        assert_eq!(object.scene, "Game");
        assert!(!object.persistent);
        assert_eq!(scene.children(copy).len(), 1);
        assert_ne!(scene.children(copy)[0], bolt);
        assert_eq!(scene.children(proto), &[bolt]);
    }

    #[test]
    fn unload_scene_spares_persistent_objects() {
        let mut scene = SceneGraph::new("Game");
        let keep = scene.insert(SceneObject::new("keep"));
        scene.get_mut(keep).unwrap().persistent = true;
        let drop = scene.insert(SceneObject::new("drop"));

        assert_eq!(scene.unload_scene("Game"), 1);
        assert!(scene.is_alive(keep));
        assert!(!scene.is_alive(drop));
    }
}
