//! # Scene — Node Storage and Parent/Child Links
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Scene                                            │
//! │                                                  │
//! │  allocator: generational NodeId lifecycle        │
//! │  slots: Vec<Option<NodeData>>   (by index)       │
//! │    transform  local, relative to parent          │
//! │    parent     Option<NodeId>                     │
//! │    children   Vec<NodeId>                        │
//! │  names: HashMap<String, NodeId>                  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Only local transforms are stored. World matrices are composed on demand by
//! walking up the parent chain (`root * ... * parent * local`), so a write to
//! any node is visible to every descendant immediately, with no propagation
//! pass between the constraint and follower updates.

use std::collections::HashMap;

use super::SceneGraph;
use super::node::{NodeAllocator, NodeId};
use crate::math::{Mat4, Quat, Transform, Vec3};

struct NodeData {
    id: NodeId,
    transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    name: Option<String>,
}

/// A hierarchy of transform nodes.
pub struct Scene {
    allocator: NodeAllocator,
    slots: Vec<Option<NodeData>>,
    names: HashMap<String, NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            allocator: NodeAllocator::new(),
            slots: Vec::new(),
            names: HashMap::new(),
        }
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn a root node.
    pub fn spawn(&mut self, transform: Transform) -> NodeId {
        let node = self.allocator.allocate();
        let slot = node.index as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(NodeData {
            id: node,
            transform,
            parent: None,
            children: Vec::new(),
            name: None,
        });
        node
    }

    /// Spawn a root node with a unique name.
    ///
    /// # Panics
    ///
    /// Panics if the name is already in use.
    pub fn spawn_named(&mut self, name: &str, transform: Transform) -> NodeId {
        let node = self.spawn(transform);
        self.name_node(node, name);
        node
    }

    /// Spawn a child node. `transform` is relative to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if the parent is not alive.
    pub fn spawn_child(&mut self, parent: NodeId, transform: Transform) -> NodeId {
        assert!(
            self.is_alive(parent),
            "Cannot spawn child on dead parent {:?}",
            parent
        );
        let child = self.spawn(transform);
        self.attach(child, parent);
        child
    }

    /// Spawn a named child node. See [`spawn_child`](Self::spawn_child).
    pub fn spawn_named_child(&mut self, parent: NodeId, name: &str, transform: Transform) -> NodeId {
        let child = self.spawn_child(parent, transform);
        self.name_node(child, name);
        child
    }

    /// Despawn a node and all of its descendants.
    ///
    /// Returns `true` if the node was alive.
    pub fn despawn_recursive(&mut self, node: NodeId) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        self.detach(node);

        let mut to_despawn = vec![node];
        let mut i = 0;
        while i < to_despawn.len() {
            let current = to_despawn[i];
            if let Some(data) = self.data(current) {
                to_despawn.extend(data.children.iter().copied());
            }
            i += 1;
        }

        for n in to_despawn {
            if let Some(data) = self.slots[n.index as usize].take() {
                if let Some(name) = data.name {
                    self.names.remove(&name);
                }
            }
            self.allocator.deallocate(n);
        }
        true
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.allocator.is_alive(node)
    }

    /// Returns the number of alive nodes.
    pub fn node_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Iterate over all alive nodes in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().flatten().map(|data| data.id)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.data(node)?.name.as_deref()
    }

    /// Get the node with the given name.
    ///
    /// # Panics
    ///
    /// Panics if no node has that name.
    pub fn named(&self, name: &str) -> NodeId {
        self.try_named(name)
            .unwrap_or_else(|| panic!("No node named \"{}\"", name))
    }

    pub fn try_named(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// The node's transform relative to its parent.
    pub fn local(&self, node: NodeId) -> Option<&Transform> {
        self.data(node).map(|d| &d.transform)
    }

    pub fn local_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.data_mut(node).map(|d| &mut d.transform)
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    /// Re-parent a node, keeping its world pose.
    ///
    /// Returns `false` (and changes nothing) if either node is dead or the
    /// move would make a node its own ancestor.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> bool {
        let Some(world) = self.world_matrix(node) else {
            return false;
        };
        if let Some(p) = parent {
            if !self.is_alive(p) || self.is_ancestor_or_self(node, p) {
                return false;
            }
        }

        self.detach(node);
        let local = match parent {
            Some(p) => {
                self.attach(node, p);
                self.world_matrix(p).unwrap_or(Mat4::IDENTITY).inverse() * world
            }
            None => world,
        };
        if let Some(transform) = self.local_mut(node) {
            *transform = Transform::from_matrix(local);
        }
        true
    }

    /// Link `child` under `parent` without touching the child's local transform.
    pub(crate) fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.detach(child);
        if let Some(data) = self.data_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.data_mut(parent) {
            data.children.push(child);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.data_mut(node).and_then(|d| d.parent.take()) else {
            return;
        };
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|&c| c != node);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // ── World Space ──────────────────────────────────────────────────

    /// Compose the node's world matrix from the root down.
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut matrix = self.data(node)?.transform.matrix();
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            let data = self.data(current)?;
            matrix = data.transform.matrix() * matrix;
            cursor = data.parent;
        }
        Some(matrix)
    }

    /// World rotation: the product of rotations along the parent chain.
    pub fn world_rotation(&self, node: NodeId) -> Option<Quat> {
        let mut rotation = self.data(node)?.transform.rotation;
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            let data = self.data(current)?;
            rotation = data.transform.rotation * rotation;
            cursor = data.parent;
        }
        Some(rotation.normalize())
    }

    pub fn world_position(&self, node: NodeId) -> Option<Vec3> {
        self.world_matrix(node).map(|m| m.w_axis.truncate())
    }

    pub fn set_world_position(&mut self, node: NodeId, position: Vec3) {
        let local = match self.parent(node).and_then(|p| self.world_matrix(p)) {
            Some(parent) => parent.inverse().transform_point3(position),
            None => position,
        };
        if let Some(transform) = self.local_mut(node) {
            transform.translation = local;
        }
    }

    pub fn set_world_rotation(&mut self, node: NodeId, rotation: Quat) {
        let local = match self.parent(node).and_then(|p| self.world_rotation(p)) {
            Some(parent) => parent.inverse() * rotation,
            None => rotation,
        };
        if let Some(transform) = self.local_mut(node) {
            transform.rotation = local.normalize();
        }
    }

    /// Set a node's world pose; its children keep their world poses.
    ///
    /// Child locals are re-derived from position and rotation only. Their
    /// local scale is left as is, so repeated calls do not accumulate
    /// matrix decomposition error.
    pub fn set_world_pose_keep_children(&mut self, node: NodeId, position: Vec3, rotation: Quat) {
        let children: Vec<(NodeId, Vec3, Quat)> = self
            .children(node)
            .iter()
            .filter_map(|&c| Some((c, self.world_position(c)?, self.world_rotation(c)?)))
            .collect();

        self.set_world_rotation(node, rotation);
        self.set_world_position(node, position);

        let Some(inverse_rotation) = self.world_rotation(node).map(|r| r.inverse()) else {
            return;
        };
        for (child, world_position, world_rotation) in children {
            let Some(translation) = self.inverse_transform_point(node, world_position) else {
                continue;
            };
            if let Some(transform) = self.local_mut(child) {
                transform.translation = translation;
                transform.rotation = (inverse_rotation * world_rotation).normalize();
            }
        }
    }

    pub fn transform_point(&self, node: NodeId, point: Vec3) -> Option<Vec3> {
        self.world_matrix(node).map(|m| m.transform_point3(point))
    }

    pub fn inverse_transform_point(&self, node: NodeId, point: Vec3) -> Option<Vec3> {
        self.world_matrix(node)
            .map(|m| m.inverse().transform_point3(point))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        if !self.allocator.is_alive(node) {
            return None;
        }
        self.slots.get(node.index as usize)?.as_ref()
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        if !self.allocator.is_alive(node) {
            return None;
        }
        self.slots.get_mut(node.index as usize)?.as_mut()
    }

    /// # Panics
    ///
    /// Panics if the name is already in use.
    fn name_node(&mut self, node: NodeId, name: &str) {
        if let Some(&existing) = self.names.get(name) {
            panic!(
                "Name \"{}\" is already used by node {:?} (tried to assign to {:?})",
                name, existing, node
            );
        }
        self.names.insert(name.to_string(), node);
        if let Some(data) = self.data_mut(node) {
            data.name = Some(name.to_string());
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    type Node = NodeId;

    fn is_alive(&self, node: NodeId) -> bool {
        Scene::is_alive(self, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Scene::parent(self, node)
    }

    fn world_position(&self, node: NodeId) -> Option<Vec3> {
        Scene::world_position(self, node)
    }

    fn world_rotation(&self, node: NodeId) -> Option<Quat> {
        Scene::world_rotation(self, node)
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) {
        Scene::set_world_position(self, node, position)
    }

    fn set_world_rotation(&mut self, node: NodeId, rotation: Quat) {
        Scene::set_world_rotation(self, node, rotation)
    }

    fn set_world_pose_keep_children(&mut self, node: NodeId, position: Vec3, rotation: Quat) {
        Scene::set_world_pose_keep_children(self, node, position, rotation)
    }

    fn transform_point(&self, node: NodeId, point: Vec3) -> Option<Vec3> {
        Scene::transform_point(self, node, point)
    }

    fn inverse_transform_point(&self, node: NodeId, point: Vec3) -> Option<Vec3> {
        Scene::inverse_transform_point(self, node, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rotation_distance;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn root_world_equals_local() {
        let mut scene = Scene::new();
        let root = scene.spawn(Transform::from_xyz(10.0, 20.0, 0.0));
        assert_eq!(scene.world_position(root), Some(Vec3::new(10.0, 20.0, 0.0)));
        assert_eq!(scene.parent(root), None);
    }

    #[test]
    fn child_inherits_parent_transform() {
        let mut scene = Scene::new();
        let parent = scene.spawn(
            Transform::from_xyz(100.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let child = scene.spawn_child(parent, Transform::from_xyz(10.0, 0.0, 0.0));

        // Rotating +90° about Y maps local +X to world -Z.
        let world = scene.world_position(child).unwrap();
        assert!(close(world, Vec3::new(100.0, 0.0, -10.0)));
        assert_eq!(scene.parent(child), Some(parent));
        assert_eq!(scene.children(parent), &[child]);
    }

    #[test]
    fn parent_moves_child_follows() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Transform::IDENTITY);
        let child = scene.spawn_child(parent, Transform::from_xyz(5.0, 0.0, 0.0));

        scene.set_world_position(parent, Vec3::new(50.0, 0.0, 0.0));
        assert!(close(scene.world_position(child).unwrap(), Vec3::new(55.0, 0.0, 0.0)));
    }

    #[test]
    fn deep_hierarchy_composes() {
        let mut scene = Scene::new();
        let a = scene.spawn(Transform::from_xyz(1.0, 0.0, 0.0));
        let b = scene.spawn_child(a, Transform::from_xyz(2.0, 0.0, 0.0));
        let c = scene.spawn_child(b, Transform::from_xyz(3.0, 0.0, 0.0));
        assert!(close(scene.world_position(c).unwrap(), Vec3::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn set_world_pose_under_scaled_parent() {
        let mut scene = Scene::new();
        let parent = scene.spawn(
            Transform::from_xyz(1.0, 2.0, 3.0)
                .with_rotation(Quat::from_rotation_z(0.4))
                .with_scale(2.0),
        );
        let child = scene.spawn_child(parent, Transform::IDENTITY);

        let target = Vec3::new(-4.0, 7.0, 0.5);
        let rotation = Quat::from_rotation_x(1.2);
        scene.set_world_position(child, target);
        scene.set_world_rotation(child, rotation);

        assert!(close(scene.world_position(child).unwrap(), target));
        assert!(rotation_distance(scene.world_rotation(child).unwrap(), rotation) < 1e-4);
    }

    #[test]
    fn point_conversion_round_trip() {
        let mut scene = Scene::new();
        let node = scene.spawn(
            Transform::from_xyz(3.0, -1.0, 2.0)
                .with_rotation(Quat::from_rotation_y(0.9))
                .with_scale(0.5),
        );
        let p = Vec3::new(0.25, 4.0, -8.0);
        let local = scene.inverse_transform_point(node, p).unwrap();
        assert!(close(scene.transform_point(node, local).unwrap(), p));
    }

    #[test]
    fn keep_children_preserves_child_world_pose() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Transform::from_xyz(0.0, 1.0, 0.0));
        let child = scene.spawn_child(
            parent,
            Transform::from_xyz(0.5, 0.0, 0.0).with_rotation(Quat::from_rotation_y(0.3)),
        );
        let before_pos = scene.world_position(child).unwrap();
        let before_rot = scene.world_rotation(child).unwrap();

        scene.set_world_pose_keep_children(
            parent,
            Vec3::new(9.0, -2.0, 4.0),
            Quat::from_rotation_x(0.8),
        );

        assert!(close(scene.world_position(parent).unwrap(), Vec3::new(9.0, -2.0, 4.0)));
        assert!(close(scene.world_position(child).unwrap(), before_pos));
        assert!(rotation_distance(scene.world_rotation(child).unwrap(), before_rot) < 1e-4);
    }

    #[test]
    fn repeated_keep_children_writes_do_not_drift() {
        let mut scene = Scene::new();
        let hand = scene.spawn(
            Transform::from_xyz(0.2, 1.1, 0.3)
                .with_rotation(Quat::from_rotation_y(0.4) * Quat::from_rotation_x(-0.2))
                .with_scale(1.3),
        );
        let tip = scene.spawn_child(
            hand,
            Transform::from_xyz(0.02, -0.01, 0.12).with_rotation(Quat::from_rotation_z(0.7)),
        );
        let tip_position = scene.world_position(tip).unwrap();
        let tip_rotation = scene.world_rotation(tip).unwrap();
        let hand_position = scene.world_position(hand).unwrap();
        let hand_rotation = scene.world_rotation(hand).unwrap();

        for _ in 0..1_000 {
            scene.set_world_pose_keep_children(hand, hand_position, hand_rotation);
        }

        assert!((scene.world_position(tip).unwrap() - tip_position).abs().max_element() < 1e-4);
        assert!(rotation_distance(scene.world_rotation(tip).unwrap(), tip_rotation) < 1e-4);
        assert_eq!(scene.local(tip).unwrap().scale, Vec3::ONE);
        assert_eq!(scene.local(hand).unwrap().scale, Vec3::splat(1.3));
    }

    #[test]
    fn set_parent_keeps_world_pose() {
        let mut scene = Scene::new();
        let a = scene.spawn(Transform::from_xyz(5.0, 0.0, 0.0));
        let b = scene.spawn(
            Transform::from_xyz(0.0, 3.0, 0.0).with_rotation(Quat::from_rotation_z(1.0)),
        );
        let node = scene.spawn_child(a, Transform::from_xyz(1.0, 0.0, 0.0));

        assert!(scene.set_parent(node, Some(b)));
        assert_eq!(scene.parent(node), Some(b));
        assert!(scene.children(a).is_empty());
        assert!(close(scene.world_position(node).unwrap(), Vec3::new(6.0, 0.0, 0.0)));

        assert!(scene.set_parent(node, None));
        assert_eq!(scene.parent(node), None);
        assert!(close(scene.world_position(node).unwrap(), Vec3::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.spawn(Transform::IDENTITY);
        let b = scene.spawn_child(a, Transform::IDENTITY);
        assert!(!scene.set_parent(a, Some(b)));
        assert!(!scene.set_parent(a, Some(a)));
        assert_eq!(scene.parent(b), Some(a));
    }

    #[test]
    fn despawn_recursive_removes_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Transform::IDENTITY);
        let child = scene.spawn_child(parent, Transform::IDENTITY);
        let grandchild = scene.spawn_child(child, Transform::IDENTITY);
        let _other = scene.spawn_child(parent, Transform::IDENTITY);

        assert_eq!(scene.node_count(), 4);
        assert!(scene.despawn_recursive(parent));
        assert_eq!(scene.node_count(), 0);
        assert!(!scene.is_alive(grandchild));
        assert!(!scene.despawn_recursive(parent));
    }

    #[test]
    fn despawn_child_cleans_up_parent_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Transform::IDENTITY);
        let a = scene.spawn_child(parent, Transform::IDENTITY);
        let b = scene.spawn_child(parent, Transform::IDENTITY);

        scene.despawn_recursive(a);
        assert_eq!(scene.children(parent), &[b]);
    }

    #[test]
    fn stale_handle_reads_nothing() {
        let mut scene = Scene::new();
        let old = scene.spawn(Transform::from_xyz(1.0, 0.0, 0.0));
        scene.despawn_recursive(old);
        let reused = scene.spawn(Transform::from_xyz(2.0, 0.0, 0.0));

        assert_eq!(reused.index(), old.index());
        assert_eq!(scene.world_position(old), None);
        scene.set_world_position(old, Vec3::splat(9.0));
        assert_eq!(scene.world_position(reused), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn named_lookup_and_cleanup() {
        let mut scene = Scene::new();
        let hand = scene.spawn_named("hand", Transform::IDENTITY);
        let tip = scene.spawn_named_child(hand, "tip", Transform::IDENTITY);
        assert_eq!(scene.named("tip"), tip);
        assert_eq!(scene.name(hand), Some("hand"));

        scene.despawn_recursive(hand);
        assert_eq!(scene.try_named("tip"), None);
    }

    #[test]
    #[should_panic(expected = "already used")]
    fn duplicate_name_panics() {
        let mut scene = Scene::new();
        scene.spawn_named("hand", Transform::IDENTITY);
        scene.spawn_named("hand", Transform::IDENTITY);
    }

    #[test]
    fn nodes_iterates_alive_in_slot_order() {
        let mut scene = Scene::new();
        let a = scene.spawn(Transform::IDENTITY);
        let b = scene.spawn(Transform::IDENTITY);
        let c = scene.spawn(Transform::IDENTITY);
        scene.despawn_recursive(b);
        assert_eq!(scene.nodes().collect::<Vec<_>>(), vec![a, c]);
    }
}
