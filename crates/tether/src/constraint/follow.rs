//! Drag a parent along behind a child whose pose is authoritative.
//!
//! Normally the parent drives the child. Here the child (a tracked or
//! constrained node) is the source of truth and the parent is re-posed every
//! frame so the parent/child offset captured at initialization holds.

use crate::math::{Quat, Vec3, rotation_in_frame};
use crate::scene::SceneGraph;

/// The parent's pose as seen from the child, captured at initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerOffset<N> {
    pub followed_parent: N,
    /// Parent position in the child's local frame.
    pub relative_offset_position: Vec3,
    /// Parent rotation relative to the child's rotation.
    pub relative_offset_rotation: Quat,
}

/// Keeps a node's parent at a fixed offset from the node.
///
/// A node without a parent at initialization makes the follower permanently
/// inert (until [`reinitialize`](Self::reinitialize)).
#[derive(Debug, Clone)]
pub struct ParentFollower<N> {
    node: N,
    offset: Option<FollowerOffset<N>>,
    initialized: bool,
}

impl<N: Copy + Eq + std::fmt::Debug> ParentFollower<N> {
    pub fn new(node: N) -> Self {
        Self {
            node,
            offset: None,
            initialized: false,
        }
    }

    pub fn node(&self) -> N {
        self.node
    }

    pub fn offset(&self) -> Option<&FollowerOffset<N>> {
        self.offset.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Capture the parent's pose relative to the node. Only the first call
    /// has an effect.
    pub fn initialize<G: SceneGraph<Node = N>>(&mut self, graph: &G) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.offset = capture(graph, self.node);
        match &self.offset {
            Some(offset) => log::debug!(
                "parent follower on {:?}: following {:?} at {}",
                self.node,
                offset.followed_parent,
                offset.relative_offset_position
            ),
            None => log::debug!("parent follower on {:?}: no parent, inert", self.node),
        }
    }

    pub fn reinitialize<G: SceneGraph<Node = N>>(&mut self, graph: &G) {
        self.initialized = false;
        self.initialize(graph);
    }

    /// Re-pose the followed parent from the node's current world pose.
    pub fn update<G: SceneGraph<Node = N>>(&self, graph: &mut G) {
        let Some(offset) = &self.offset else {
            return;
        };
        if !graph.is_alive(offset.followed_parent) {
            return;
        }
        let Some(rotation) = graph.world_rotation(self.node) else {
            return;
        };
        let Some(position) = graph.transform_point(self.node, offset.relative_offset_position) else {
            return;
        };
        let parent_rotation = (rotation * offset.relative_offset_rotation).normalize();
        log::trace!("{:?} pulls {:?} to {}", self.node, offset.followed_parent, position);
        graph.set_world_pose_keep_children(offset.followed_parent, position, parent_rotation);
    }
}

fn capture<G: SceneGraph>(graph: &G, node: G::Node) -> Option<FollowerOffset<G::Node>> {
    let parent = graph.parent(node)?;
    let parent_position = graph.world_position(parent)?;
    let parent_rotation = graph.world_rotation(parent)?;
    Some(FollowerOffset {
        followed_parent: parent,
        relative_offset_position: graph.inverse_transform_point(node, parent_position)?,
        relative_offset_rotation: rotation_in_frame(graph.world_rotation(node)?, parent_rotation),
    })
}
