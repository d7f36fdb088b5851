//! # Scene Graph
//!
//! The frame components never own nodes. They talk to the host hierarchy
//! through the [`SceneGraph`] trait: read a node's parent and world pose, write
//! a world pose back, and convert points between a node's local frame and the
//! world.
//!
//! [`Scene`] is the in-crate implementation: a generational node store with
//! local [`Transform`](crate::math::Transform)s and parent/child links.
//! [`SceneData`] is its JSON wire format.

mod data;
mod graph;
mod node;

use std::fmt;

use crate::math::{Quat, Vec3};

pub use data::{SceneData, SceneNode, load_scene, save_scene};
pub use graph::Scene;
pub use node::NodeId;

/// The hierarchy contract consumed by the frame components.
///
/// Reads of a dead node return `None`; writes to a dead node are ignored.
pub trait SceneGraph: 'static {
    type Node: Copy + Eq + fmt::Debug + 'static;

    fn is_alive(&self, node: Self::Node) -> bool;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn world_position(&self, node: Self::Node) -> Option<Vec3>;

    fn world_rotation(&self, node: Self::Node) -> Option<Quat>;

    /// Move a node in world space. Descendants move with it.
    fn set_world_position(&mut self, node: Self::Node, position: Vec3);

    /// Rotate a node in world space. Descendants move with it.
    fn set_world_rotation(&mut self, node: Self::Node, rotation: Quat);

    /// Set a node's world pose while its children keep their world poses.
    fn set_world_pose_keep_children(&mut self, node: Self::Node, position: Vec3, rotation: Quat);

    /// Map a point from the node's local frame into world space.
    fn transform_point(&self, node: Self::Node, point: Vec3) -> Option<Vec3>;

    /// Map a world-space point into the node's local frame.
    fn inverse_transform_point(&self, node: Self::Node, point: Vec3) -> Option<Vec3>;
}
