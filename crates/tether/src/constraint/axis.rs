//! Per-axis position/rotation locks evaluated in the parent's current frame.

use serde::{Deserialize, Serialize};

use crate::math::{BVec3, Vec3, euler_angles, lock_axes, lock_euler, rotation_in_frame};
use crate::scene::SceneGraph;

/// Which local axes an [`AxisConstraint`] locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisFlags {
    pub position_x: bool,
    pub position_y: bool,
    pub position_z: bool,
    pub rotation_x: bool,
    pub rotation_y: bool,
    pub rotation_z: bool,
}

impl AxisFlags {
    pub const NONE: Self = Self::new(BVec3::FALSE, BVec3::FALSE);
    pub const ALL: Self = Self::new(BVec3::TRUE, BVec3::TRUE);

    pub const fn new(position: BVec3, rotation: BVec3) -> Self {
        Self {
            position_x: position.x,
            position_y: position.y,
            position_z: position.z,
            rotation_x: rotation.x,
            rotation_y: rotation.y,
            rotation_z: rotation.z,
        }
    }

    pub fn position_mask(&self) -> BVec3 {
        BVec3::new(self.position_x, self.position_y, self.position_z)
    }

    pub fn rotation_mask(&self) -> BVec3 {
        BVec3::new(self.rotation_x, self.rotation_y, self.rotation_z)
    }

    pub fn any(&self) -> bool {
        self.position_mask().any() || self.rotation_mask().any()
    }
}

/// Pose captured by [`AxisConstraint::initialize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstraintState<N> {
    /// Parent at initialization; `None` for a root node.
    pub reference_parent: Option<N>,
    /// Position relative to `reference_parent`, or world position for a root.
    pub locked_local_position: Vec3,
    /// Euler angles in degrees relative to `reference_parent`, or world
    /// angles for a root.
    pub locked_local_rotation: Vec3,
}

/// Locks selected position/rotation axes of a node to the values it had at
/// initialization, expressed in its parent's frame.
///
/// The reference parent is captured once. Re-parenting the node afterwards
/// is not tracked; call [`reinitialize`](Self::reinitialize) to re-capture.
#[derive(Debug, Clone)]
pub struct AxisConstraint<N> {
    node: N,
    flags: AxisFlags,
    state: Option<AxisConstraintState<N>>,
    initialized: bool,
}

impl<N: Copy + Eq + std::fmt::Debug> AxisConstraint<N> {
    pub fn new(node: N, flags: AxisFlags) -> Self {
        Self {
            node,
            flags,
            state: None,
            initialized: false,
        }
    }

    pub fn node(&self) -> N {
        self.node
    }

    pub fn flags(&self) -> AxisFlags {
        self.flags
    }

    /// Flags may change between frames; the locked values do not.
    pub fn set_flags(&mut self, flags: AxisFlags) {
        self.flags = flags;
    }

    pub fn flags_mut(&mut self) -> &mut AxisFlags {
        &mut self.flags
    }

    pub fn state(&self) -> Option<&AxisConstraintState<N>> {
        self.state.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Capture the reference parent and the locked local pose. Only the first
    /// call has an effect.
    pub fn initialize<G: SceneGraph<Node = N>>(&mut self, graph: &G) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.state = capture(graph, self.node);
        match &self.state {
            Some(state) => log::debug!(
                "axis constraint on {:?}: parent {:?}, locked position {}, locked rotation {}",
                self.node,
                state.reference_parent,
                state.locked_local_position,
                state.locked_local_rotation
            ),
            None => log::debug!("axis constraint on {:?}: node is gone, inert", self.node),
        }
    }

    /// Discard the captured state and capture again from the current pose.
    pub fn reinitialize<G: SceneGraph<Node = N>>(&mut self, graph: &G) {
        self.initialized = false;
        self.initialize(graph);
    }

    /// Apply the locks to the node's current world pose.
    pub fn update<G: SceneGraph<Node = N>>(&self, graph: &mut G) {
        let Some(state) = &self.state else {
            return;
        };
        if !graph.is_alive(self.node) {
            return;
        }
        match state.reference_parent.filter(|&p| graph.is_alive(p)) {
            Some(parent) => self.constrain_in_parent(graph, parent, state),
            None => self.constrain_in_world(graph, state),
        }
    }

    fn constrain_in_parent<G: SceneGraph<Node = N>>(
        &self,
        graph: &mut G,
        parent: N,
        state: &AxisConstraintState<N>,
    ) {
        let rotation_mask = self.flags.rotation_mask();
        if rotation_mask.any() {
            if let (Some(parent_rotation), Some(rotation)) =
                (graph.world_rotation(parent), graph.world_rotation(self.node))
            {
                let local = rotation_in_frame(parent_rotation, rotation);
                let local = lock_euler(local, state.locked_local_rotation, rotation_mask);
                graph.set_world_rotation(self.node, parent_rotation * local);
            }
        }

        let position_mask = self.flags.position_mask();
        if position_mask.any() {
            let local = graph
                .world_position(self.node)
                .and_then(|p| graph.inverse_transform_point(parent, p));
            if let Some(local) = local {
                let local = lock_axes(local, state.locked_local_position, position_mask);
                if let Some(world) = graph.transform_point(parent, local) {
                    graph.set_world_position(self.node, world);
                }
            }
        }
    }

    fn constrain_in_world<G: SceneGraph<Node = N>>(&self, graph: &mut G, state: &AxisConstraintState<N>) {
        let rotation_mask = self.flags.rotation_mask();
        if rotation_mask.any() {
            if let Some(rotation) = graph.world_rotation(self.node) {
                let locked = lock_euler(rotation, state.locked_local_rotation, rotation_mask);
                graph.set_world_rotation(self.node, locked);
            }
        }

        let position_mask = self.flags.position_mask();
        if position_mask.any() {
            if let Some(position) = graph.world_position(self.node) {
                let locked = lock_axes(position, state.locked_local_position, position_mask);
                graph.set_world_position(self.node, locked);
            }
        }
    }
}

fn capture<G: SceneGraph>(graph: &G, node: G::Node) -> Option<AxisConstraintState<G::Node>> {
    let position = graph.world_position(node)?;
    let rotation = graph.world_rotation(node)?;
    let reference_parent = graph.parent(node);

    let (local_position, local_rotation) = match reference_parent {
        Some(parent) => (
            graph.inverse_transform_point(parent, position)?,
            rotation_in_frame(graph.world_rotation(parent)?, rotation),
        ),
        None => (position, rotation),
    };

    Some(AxisConstraintState {
        reference_parent,
        locked_local_position: local_position,
        locked_local_rotation: euler_angles(local_rotation),
    })
}
