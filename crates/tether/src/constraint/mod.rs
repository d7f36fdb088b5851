//! # Frame Constraints
//!
//! Two components that post-process node poses once per frame, after
//! everything else has moved:
//!
//! - [`AxisConstraint`] locks selected local axes of a node to their values at
//!   initialization.
//! - [`ParentFollower`] moves a node's *parent* so it keeps a fixed offset from
//!   the node.
//!
//! Both are generic over the [`SceneGraph`] node handle and run from the
//! [`BeforeRender`](crate::schedule::BeforeRender) schedule. When both act on
//! the same node, the constraint runs first so the follower sees the
//! constrained pose.

mod axis;
mod follow;

use std::any::Any;

use crate::scene::SceneGraph;
use crate::schedule::{AXIS_CONSTRAINT_PRIORITY, FrameComponent, PARENT_FOLLOWER_PRIORITY};

pub use axis::{AxisConstraint, AxisConstraintState, AxisFlags};
pub use follow::{FollowerOffset, ParentFollower};

impl<G: SceneGraph> FrameComponent<G> for AxisConstraint<G::Node> {
    fn priority(&self) -> i32 {
        AXIS_CONSTRAINT_PRIORITY
    }

    fn initialize(&mut self, graph: &G) {
        AxisConstraint::initialize(self, graph);
    }

    fn reinitialize(&mut self, graph: &G) {
        AxisConstraint::reinitialize(self, graph);
    }

    fn update(&mut self, graph: &mut G) {
        AxisConstraint::update(self, graph);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<G: SceneGraph> FrameComponent<G> for ParentFollower<G::Node> {
    fn priority(&self) -> i32 {
        PARENT_FOLLOWER_PRIORITY
    }

    fn initialize(&mut self, graph: &G) {
        ParentFollower::initialize(self, graph);
    }

    fn reinitialize(&mut self, graph: &G) {
        ParentFollower::reinitialize(self, graph);
    }

    fn update(&mut self, graph: &mut G) {
        ParentFollower::update(self, graph);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
