//! A scene plus everything that acts on it each frame.

use crate::constraint::{AxisConstraint, AxisFlags, ParentFollower};
use crate::interaction::{Interactions, OffsetProvider};
use crate::scene::{NodeId, Scene};
use crate::schedule::{BeforeRender, ComponentHandle};

/// Owns a [`Scene`], its before-render components, and its interactions.
///
/// The host loop moves tracked nodes (hands, head), fires selections through
/// [`interactions`](Self::interactions), then calls
/// [`run_frame`](Self::run_frame) right before rendering.
#[derive(Default)]
pub struct Rig {
    pub scene: Scene,
    pub schedule: BeforeRender<Scene>,
    pub interactions: Interactions,
    pub offset_providers: Vec<OffsetProvider>,
}

impl Rig {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            ..Default::default()
        }
    }

    pub fn add_axis_constraint(&mut self, node: NodeId, flags: AxisFlags) -> ComponentHandle {
        self.schedule.add(AxisConstraint::new(node, flags))
    }

    pub fn add_parent_follower(&mut self, node: NodeId) -> ComponentHandle {
        self.schedule.add(ParentFollower::new(node))
    }

    /// Enable a provider and keep it with the rig. Returns its index in
    /// [`offset_providers`](Self::offset_providers).
    pub fn add_offset_provider(&mut self, mut provider: OffsetProvider) -> usize {
        provider.enable(&mut self.interactions);
        self.offset_providers.push(provider);
        self.offset_providers.len() - 1
    }

    /// Run the before-render schedule against the scene.
    pub fn run_frame(&mut self) {
        self.schedule.run(&mut self.scene);
    }
}
