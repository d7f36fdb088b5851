//! # Rig Files
//!
//! A rig file describes a scene and the components acting on it:
//!
//! ```json
//! {
//!   "scene": { "nodes": [
//!     { "id": 0, "name": "right_hand", "transform": { "translation": [0.2, 1.1, 0.3] }, "children": [1] },
//!     { "id": 1, "name": "right_tip", "transform": { "translation": [0, 0, 0.12] } }
//!   ] },
//!   "interactors": [ { "name": "right", "node": "right_hand" } ],
//!   "axis_constraints": [ { "node": "right_tip", "rotation_x": true, "rotation_z": true } ],
//!   "parent_followers": [ { "node": "right_tip" } ],
//!   "offset_providers": [
//!     { "node": "right_hand", "interactor": "right", "attach_ease_in_time": 0.1, "movement_type": "kinematic" }
//!   ]
//! }
//! ```
//!
//! Components refer to nodes and interactors by name. An offset provider
//! without an `interactor` picks one the same way [`OffsetProvider::reset`]
//! does.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraint::AxisFlags;
use crate::error::{Error, Result};
use crate::interaction::{Interactor, InteractorId, OffsetProvider, OffsetSettings};
use crate::rig::Rig;
use crate::scene::{NodeId, Scene, SceneData, load_scene};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub scene: SceneData,
    pub interactors: Vec<InteractorConfig>,
    pub axis_constraints: Vec<AxisConstraintConfig>,
    pub parent_followers: Vec<ParentFollowerConfig>,
    pub offset_providers: Vec<OffsetProviderConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractorConfig {
    pub name: String,
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConstraintConfig {
    pub node: String,
    #[serde(flatten)]
    pub flags: AxisFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentFollowerConfig {
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetProviderConfig {
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactor: Option<String>,
    #[serde(flatten)]
    pub settings: OffsetSettings,
}

impl RigConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded rig from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Spawn the scene and register every component.
    ///
    /// All names are resolved before the rig is returned; an unknown node or
    /// interactor name fails the whole build.
    pub fn build(&self) -> Result<Rig> {
        let mut scene = Scene::new();
        load_scene(&mut scene, &self.scene)?;
        let mut rig = Rig::new(scene);

        for entry in &self.interactors {
            let node = resolve_node(&rig.scene, &entry.node)?;
            rig.interactions.add_interactor(Interactor::new(entry.name.as_str(), node));
        }

        for entry in &self.axis_constraints {
            let node = resolve_node(&rig.scene, &entry.node)?;
            rig.add_axis_constraint(node, entry.flags);
        }

        for entry in &self.parent_followers {
            let node = resolve_node(&rig.scene, &entry.node)?;
            rig.add_parent_follower(node);
        }

        for entry in &self.offset_providers {
            let node = resolve_node(&rig.scene, &entry.node)?;
            let mut provider = OffsetProvider::new(node).with_settings(entry.settings);
            match &entry.interactor {
                Some(name) => provider = provider.with_interactor(resolve_interactor(&rig, name)?),
                None => provider.reset(&mut rig.interactions, &rig.scene),
            }
            rig.add_offset_provider(provider);
        }

        log::debug!(
            "built rig: {} nodes, {} components, {} offset providers",
            rig.scene.node_count(),
            rig.schedule.len(),
            rig.offset_providers.len()
        );
        Ok(rig)
    }
}

fn resolve_node(scene: &Scene, name: &str) -> Result<NodeId> {
    scene
        .try_named(name)
        .ok_or_else(|| Error::UnknownNode(name.to_string()))
}

fn resolve_interactor(rig: &Rig, name: &str) -> Result<InteractorId> {
    rig.interactions
        .find_named(name)
        .ok_or_else(|| Error::UnknownInteractor(name.to_string()))
}
