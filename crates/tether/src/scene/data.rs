//! # Scene Data — JSON Wire Format
//!
//! ```json
//! { "nodes": [
//!     { "id": 0, "name": "hand", "transform": { "translation": [0, 1, 0] }, "children": [1] },
//!     { "id": 1, "name": "fingertip", "transform": { "translation": [0, 0, 0.1] } }
//! ] }
//! ```
//!
//! Hierarchy is encoded in `children` lists, not parent links. Transforms are
//! local; any omitted transform field takes its identity value.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::graph::Scene;
use super::node::NodeId;
use crate::error::{Error, Result};
use crate::math::Transform;

/// A serialized scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
}

/// A single node in a serialized scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<u32>,
}

/// Save every node in the scene. Roots come first, then children, each group
/// in slot order.
pub fn save_scene(scene: &Scene) -> SceneData {
    let (roots, children): (Vec<NodeId>, Vec<NodeId>) =
        scene.nodes().partition(|&n| scene.parent(n).is_none());

    let nodes = roots
        .into_iter()
        .chain(children)
        .filter_map(|node| {
            Some(SceneNode {
                id: node.index(),
                name: scene.name(node).map(str::to_string),
                transform: *scene.local(node)?,
                children: scene.children(node).iter().map(|c| c.index()).collect(),
            })
        })
        .collect();

    SceneData { nodes }
}

/// Load scene data into `scene`, returning the map from data ids to spawned
/// nodes.
///
/// The data is validated before anything is spawned, so an error leaves the
/// scene untouched.
pub fn load_scene(scene: &mut Scene, data: &SceneData) -> Result<HashMap<u32, NodeId>> {
    validate(scene, data)?;

    let mut id_map = HashMap::with_capacity(data.nodes.len());
    for entry in &data.nodes {
        let node = match &entry.name {
            Some(name) => scene.spawn_named(name, entry.transform),
            None => scene.spawn(entry.transform),
        };
        id_map.insert(entry.id, node);
    }

    for entry in &data.nodes {
        let parent = id_map[&entry.id];
        for child in &entry.children {
            scene.attach(id_map[child], parent);
        }
    }

    log::debug!("loaded {} scene nodes", id_map.len());
    Ok(id_map)
}

fn validate(scene: &Scene, data: &SceneData) -> Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for entry in &data.nodes {
        if !ids.insert(entry.id) {
            return Err(Error::DuplicateId(entry.id));
        }
        if let Some(name) = &entry.name {
            if !names.insert(name.as_str()) || scene.try_named(name).is_some() {
                return Err(Error::DuplicateName(name.clone()));
            }
        }
    }
    let mut parents = HashMap::new();
    for entry in &data.nodes {
        for &child in &entry.children {
            if !ids.contains(&child) {
                return Err(Error::UnknownChild {
                    parent: entry.id,
                    child,
                });
            }
            if parents.insert(child, entry.id).is_some() {
                return Err(Error::InvalidHierarchy(child));
            }
        }
    }
    // Every chain of parents must reach a root.
    for &start in parents.keys() {
        let mut cursor = start;
        let mut steps = 0;
        while let Some(&parent) = parents.get(&cursor) {
            steps += 1;
            if parent == start || steps > parents.len() {
                return Err(Error::InvalidHierarchy(start));
            }
            cursor = parent;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn hand_scene() -> Scene {
        let mut scene = Scene::new();
        let hand = scene.spawn_named("hand", Transform::from_xyz(0.0, 1.0, 0.0));
        scene.spawn_named_child(hand, "tip", Transform::from_xyz(0.0, 0.0, 0.1));
        scene.spawn(Transform::from_xyz(5.0, 0.0, 0.0));
        scene
    }

    #[test]
    fn save_puts_roots_first() {
        let data = save_scene(&hand_scene());
        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.nodes[0].name.as_deref(), Some("hand"));
        assert_eq!(data.nodes[0].children, vec![1]);
        assert_eq!(data.nodes[2].name.as_deref(), Some("tip"));
    }

    #[test]
    fn load_restores_hierarchy() {
        let data = save_scene(&hand_scene());
        let mut scene = Scene::new();
        let ids = load_scene(&mut scene, &data).unwrap();

        assert_eq!(ids.len(), 3);
        let tip = scene.named("tip");
        assert_eq!(scene.parent(tip), Some(scene.named("hand")));
        assert_eq!(scene.world_position(tip), Some(Vec3::new(0.0, 1.0, 0.1)));
    }

    #[test]
    fn parses_partial_transforms() {
        let json = r#"{ "nodes": [
            { "id": 7, "name": "root", "transform": { "translation": [1, 2, 3] }, "children": [9] },
            { "id": 9 }
        ] }"#;
        let data: SceneData = serde_json::from_str(json).unwrap();
        assert_eq!(data.nodes[0].transform.scale, Vec3::ONE);

        let mut scene = Scene::new();
        let ids = load_scene(&mut scene, &data).unwrap();
        assert_eq!(scene.world_position(ids[&9]), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn unknown_child_is_rejected_without_spawning() {
        let data = SceneData {
            nodes: vec![SceneNode {
                id: 0,
                name: None,
                transform: Transform::IDENTITY,
                children: vec![4],
            }],
        };
        let mut scene = Scene::new();
        let err = load_scene(&mut scene, &data).unwrap_err();
        assert!(matches!(err, Error::UnknownChild { parent: 0, child: 4 }));
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn cycles_and_shared_children_are_rejected() {
        let node = |id, children: Vec<u32>| SceneNode {
            id,
            name: None,
            transform: Transform::IDENTITY,
            children,
        };
        let cycle = SceneData {
            nodes: vec![node(0, vec![1]), node(1, vec![0])],
        };
        let mut scene = Scene::new();
        assert!(matches!(load_scene(&mut scene, &cycle), Err(Error::InvalidHierarchy(_))));

        let shared = SceneData {
            nodes: vec![node(0, vec![2]), node(1, vec![2]), node(2, vec![])],
        };
        assert!(matches!(load_scene(&mut scene, &shared), Err(Error::InvalidHierarchy(2))));

        let own_child = SceneData {
            nodes: vec![node(5, vec![5])],
        };
        assert!(matches!(load_scene(&mut scene, &own_child), Err(Error::InvalidHierarchy(5))));
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let data = save_scene(&hand_scene());
        let mut scene = hand_scene();
        let err = load_scene(&mut scene, &data).unwrap_err();
        assert!(matches!(err, Error::DuplicateName(name) if name == "hand"));
    }
}
