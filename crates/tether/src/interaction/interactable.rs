use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// How a grabbed object is moved toward its attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Driven by physics velocities.
    VelocityTracking,
    /// Moved as a kinematic body.
    Kinematic,
    /// Snapped to the attachment every frame.
    #[default]
    Instantaneous,
}

/// An object that can be picked up and attached to an interactor.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabInteractable {
    pub node: NodeId,
    /// The anchor the object aligns to while held. `None` means the object's
    /// own node.
    pub attach_transform: Option<NodeId>,
    /// Seconds to ease into the attachment.
    pub attach_ease_in_time: f32,
    pub movement_type: MovementType,
}

impl GrabInteractable {
    pub const DEFAULT_EASE_IN_TIME: f32 = 0.15;

    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            attach_transform: None,
            attach_ease_in_time: Self::DEFAULT_EASE_IN_TIME,
            movement_type: MovementType::Kinematic,
        }
    }

    /// The node the object currently aligns to.
    pub fn attach_node(&self) -> NodeId {
        self.attach_transform.unwrap_or(self.node)
    }
}

/// An object that can be selected but has no attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleInteractable {
    pub node: NodeId,
}

/// Anything an interactor can select.
#[derive(Debug, Clone, PartialEq)]
pub enum Interactable {
    Simple(SimpleInteractable),
    Grab(GrabInteractable),
}

impl Interactable {
    pub fn simple(node: NodeId) -> Self {
        Self::Simple(SimpleInteractable { node })
    }

    pub fn grab(node: NodeId) -> Self {
        Self::Grab(GrabInteractable::new(node))
    }

    pub fn node(&self) -> NodeId {
        match self {
            Self::Simple(simple) => simple.node,
            Self::Grab(grab) => grab.node,
        }
    }

    /// The attachment settings, for interactables that have them.
    pub fn attachment(&self) -> Option<&GrabInteractable> {
        match self {
            Self::Grab(grab) => Some(grab),
            Self::Simple(_) => None,
        }
    }

    pub fn attachment_mut(&mut self) -> Option<&mut GrabInteractable> {
        match self {
            Self::Grab(grab) => Some(grab),
            Self::Simple(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::scene::Scene;

    #[test]
    fn grab_defaults() {
        let mut scene = Scene::new();
        let node = scene.spawn(Transform::IDENTITY);
        let grab = GrabInteractable::new(node);
        assert_eq!(grab.attach_node(), node);
        assert_eq!(grab.attach_ease_in_time, 0.15);
        assert_eq!(grab.movement_type, MovementType::Kinematic);
    }

    #[test]
    fn only_grab_has_attachment() {
        let mut scene = Scene::new();
        let node = scene.spawn(Transform::IDENTITY);
        assert!(Interactable::simple(node).attachment().is_none());
        let mut grab = Interactable::grab(node);
        grab.attachment_mut().unwrap().attach_ease_in_time = 1.0;
        assert_eq!(grab.attachment().unwrap().attach_ease_in_time, 1.0);
        assert_eq!(grab.node(), node);
    }

    #[test]
    fn movement_type_uses_snake_case() {
        let json = serde_json::to_string(&MovementType::VelocityTracking).unwrap();
        assert_eq!(json, "\"velocity_tracking\"");
        assert_eq!(MovementType::default(), MovementType::Instantaneous);
    }
}
