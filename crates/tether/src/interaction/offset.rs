//! Dynamic grab offsets.
//!
//! An [`OffsetProvider`] listens to an interactor's selections. When the
//! interactor selects a grabbable object, the object's attachment anchor
//! becomes the interactor's own node, so the object is held where it was
//! grabbed instead of snapping to a fixed attach point. When the selection
//! ends the anchor is cleared.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::interactable::{Interactable, MovementType};
use super::interactor::{InteractorId, Interactions, ListenerId};
use crate::scene::{NodeId, Scene};

/// Values an [`OffsetProvider`] hands to the objects it attaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetSettings {
    /// Seconds to ease into the attachment.
    pub attach_ease_in_time: f32,
    pub movement_type: MovementType,
}

/// Point `target`'s attachment at `anchor`. Objects without an attachment are
/// left alone.
pub fn apply_offset(target: &mut Interactable, anchor: NodeId, settings: OffsetSettings) {
    if let Some(grab) = target.attachment_mut() {
        grab.attach_transform = Some(anchor);
        grab.attach_ease_in_time = settings.attach_ease_in_time;
        grab.movement_type = settings.movement_type;
    }
}

/// Clear `target`'s attachment anchor.
pub fn clear_offset(target: &mut Interactable) {
    if let Some(grab) = target.attachment_mut() {
        grab.attach_transform = None;
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    interactor: InteractorId,
    enter: ListenerId,
    exit: ListenerId,
}

/// Attaches grabbed objects to an interactor's current pose.
///
/// Listeners are only registered while enabled. Settings are shared with the
/// registered listeners and read when a selection happens, so changes apply to
/// the next grab without re-enabling.
#[derive(Debug)]
pub struct OffsetProvider {
    node: NodeId,
    interactor: Option<InteractorId>,
    settings: Rc<Cell<OffsetSettings>>,
    registration: Option<Registration>,
}

impl OffsetProvider {
    /// A provider living on `node`, with no interactor yet.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            interactor: None,
            settings: Rc::new(Cell::new(OffsetSettings::default())),
            registration: None,
        }
    }

    pub fn with_interactor(mut self, interactor: InteractorId) -> Self {
        self.interactor = Some(interactor);
        self
    }

    pub fn with_settings(self, settings: OffsetSettings) -> Self {
        self.settings.set(settings);
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn interactor(&self) -> Option<InteractorId> {
        self.interactor
    }

    /// Change the interactor. An enabled provider moves its listeners over.
    pub fn set_interactor(&mut self, interactor: Option<InteractorId>, interactions: &mut Interactions) {
        let was_enabled = self.disable(interactions);
        self.interactor = interactor;
        if was_enabled {
            self.enable(interactions);
        }
    }

    pub fn settings(&self) -> OffsetSettings {
        self.settings.get()
    }

    pub fn set_settings(&self, settings: OffsetSettings) {
        self.settings.set(settings);
    }

    pub fn set_attach_ease_in_time(&self, seconds: f32) {
        self.settings.set(OffsetSettings {
            attach_ease_in_time: seconds,
            ..self.settings.get()
        });
    }

    pub fn set_movement_type(&self, movement_type: MovementType) {
        self.settings.set(OffsetSettings {
            movement_type,
            ..self.settings.get()
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.registration.is_some()
    }

    /// Pick an interactor automatically: the first one on the provider's own
    /// node, otherwise any interactor at all. An enabled provider moves its
    /// listeners to the interactor it picks.
    pub fn reset(&mut self, interactions: &mut Interactions, scene: &Scene) {
        let found = discover_interactor(self.node, interactions, scene);
        self.set_interactor(found, interactions);
    }

    /// Register the select listeners on the interactor.
    ///
    /// Returns `true` if listeners were added; `false` when already enabled or
    /// when there is no usable interactor.
    pub fn enable(&mut self, interactions: &mut Interactions) -> bool {
        if self.registration.is_some() {
            return false;
        }
        let Some(id) = self.interactor else {
            return false;
        };
        let Some(interactor) = interactions.interactor_mut(id) else {
            return false;
        };

        let anchor = interactor.node;
        let settings = Rc::clone(&self.settings);
        let enter = interactor
            .on_select_enter
            .add_listener(move |target| apply_offset(target, anchor, settings.get()));
        let exit = interactor.on_select_exit.add_listener(clear_offset);

        log::debug!("offset provider on {:?}: listening to {}", self.node, interactor.name);
        self.registration = Some(Registration {
            interactor: id,
            enter,
            exit,
        });
        true
    }

    /// Remove the listeners added by [`enable`](Self::enable). Returns `true`
    /// if listeners were removed.
    pub fn disable(&mut self, interactions: &mut Interactions) -> bool {
        let Some(registration) = self.registration.take() else {
            return false;
        };
        if let Some(interactor) = interactions.interactor_mut(registration.interactor) {
            interactor.on_select_enter.remove_listener(registration.enter);
            interactor.on_select_exit.remove_listener(registration.exit);
        }
        true
    }
}

fn discover_interactor(owner: NodeId, interactions: &Interactions, scene: &Scene) -> Option<InteractorId> {
    if let Some(local) = interactions.find_on_node(owner) {
        return Some(local);
    }

    let owner = display_name(scene, owner);
    log::warn!("[{owner}][OffsetProvider]: Did not find a local interactor attached to the same node.");

    let any = interactions.first();
    match any.and_then(|id| interactions.interactor(id)) {
        Some(found) => log::warn!(
            "[{owner}][OffsetProvider]: Found an interactor attached to {}.",
            display_name(scene, found.node)
        ),
        None => log::warn!("[{owner}][OffsetProvider]: Did not find an interactor in the scene."),
    }
    any
}

fn display_name(scene: &Scene, node: NodeId) -> String {
    scene
        .name(node)
        .map(str::to_string)
        .unwrap_or_else(|| node.to_string())
}
