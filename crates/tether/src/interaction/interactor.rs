//! Interactors, the interactables they select, and the select events
//! fired between them.

use std::fmt;

use super::interactable::Interactable;
use crate::scene::NodeId;

type Listener = Box<dyn FnMut(&mut Interactable)>;

/// Identifies a listener registered on a [`SelectEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// A list of callbacks invoked with the interactable a selection concerns.
#[derive(Default)]
pub struct SelectEvent {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl SelectEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&mut Interactable) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Call every listener in registration order.
    pub fn invoke(&mut self, interactable: &mut Interactable) {
        for (_, listener) in &mut self.listeners {
            listener(interactable);
        }
    }
}

impl fmt::Debug for SelectEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectEvent")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Something that selects interactables: a hand, a controller, a ray.
#[derive(Debug)]
pub struct Interactor {
    pub name: String,
    pub node: NodeId,
    pub on_select_enter: SelectEvent,
    pub on_select_exit: SelectEvent,
    selected: Option<InteractableId>,
}

impl Interactor {
    pub fn new(name: impl Into<String>, node: NodeId) -> Self {
        Self {
            name: name.into(),
            node,
            on_select_enter: SelectEvent::new(),
            on_select_exit: SelectEvent::new(),
            selected: None,
        }
    }

    /// The interactable this interactor currently holds.
    pub fn selected(&self) -> Option<InteractableId> {
        self.selected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractorId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractableId(u32);

/// Registry of interactors and interactables, and the selections between
/// them.
#[derive(Debug, Default)]
pub struct Interactions {
    interactors: Vec<Interactor>,
    interactables: Vec<Interactable>,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interactor(&mut self, interactor: Interactor) -> InteractorId {
        self.interactors.push(interactor);
        InteractorId(self.interactors.len() as u32 - 1)
    }

    pub fn add_interactable(&mut self, interactable: Interactable) -> InteractableId {
        self.interactables.push(interactable);
        InteractableId(self.interactables.len() as u32 - 1)
    }

    pub fn interactor(&self, id: InteractorId) -> Option<&Interactor> {
        self.interactors.get(id.0 as usize)
    }

    pub fn interactor_mut(&mut self, id: InteractorId) -> Option<&mut Interactor> {
        self.interactors.get_mut(id.0 as usize)
    }

    pub fn interactable(&self, id: InteractableId) -> Option<&Interactable> {
        self.interactables.get(id.0 as usize)
    }

    pub fn interactable_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.interactables.get_mut(id.0 as usize)
    }

    /// The first interactor attached to `node`.
    pub fn find_on_node(&self, node: NodeId) -> Option<InteractorId> {
        self.interactors
            .iter()
            .position(|i| i.node == node)
            .map(|index| InteractorId(index as u32))
    }

    pub fn find_named(&self, name: &str) -> Option<InteractorId> {
        self.interactors
            .iter()
            .position(|i| i.name == name)
            .map(|index| InteractorId(index as u32))
    }

    /// Any interactor at all.
    pub fn first(&self) -> Option<InteractorId> {
        (!self.interactors.is_empty()).then_some(InteractorId(0))
    }

    pub fn interactor_count(&self) -> usize {
        self.interactors.len()
    }

    /// Start a selection and fire the interactor's select-enter listeners.
    ///
    /// An interactor already holding something releases it first. Returns
    /// `false` if either id is unknown.
    pub fn select_enter(&mut self, interactor: InteractorId, interactable: InteractableId) -> bool {
        if self.interactable(interactable).is_none() || self.interactor(interactor).is_none() {
            return false;
        }
        if self.interactors[interactor.0 as usize].selected.is_some() {
            self.select_exit(interactor);
        }
        let Self {
            interactors,
            interactables,
        } = self;
        let source = &mut interactors[interactor.0 as usize];
        let target = &mut interactables[interactable.0 as usize];
        log::trace!("{} selects {:?}", source.name, target.node());
        source.selected = Some(interactable);
        source.on_select_enter.invoke(target);
        true
    }

    /// End the interactor's current selection and fire its select-exit
    /// listeners. Returns `false` if nothing was selected.
    pub fn select_exit(&mut self, interactor: InteractorId) -> bool {
        let Self {
            interactors,
            interactables,
        } = self;
        let Some(source) = interactors.get_mut(interactor.0 as usize) else {
            return false;
        };
        let Some(selected) = source.selected.take() else {
            return false;
        };
        let Some(target) = interactables.get_mut(selected.0 as usize) else {
            return false;
        };
        log::trace!("{} releases {:?}", source.name, target.node());
        source.on_select_exit.invoke(target);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::math::Transform;
    use crate::scene::Scene;

    #[test]
    fn listeners_fire_in_order_and_can_be_removed() {
        let mut scene = Scene::new();
        let mut target = Interactable::grab(scene.spawn(Transform::IDENTITY));
        let mut event = SelectEvent::new();

        let first = event.add_listener(|i| i.attachment_mut().unwrap().attach_ease_in_time = 1.0);
        event.add_listener(|i| i.attachment_mut().unwrap().attach_ease_in_time *= 2.0);
        event.invoke(&mut target);
        assert_eq!(target.attachment().unwrap().attach_ease_in_time, 2.0);

        assert!(event.remove_listener(first));
        assert!(!event.remove_listener(first));
        assert_eq!(event.listener_count(), 1);
        event.invoke(&mut target);
        assert_eq!(target.attachment().unwrap().attach_ease_in_time, 4.0);
    }

    #[test]
    fn select_enter_and_exit_fire_events() {
        let mut scene = Scene::new();
        let hand = scene.spawn(Transform::IDENTITY);
        let cube = scene.spawn(Transform::IDENTITY);
        let mut interactions = Interactions::new();
        let interactor = interactions.add_interactor(Interactor::new("right hand", hand));
        let interactable = interactions.add_interactable(Interactable::grab(cube));

        let entered = Rc::new(Cell::new(0));
        let exited = Rc::new(Cell::new(0));
        let right = interactions.interactor_mut(interactor).unwrap();
        let counter = Rc::clone(&entered);
        right.on_select_enter.add_listener(move |_| counter.set(counter.get() + 1));
        let counter = Rc::clone(&exited);
        right.on_select_exit.add_listener(move |_| counter.set(counter.get() + 1));

        assert!(!interactions.select_exit(interactor));
        assert!(interactions.select_enter(interactor, interactable));
        assert_eq!(interactions.interactor(interactor).unwrap().selected(), Some(interactable));
        // Selecting again releases the previous selection first.
        assert!(interactions.select_enter(interactor, interactable));
        assert_eq!((entered.get(), exited.get()), (2, 1));

        assert!(interactions.select_exit(interactor));
        assert_eq!((entered.get(), exited.get()), (2, 2));
        assert_eq!(interactions.interactor(interactor).unwrap().selected(), None);
    }

    #[test]
    fn lookup() {
        let mut scene = Scene::new();
        let left = scene.spawn(Transform::IDENTITY);
        let right = scene.spawn(Transform::IDENTITY);
        let mut interactions = Interactions::new();
        assert_eq!(interactions.first(), None);

        interactions.add_interactor(Interactor::new("left", left));
        let r = interactions.add_interactor(Interactor::new("right", right));
        assert_eq!(interactions.find_on_node(right), Some(r));
        assert_eq!(interactions.find_named("right"), Some(r));
        assert_eq!(interactions.find_named("head"), None);
        assert_eq!(interactions.first().and_then(|i| interactions.interactor(i)).map(|i| i.node), Some(left));
    }
}
