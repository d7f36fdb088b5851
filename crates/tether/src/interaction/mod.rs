//! # Interaction
//!
//! Interactors (hands, controllers) select interactables (anything that can
//! be grabbed or pressed). Each interactor exposes select-enter and
//! select-exit events with plain listener lists; [`OffsetProvider`] is a
//! listener pair that re-anchors grabbed objects to the interactor.
//!
//! Interactables are a closed set ([`Interactable`]); code that needs the
//! attachment goes through [`Interactable::attachment_mut`] and simply skips
//! variants without one.

mod interactable;
mod interactor;
mod offset;

pub use interactable::{GrabInteractable, Interactable, MovementType, SimpleInteractable};
pub use interactor::{
    InteractableId, Interactions, Interactor, InteractorId, ListenerId, SelectEvent,
};
pub use offset::{OffsetProvider, OffsetSettings, apply_offset, clear_offset};
