//! Convenience re-exports — `use tether::prelude::*` for the common items.

pub use crate::config::RigConfig;
pub use crate::constraint::{AxisConstraint, AxisFlags, ParentFollower};
pub use crate::error::{Error, Result};
pub use crate::interaction::{
    GrabInteractable, Interactable, Interactions, Interactor, MovementType, OffsetProvider,
    OffsetSettings,
};
pub use crate::math::{BVec3, Quat, Transform, Vec3};
pub use crate::rig::Rig;
pub use crate::scene::{NodeId, Scene, SceneGraph};
pub use crate::schedule::{BeforeRender, ComponentHandle, FrameComponent};
