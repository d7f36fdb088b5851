//! # Tether — Pose Constraints for Tracked Rigs
//!
//! Small building blocks for XR rigs where tracked nodes (hands, controllers)
//! are the source of truth and the rest of the hierarchy has to keep up:
//!
//! - [`AxisConstraint`](constraint::AxisConstraint): lock selected local axes
//!   of a node.
//! - [`ParentFollower`](constraint::ParentFollower): drag a node's parent along
//!   at a fixed offset.
//! - [`OffsetProvider`](interaction::OffsetProvider): re-anchor grabbed objects
//!   to the interactor that grabbed them.
//!
//! Components run from a [`BeforeRender`](schedule::BeforeRender) schedule the
//! host calls once per frame. Start with `use tether::prelude::*` and either
//! assemble a [`Rig`](rig::Rig) in code or load one with
//! [`RigConfig`](config::RigConfig).

pub mod config;
pub mod constraint;
pub mod error;
pub mod interaction;
pub mod math;
pub mod prelude;
pub mod rig;
pub mod scene;
pub mod schedule;

pub use error::{Error, Result};
