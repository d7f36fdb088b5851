//! Errors for the data-driven edges of the crate (rig files, scene data).
//!
//! The per-frame components never fail: a missing parent or interactor is a
//! valid state and simply does nothing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read rig file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid rig description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no node named \"{0}\"")]
    UnknownNode(String),

    #[error("no interactor named \"{0}\"")]
    UnknownInteractor(String),

    #[error("name \"{0}\" is used by more than one node")]
    DuplicateName(String),

    #[error("scene node {parent} lists unknown child {child}")]
    UnknownChild { parent: u32, child: u32 },

    #[error("scene node id {0} appears more than once")]
    DuplicateId(u32),

    #[error("scene node {0} has more than one parent or is its own ancestor")]
    InvalidHierarchy(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
