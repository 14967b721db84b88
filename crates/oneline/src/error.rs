//! Error types for Oneline operations.
//!
//! This module provides the main error type [`OnelineError`]. Every failure
//! is a caller contract violation or an I/O problem; a diagram that fails to
//! build or draw produces no output at all.

use std::io;

use thiserror::Error;

use oneline_core::backend::BackendError;

use crate::identifier::{BusId, Category, ElementKey};

/// The main error type for Oneline operations.
#[derive(Debug, Error)]
pub enum OnelineError {
    #[error("Unresolved reference: {category} {index} is not in the diagram")]
    UnresolvedReference { category: Category, index: usize },

    #[error("Invalid switch geometry: {bus} is not an end of {element}")]
    InvalidSwitchGeometry { element: ElementKey, bus: BusId },

    #[error("Missing coordinate: {bus} has no placement")]
    MissingCoordinate { bus: BusId },

    #[error("Duplicate index: {category} {index} is already registered")]
    DuplicateIndex { category: Category, index: usize },

    #[error("Duplicate switch: {element} already has a switch at {bus}")]
    DuplicateSwitch { element: ElementKey, bus: BusId },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OnelineError {
    /// An unresolved reference to `index` in `category`
    pub fn unresolved(category: Category, index: usize) -> Self {
        Self::UnresolvedReference { category, index }
    }
}
