//! Error adapter for converting OnelineError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Network errors
//! carry no source spans, so the adapter contributes a code and, where the
//! fix is usually the same, a help line.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use oneline::OnelineError;

/// Adapter for [`OnelineError`] values.
pub struct ErrorAdapter<'a>(pub &'a OnelineError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            OnelineError::UnresolvedReference { .. } => "oneline::unresolved_reference",
            OnelineError::InvalidSwitchGeometry { .. } => "oneline::invalid_switch",
            OnelineError::MissingCoordinate { .. } => "oneline::missing_coordinate",
            OnelineError::DuplicateIndex { .. } => "oneline::duplicate_index",
            OnelineError::DuplicateSwitch { .. } => "oneline::duplicate_switch",
            OnelineError::Backend(_) => "oneline::backend",
            OnelineError::Io(_) => "oneline::io",
            OnelineError::Network(_) => "oneline::network",
            OnelineError::Config(_) => "oneline::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            OnelineError::UnresolvedReference { .. } => {
                "every bus, line and transformer a row refers to must have its own row"
            }
            OnelineError::InvalidSwitchGeometry { .. } => {
                "a switch must sit on a bus its element is connected to"
            }
            OnelineError::MissingCoordinate { .. } => {
                "give the bus a `geo` point or a `busbar` pair"
            }
            OnelineError::DuplicateSwitch { .. } => {
                "only one switch can sit on each end of an element"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
