//! Output backends for Oneline diagrams.
//!
//! A [`Diagram`](crate::diagram::Diagram) draws itself against the abstract
//! [`Backend`](oneline_core::backend::Backend) trait. This module provides
//! the concrete backends shipped with the crate.
//!
//! # Pipeline Position
//!
//! ```text
//! Network tables
//!     ↓ build
//! Diagram (resolved symbols)
//!     ↓ draw
//! Backend calls
//!     ↓ save (this module)
//! Output file or in-memory document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]

/// SVG export backend.
pub mod svg;
