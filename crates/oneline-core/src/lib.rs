//! Oneline Core
//!
//! Building blocks for single-line electrical diagrams. This crate knows
//! nothing about networks or diagrams; it provides:
//!
//! - **Geometry**: points, rotation, angle conventions ([`geometry`] module)
//! - **Text**: row wrapping and rotated label placement ([`text`] module)
//! - **Backend**: the drawing contract and a recording test double ([`backend`] module)
//! - **Routes**: connection polylines split around switches ([`route`] module)
//! - **Footprints**: the fixed drawings of each device ([`footprint`] module)

pub mod backend;
pub mod footprint;
pub mod geometry;
pub mod route;
pub mod text;
