//! Presentation and routing helpers shared by front ends.

pub mod format;
pub mod guard;
