//! # NCERT Study Planner Domain Models
//!
//! Data shared between the content extraction pipeline, the planner and the
//! exporters.
//!
//! ## Key Models
//!
//! - **ContentModel**: chapters -> topics -> subtopics -> content blocks, as
//!   extracted from the textbook PDFs
//! - **StudyPlan**: a day-by-day partition of every topic in a `ContentModel`
//!
//! Names are validated with the validator crate; topic weights are derived
//! from content length when a topic is built.

pub mod content;
pub mod plan;

#[cfg(test)]
pub mod property_tests;

pub use content::*;
pub use plan::*;
