//! Plan extraction and macro re-injection for generated nutrition plans.
//!
//! A plan generator returns a weekly plan wrapped in `###JSON_START###` /
//! `###JSON_END###` markers, or a single regenerated meal as a loose JSON
//! object. This crate parses both and rewrites every meal's macros from
//! the food database through [`nutriplan_core::MacroResolver`].

pub mod extraction;
pub mod injection;
pub mod plan;

pub use extraction::*;
pub use injection::*;
pub use plan::*;
