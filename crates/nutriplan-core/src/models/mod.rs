//! Domain models for the nutriplan resolver.

mod clause;
mod food;
mod macros;

pub use clause::*;
pub use food::*;
pub use macros::*;
