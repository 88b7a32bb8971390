//! Manipulation engine for refit: an ordered pipeline of independent
//! metadata-rewriting passes over a shared in-memory project graph.
//!
//! Each pass implements [`Manipulator`]. A [`ManipulationManager`] holds the
//! passes in a fixed order, derives their [`State`]s from session properties,
//! runs one scan phase over the whole list and then one apply phase, and
//! reports the keys of every project that visibly changed.

pub mod errors;
pub mod manager;
pub mod manipulator;
pub mod manipulators;
pub mod overrides;
pub mod session;
pub mod state;

pub use errors::*;
pub use manager::*;
pub use manipulator::*;
pub use manipulators::*;
pub use overrides::*;
pub use session::*;
pub use state::*;
