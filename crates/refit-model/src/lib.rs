//! Project descriptor model for refit.
//!
//! One `project.toml` descriptor per module: coordinates, version,
//! packaging, dependency lists and profiles. The loader follows
//! `package.modules` declarations to assemble the full multi-module graph.

pub mod coords;
pub mod descriptor;
pub mod errors;
pub mod io;
pub mod project;

pub use coords::*;
pub use descriptor::*;
pub use errors::*;
pub use io::*;
pub use project::*;
