//! Tools module - lookups the team can call and the registry that runs them

pub mod guidelines;
pub mod knowledge;
pub mod registry;

pub use registry::{Tool, ToolRegistry};
