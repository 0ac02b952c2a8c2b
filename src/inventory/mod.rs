//! Inventory Module
//!
//! Director registry, the three discovery passes that populate it, and the
//! text report rendered from it.

pub mod discovery;
pub mod registry;
pub mod report;

pub use discovery::*;
pub use registry::*;
pub use report::*;
