//! SYMCLI Adapter
//!
//! Runs the Solutions Enabler command-line tools and decodes their XML
//! output into domain records.

pub mod command;
pub mod source;
pub mod xml;

pub use command::*;
pub use source::*;
pub use xml::*;
