//! Domain Module
//!
//! Core domain types and the trait boundary to the array's management
//! interface.

pub mod ports;

pub use ports::*;
