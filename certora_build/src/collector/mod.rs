//!
//! The per-contract data collectors.
//!

pub mod functions;
pub mod immutables;
pub mod source_list;
