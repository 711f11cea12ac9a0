//! Resource handlers, grouped the way the REST surface is.

pub mod catalog;
pub mod codes;
pub mod coords;
pub mod root;
