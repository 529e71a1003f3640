//! Contains common structures and methods shared by the reasoning rules of the cumulative
//! constraint.
mod structs;

pub use structs::*;
