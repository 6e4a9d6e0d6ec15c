//! Model flows built on the assembled arrays: toolkit calls plus artifact
//! persistence. No custom algorithmic content lives here; the pipeline is
//! the interesting part, these are its consumers.

pub mod level;
pub mod linear;
