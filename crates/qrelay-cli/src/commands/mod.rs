//! CLI command implementations.

pub mod broadcast;
pub mod common;
pub mod compare;
pub mod guide;
pub mod teleport;
pub mod version;
