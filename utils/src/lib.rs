//! Utility library for Nexus Timer.

pub mod collections;
pub mod concurrent;
pub mod timing;
