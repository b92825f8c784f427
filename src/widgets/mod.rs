//! Shared drawing building blocks used by the page renderers.

pub mod chrome;
pub mod graph;
