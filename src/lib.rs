//! Catalog reconciliation library - shared modules for both binaries.

pub mod catalog;
pub mod emit;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod overrides;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod safety;
pub mod sheet;
