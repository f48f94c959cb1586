//! Core reconciliation logic and publishing conventions.

pub mod lesson;
pub mod manifest;
pub mod placement;
pub mod reconcile;
pub mod reference;

pub use reconcile::{AssetRef, Outcome, reconcile};
pub use reference::MediaKind;
