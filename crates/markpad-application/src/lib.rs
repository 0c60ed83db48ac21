//! Application layer for Markpad.
//!
//! This crate provides the `DocumentCoordinator`, which coordinates between
//! the domain state machines in `markpad-core`, the filesystem adapters in
//! `markpad-infrastructure` and the host's dialogs and windows.

pub mod coordinator;
pub mod dispatch;
pub mod wiring;

pub use coordinator::{DocumentCoordinator, SharedCoordinator};
pub use wiring::{HostServices, build_coordinator};
