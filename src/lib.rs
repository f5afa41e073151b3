// Library exports for the scenario CLI and integration tests
//
// Everything here runs on a single thread. The ledger asserts thread
// affinity on every mutation, and observers, dialog surfaces and
// collaboration backends are plain boxed trait objects.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod closure;
pub mod config {
    //! Configuration re-exports from the tabclose-config crate.
    pub use tabclose_config::*;
}
pub mod debug;
pub mod error;
pub mod model;
pub mod observer;
pub mod removal;
pub mod scenario;
pub mod tab;
pub mod thread_check;
