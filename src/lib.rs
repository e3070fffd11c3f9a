//! Library interface for xinstall.
//!
//! The binary wires these modules to the command line; tests use them
//! directly.

pub mod errors;
pub mod libs;
pub mod logger;
pub mod schemas;

// Re-export the throttle cache API used by installer code.
pub use errors::{RunError, StoreError};
pub use libs::state_management::ThrottleStore;
pub use libs::throttle::{ActionKey, ActionState, Interval, ThrottleCache};
