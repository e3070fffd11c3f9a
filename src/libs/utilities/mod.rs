// This is the main module file for the `utilities` directory.
// It declares the helper submodules used by the throttle cache and the commands.

pub mod command_runner;
pub mod path_helpers;
pub mod platform;
pub mod timestamps;
