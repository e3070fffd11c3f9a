// Core library modules: path and config resolution, settings persistence,
// the throttle cache, and shared utilities.

pub mod config_loading;
pub mod paths;
pub mod state_management;
pub mod throttle;
pub mod utilities;
