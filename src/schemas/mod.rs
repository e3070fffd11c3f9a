// Serde data structures for the files xinstall reads and writes.

// `config.yaml`
pub mod app_config;
// `~/.linstall.json`
pub mod throttle_state;
