// Register application subcommands.
// Each module corresponds to a specific `xinstall` command-line action.

use anyhow::Result;
use xinstall::libs::config_loading::load_app_config;
use xinstall::libs::paths::{resolve_config_path, resolve_settings_path};
use xinstall::libs::state_management::ThrottleStore;
use xinstall::libs::throttle::{Interval, ThrottleCache};
use xinstall::libs::utilities::platform::{CommandOptions, running_as_root};
use xinstall::schemas::app_config::{AppConfig, SudoPolicy};

// Lists recorded actions and their throttle state.
pub mod status;
// Runs an arbitrary command behind the throttle cache.
pub mod throttle;
// Refreshes the system package index, throttled.
pub mod update_index;
// Displays the version of xinstall.
pub mod version;

/// Everything a command needs, resolved once from flags, environment and
/// config file.
pub struct Context {
    pub config: AppConfig,
    pub cache: ThrottleCache,
    pub command_options: CommandOptions,
}

impl Context {
    /// Loads the config file and builds the throttle cache.
    ///
    /// CLI values win over the config file; `yes` can only switch
    /// `assume_yes` on.
    pub fn load(
        config_path: Option<&str>,
        settings_path: Option<&str>,
        sudo: Option<SudoPolicy>,
        yes: bool,
    ) -> Result<Self> {
        let config = load_app_config(&resolve_config_path(config_path))?;
        let settings = resolve_settings_path(settings_path, &config);

        let command_options = CommandOptions {
            sudo: sudo.unwrap_or(config.use_sudo).resolve(running_as_root()),
            assume_yes: yes || config.assume_yes,
        };

        Ok(Self {
            cache: ThrottleCache::new(ThrottleStore::new(settings)),
            command_options,
            config,
        })
    }

    /// The interval given on the command line, or the configured default.
    pub fn interval(&self, seconds: Option<f64>) -> Interval {
        Interval::from_seconds(seconds.unwrap_or(self.config.update_interval_seconds))
    }
}
