//! `log4rs` backend, compiled with the `logging` feature. Every reconfiguration rebuilds one
//! stderr console appender plus a `Logger` per module filter and swaps it into the running
//! handle, so stdout stays reserved for the run summary.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::{LogConfiguration, ModuleLogConfiguration};

const APPENDER: &str = "stderr";
// Timestamp, highlighted level and target
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

impl From<&ModuleLogConfiguration> for Logger {
    fn from(module_config: &ModuleLogConfiguration) -> Self {
        Logger::builder().build(module_config.module.clone(), module_config.level)
    }
}

fn build_config(
    global_level: LevelFilter,
    modules: impl Iterator<Item = Logger>,
) -> Result<Config, log4rs::config::runtime::ConfigErrors> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
        .loggers(modules)
        .build(Root::builder().appender(APPENDER).build(global_level))
}

impl LogConfiguration {
    pub(in crate::log) fn set_config(&mut self) {
        let config = match build_config(
            self.global_log_level,
            self.module_configurations.values().map(Logger::from),
        ) {
            Ok(config) => config,
            Err(errors) => {
                // Module names are plain strings, so this only fires on a malformed filter;
                // keep the facade's level in sync and leave the installed logger alone.
                log::set_max_level(self.global_log_level);
                log::warn!("log configuration rejected: {errors}");
                return;
            }
        };

        match self.root_handle {
            Some(ref handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.root_handle = Some(handle),
                // Another logger owns the `log` facade; fall back to level filtering only.
                Err(_) => log::set_max_level(self.global_log_level),
            },
        }
    }
}
