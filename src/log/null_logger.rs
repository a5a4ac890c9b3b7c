//! Backend for builds without the `logging` feature (and for wasm). No logger is installed; the
//! configuration only drives `log`'s global max level, so disabled macros stay cheap.

use crate::log::LogConfiguration;

impl LogConfiguration {
    pub(in crate::log) fn set_config(&mut self) {
        log::set_max_level(self.global_log_level);
    }
}
