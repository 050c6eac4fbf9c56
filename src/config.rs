use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DATA_DIR: &str = ".attendance";
pub const DEFAULT_LOG_FILTER: &str = "attendance_calc=warn";
pub const VERBOSE_LOG_FILTER: &str = "attendance_calc=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    /// `data_dir` is whatever the CLI resolved from the flag or
    /// `ATTENDANCE_DATA_DIR`.
    pub fn resolve(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            verbose,
        }
    }

    /// `--verbose` wins over `RUST_LOG`; without either, only warnings show.
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new(VERBOSE_LOG_FILTER)
        } else {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        }
    }
}

pub fn init_logging(config: &AppConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
