//! tracing setup. Logs go to stderr so stdout stays clean for output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "GYMXP_LOG";

/// Pick the filter: `--verbose`, then `GYMXP_LOG`, then the config level.
pub fn build_filter(config_level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init(config_level: &str, verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config_level, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(build_filter("error", true).to_string(), "debug");
    }
}
