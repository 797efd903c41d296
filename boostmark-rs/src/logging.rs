//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Pick the default filter from CLI flags and the configured level.
pub fn default_filter(verbose: u8, quiet: bool, configured: Option<&str>) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.unwrap_or("warn").to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the computed default.
pub fn init(verbose: u8, quiet: bool, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet, configured)));

    // a subscriber may already be installed (tests, embedding); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0, false, None), "warn");
        assert_eq!(default_filter(0, false, Some("debug")), "debug");
        assert_eq!(default_filter(1, false, Some("error")), "info");
        assert_eq!(default_filter(2, false, None), "debug");
        assert_eq!(default_filter(5, false, None), "trace");
        assert_eq!(default_filter(3, true, None), "error");
    }
}
