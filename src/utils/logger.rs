use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: this crate at `level`, dependencies at `warn`.
fn default_directive(level: &str) -> String {
    format!("campus_rent={},warn", level.to_ascii_lowercase())
}

/// `--verbose` always means debug; otherwise the configured level applies.
fn effective_level(level: &str, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        level
    }
}

fn install(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
    let layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };
    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
}

/// Picks the output format and level from the `[logging]` section.
pub fn init_from_config(level: &str, json: bool, verbose: bool) {
    install(effective_level(level, verbose), json);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_configured_level() {
        assert_eq!(effective_level("warn", true), "debug");
        assert_eq!(effective_level("warn", false), "warn");
    }

    #[test]
    fn test_default_directive_scopes_crate() {
        assert_eq!(default_directive("INFO"), "campus_rent=info,warn");
        assert!(EnvFilter::try_new(default_directive("debug")).is_ok());
    }
}
