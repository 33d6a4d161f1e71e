//! Logging setup
//!
//! Tracing goes to stderr so it never interferes with command output
//! (which may be JSON consumed by scripts).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging based on output mode and debug flag
///
/// RUST_LOG overrides the computed default filter.
pub fn init(debug: bool, quiet: bool) {
    let default_filter = if debug {
        "folio_core=debug,folio_cli=debug"
    } else if quiet {
        "folio_core=error,folio_cli=error"
    } else {
        "folio_core=warn,folio_cli=warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_line_number(debug)
        .with_file(debug)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
