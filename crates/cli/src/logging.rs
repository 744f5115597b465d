use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Most verbose level enabled in config, as an `EnvFilter` directive.
fn level_directive(config: &LoggingConfig) -> &'static str {
    let levels = &config.levels;
    if levels.debug {
        "debug"
    } else if levels.info {
        "info"
    } else if levels.warning {
        "warn"
    } else if levels.error {
        "error"
    } else {
        "off"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the config levels.
///
/// Output goes to stderr so stdout stays clean for results.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(config)));

    let show_file = config.format.location.show_file;
    let show_line = config.format.location.show_line;

    // Layer::boxed() unifies the types of the two branches
    let fmt_layer = if !config.format.show_time {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .without_time()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
