/// Log subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Targets that flood the log at info level while the window is open
const QUIET_TARGETS: [&str; 5] = ["wgpu", "naga", "iced", "winit", "cosmic_text"];

/// Build the filter directive for a base level
fn directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));
    directives.join(",")
}

/// Install the global subscriber
///
/// `level` comes from settings (`LOG_LEVEL`); an unparsable value falls back to info.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(directives(level))
        .unwrap_or_else(|_| EnvFilter::new(directives("info")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}
