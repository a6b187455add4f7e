//! Tracing setup. In the browser events go to the devtools console; on
//! native builds (tests, tooling) they go to stderr.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info,molkky_server=debug";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    INIT.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_writer(tracing_web::MakeWebConsoleWriter::new())
                .with_filter(EnvFilter::new(DEFAULT_FILTER));
            let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
            let _ = tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init();
        }
    });
}
