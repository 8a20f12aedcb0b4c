use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr subscriber for the `mru` binary.
///
/// The filter comes from `MRU_LOG` (e.g. `MRU_LOG=debug`, `MRU_LOG=mru=trace`)
/// and defaults to `warn`. Library code only emits events; it never calls this.
pub fn init_logger() {
    let filter = EnvFilter::try_from_env("MRU_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
