//! Driver for the flx semantic-analysis core.
//!
//! A [`Session`] owns the [`Program`](flx_types::Program) and diagnostics of
//! one run. Upstream fills it with modules and declarations; the session
//! then runs, per module:
//!
//! 1. tree validation of every function body
//! 2. lowering (counting loops, compound assignments, Basic subscripts)
//!    followed by the coercion walker
//! 3. function analysis (call shapes, returns, leaf/recursive/static)
//! 4. type inference until nothing changes
//!
//! Internal errors abort the module they occur in. User errors are counted
//! by the sink and surface at the end through [`Session::finish`].

mod config;
mod session;

use std::sync::Once;

pub use config::SessionConfig;
pub use session::{ModuleReport, Session};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for debug output.
///
/// Does nothing unless `RUST_LOG` is set (`RUST_LOG=flx_types=debug`,
/// `RUST_LOG=flx_lower=trace`, ...). Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
