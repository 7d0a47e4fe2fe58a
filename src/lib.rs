// Emits a diagnostic line when the given Verbosity asks for it.
macro_rules! verbose {
    ($verbosity:expr, $($arg:tt)+) => {
        if $verbosity.is_verbose() {
            tracing::info!($($arg)+);
        }
    };
}

pub mod classifier;
pub mod config;
pub mod domain_name;
pub mod error;
pub mod message;
pub mod query;
pub mod report;
pub mod resolver;
pub mod resource_record;
pub mod roots;
pub mod rr_types;
pub mod transport;
pub mod utils;
pub mod walker;

pub use config::{ResolverConfig, Verbosity};
pub use resolver::{Outcome, Resolution, Resolver};
pub use transport::{Transport, UdpTransport};
