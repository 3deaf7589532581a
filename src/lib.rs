pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::config::ReaderConfig;
pub use crate::core::error::{ModError, ModResult};
pub use crate::core::mods::{read_metadata, DescriptorKind, MetadataStatus, Mod, ModType};

/// Install a structured `fmt` subscriber for embedding launchers.
/// Honors `RUST_LOG`; safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mod_descriptor=debug")),
        )
        .try_init();
}
