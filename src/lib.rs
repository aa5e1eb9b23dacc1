//! # GarageLayout
//!
//! Floor plan engine for parking garages:
//! - Grid and smart snapping for spots and lanes
//! - Auto-layout of double-loaded aisles from spot counts
//! - DevicesConfig / CameraHub / FLI XML configuration codec
//! - Paginated dark-theme PDF layout plans
//!
//! ## Architecture
//!
//! 1. **garagelayout-core** - Site model, layout elements, devices, errors
//! 2. **garagelayout-designer** - Snapping, auto-layout and the editor
//! 3. **garagelayout-devices** - XML import and export
//! 4. **garagelayout-settings** - Configuration and snapshot storage
//! 5. **garagelayout-pdf** - Vector page rendering
//! 6. **garagelayout** - Command line binary tying the crates together

pub mod cli;

pub use garagelayout_core as model;
pub use garagelayout_designer as designer;
pub use garagelayout_devices as devices;
pub use garagelayout_pdf as pdf;
pub use garagelayout_settings as settings;

pub use garagelayout_core::{
    Device, DeviceType, ElementKind, ElementType, Error, Garage, LayoutElement, LayoutError,
    Level, Result, Site,
};
pub use garagelayout_designer::{Editor, Notice};
pub use garagelayout_settings::{Config, SiteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so command output on stdout stays clean. The level
/// defaults to INFO and follows `RUST_LOG`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
