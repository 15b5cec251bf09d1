//! # ThreadTune
//!
//! Parametric screw-thread geometry for solid-modeling kernels.
//!
//! ## Architecture
//!
//! ThreadTune is organized as a workspace with multiple crates:
//!
//! 1. **threadtune-core** - Thread parameters, enumerations, units, validation
//! 2. **threadtune-geometry** - Profile, helix, offset, chamfer and hardware geometry,
//!    plus the kernel contract and the build sequencer
//! 3. **threadtune-settings** - The persisted parameter record
//! 4. **threadtune** - Command line front end and the script-recording kernel

pub mod script;

pub use script::{KernelOp, ScriptKernel};

pub use threadtune_core::{
    GuideMode, GuideRail, Handedness, LengthUnit, PolygonDims, SpecError, StartCount, ThreadPass,
    ThreadSelection, ThreadSpec,
};

pub use threadtune_geometry::{
    compute_thread_geometry, nut_thread_spec, BuildError, BuildReport, GeometryError,
    GeometryKernel, GeometryWarning, ThreadBuilder, ThreadGeometry,
};

pub use threadtune_settings::{ParsedRecord, RecordStore, SettingsError, ThreadRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Initialize logging
///
/// Logs go to stderr so stdout stays machine readable. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Geometry for every pass of a selection, in build order.
///
/// The internal pass of a nut is computed for the lengthened thread that
/// runs through the nut body.
pub fn selection_geometry(record: &ThreadRecord) -> Result<Vec<ThreadGeometry>, GeometryError> {
    record
        .selection
        .passes()
        .into_iter()
        .map(|pass| match pass {
            ThreadPass::Internal if record.selection.has_nut_body() => {
                compute_thread_geometry(&nut_thread_spec(&record.spec, &record.nut), pass)
            }
            _ => compute_thread_geometry(&record.spec, pass),
        })
        .collect()
}

/// Run the full build against a [`ScriptKernel`].
pub fn build_script(record: &ThreadRecord) -> Result<(BuildReport, Vec<KernelOp>), BuildError> {
    let mut builder = ThreadBuilder::new(ScriptKernel::new());
    let report = builder.build_selection(
        &record.spec,
        record.selection,
        &record.bolt_head,
        &record.nut,
    )?;
    Ok((report, builder.into_kernel().into_ops()))
}
