use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use threadtune::{
    build_script, init_logging, selection_geometry, BuildReport, KernelOp, LogFormat,
    RecordStore, ThreadGeometry, ThreadRecord, ThreadSelection, BUILD_DATE, VERSION,
};
use threadtune_settings::Substitution;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute screw-thread geometry from a parameter record")]
struct Args {
    /// Parameter record file (defaults to the config directory record)
    record: Option<PathBuf>,
    /// Override the record's selection (1 external, 2 internal, 3 bolt, 4 nut, 5 bolt and nut)
    #[arg(long)]
    selection: Option<u8>,
    /// Also emit the kernel operation script
    #[arg(long)]
    script: bool,
    /// Write the (normalized) record back after a successful run
    #[arg(long)]
    save: bool,
    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    version: &'a str,
    record: &'a ThreadRecord,
    substitutions: &'a [Substitution],
    passes: Vec<ThreadGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<BuildOutput>,
}

#[derive(Serialize)]
struct BuildOutput {
    report: BuildReport,
    operations: Vec<KernelOp>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    })?;
    tracing::debug!("threadtune {} built {}", VERSION, BUILD_DATE);

    let store = match args.record {
        Some(path) => RecordStore::new(path),
        None => RecordStore::open_default()?,
    };
    let parsed = store
        .load()
        .with_context(|| format!("reading parameter record {}", store.path().display()))?;
    let mut record = parsed.record;
    if let Some(code) = args.selection {
        record.selection = ThreadSelection::from_code(code)
            .with_context(|| format!("selection must be 1..5, got {}", code))?;
    }

    let passes = selection_geometry(&record)?;
    for warning in passes.iter().flat_map(|g| &g.warnings) {
        tracing::warn!("{}", warning);
    }

    let build = if args.script {
        let (report, operations) = build_script(&record)?;
        tracing::info!(
            bodies = report.bodies.len(),
            operations = operations.len(),
            "Recorded kernel script"
        );
        Some(BuildOutput { report, operations })
    } else {
        None
    };

    let output = Output {
        version: VERSION,
        record: &record,
        substitutions: &parsed.substitutions,
        passes,
        build,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if args.save {
        store.save(&record)?;
        tracing::info!("Saved parameter record to {}", store.path().display());
    }

    Ok(())
}
