//! `kiln generate`: render one schematic (or a resource fan-out) into an
//! existing project.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use kiln_adapters::LocalFilesystem;
use kiln_core::{
    application::{SchematicService, WriteOutcome, WritePolicy, WrittenArtifact},
    domain::SchematicKind,
};

use crate::{cli::GenerateArgs, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct GenerateReport<'a> {
    kind: SchematicKind,
    name: &'a str,
    artifacts: &'a [WrittenArtifact],
}

#[instrument(skip_all, fields(kind = %args.kind, name = %args.name))]
pub fn execute(args: GenerateArgs, output: OutputManager) -> CliResult<()> {
    let service = SchematicService::new(Arc::new(LocalFilesystem::new()));
    let policy = WritePolicy::from_force(args.target.force);

    let artifacts = service.generate(args.kind, &args.name, &args.target.dir, policy)?;
    info!(files = artifacts.len(), "Schematic generated");

    if output.is_json() {
        output.json(&GenerateReport {
            kind: args.kind,
            name: &args.name,
            artifacts: &artifacts,
        })?;
        return Ok(());
    }

    print_artifacts(&artifacts, &output)?;
    output.success(&format!("Generated {} '{}'", args.kind, args.name))?;
    Ok(())
}

/// One line per artifact, marked by what happened to it.
pub fn print_artifacts(artifacts: &[WrittenArtifact], output: &OutputManager) -> CliResult<()> {
    for artifact in artifacts {
        output.print(&format!("  {} {}", outcome_marker(artifact.outcome), artifact.path))?;
    }
    Ok(())
}

fn outcome_marker(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Created => "+",
        WriteOutcome::Overwritten => "~",
        WriteOutcome::Unchanged => "=",
    }
}
