//! `kiln add`: expand one feature module into an existing project and merge
//! its dependencies into `package.json`.

use std::sync::Arc;

use tracing::{info, instrument};

use kiln_adapters::LocalFilesystem;
use kiln_core::{
    application::{FeatureService, WritePolicy},
    domain::Dialect,
};

use crate::{
    cli::AddArgs,
    commands::{build_options, enable_named, generate::print_artifacts},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(feature = %args.feature, root = %args.target.dir.display()))]
pub fn execute(args: AddArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let AddArgs {
        feature,
        mut features,
        target,
    } = args;
    enable_named(&mut features, feature);

    // The dialect here is a placeholder; the service re-resolves it from the
    // project's marker file.
    let options = build_options(&features, Dialect::Typed, &config)?;

    let service = FeatureService::new(Arc::new(LocalFilesystem::new()));
    let applied = service.apply_feature(
        feature,
        &target.dir,
        &options,
        WritePolicy::from_force(target.force),
    )?;
    info!(files = applied.artifacts.len(), "Feature applied");

    if output.is_json() {
        output.json(&applied)?;
        return Ok(());
    }

    print_artifacts(&applied.artifacts, &output)?;
    let added: Vec<_> = applied
        .patch
        .dependencies
        .keys()
        .chain(applied.patch.dev_dependencies.keys())
        .map(String::as_str)
        .collect();
    if !added.is_empty() {
        output.info(&format!("package.json: {}", added.join(", ")))?;
    }
    output.success(&format!("Added {feature}"))?;

    if !added.is_empty() && !output.is_quiet() {
        output.print("")?;
        output.print("Run `npm install` to fetch the new dependencies.")?;
    }

    Ok(())
}
