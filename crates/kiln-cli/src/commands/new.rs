//! Implementation of the `kiln new` command.
//!
//! Responsibility: translate CLI arguments into an `OptionRecord`, pick the
//! base template adapter, call the core scaffold service, and display
//! results. No generation logic lives here.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use kiln_adapters::{BuiltinTemplate, GitTemplate, LocalFilesystem};
use kiln_core::{
    application::{
        ApplicationError, BaseTemplateSource, ScaffoldPlan, ScaffoldReport, ScaffoldService,
    },
    domain::{Dialect, OptionRecord, features},
};

use crate::{
    cli::{GlobalArgs, NewArgs, OutputFormat},
    commands::build_options,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON document printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct NewReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a ScaffoldReport,
}

/// Execute the `kiln new` command.
///
/// Dispatch sequence:
/// 1. Resolve the project name and directory
/// 2. Convert flags (plus config defaults) into an `OptionRecord`
/// 3. Early-exit with the plan if `--dry-run`
/// 4. Confirm with the user on an interactive terminal unless `--yes`
/// 5. Run the scaffold pass
/// 6. Print the report and next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (project_name, project_path) = resolve_project_path(&args.name)?;

    let dialect = args.lang.map(Dialect::from).unwrap_or(config.defaults.dialect);
    let options = build_options(&args.features, dialect, &config)?;
    let base = base_template(args.template_url.as_deref(), &config);

    debug!(
        dialect = %options.dialect(),
        persistence = %options.persistence(),
        base = %base.name(),
        "Options resolved"
    );

    if project_path.exists() {
        return Err(CliError::Core(
            ApplicationError::ProjectExists { path: project_path }.into(),
        ));
    }

    let service = ScaffoldService::new(Arc::new(LocalFilesystem::new()), base);

    if args.dry_run {
        let plan = service.plan(&project_name, &options)?;
        return show_plan(&plan, &project_path, &output);
    }

    let interactive = output.format() == OutputFormat::Human && std::io::stdin().is_terminal();
    if interactive && !global.quiet && !args.yes {
        show_configuration(&options, &project_name, &project_path, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    info!(project = %project_name, path = %project_path.display(), "Scaffold started");
    let spinner = output.spinner(&format!("Creating '{project_name}'..."));
    let result = service.scaffold(&project_name, &project_path, &options);
    spinner.finish_and_clear();
    let report = result?;

    info!(
        project = %project_name,
        pass_id = %report.pass_id,
        files = report.artifacts.len(),
        "Scaffold completed"
    );

    if output.is_json() {
        output.json(&NewReport {
            generated_at: Utc::now(),
            report: &report,
        })?;
        return Ok(());
    }

    show_report(&report, &output)?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_path.display()))?;
        output.print("  npm install")?;
        output.print("  npm run dev")?;
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split `NAME` into the project name (last segment) and the directory to
/// create.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

// ── Adapter selection ─────────────────────────────────────────────────────────

/// `--template-url` wins over `templates.repository_url`; without either the
/// built-in skeleton is used.
fn base_template(flag: Option<&str>, config: &AppConfig) -> Arc<dyn BaseTemplateSource> {
    match flag.or(config.templates.repository_url.as_deref()) {
        Some(url) => Arc::new(GitTemplate::new(url)),
        None => Arc::new(BuiltinTemplate::new()),
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    options: &OptionRecord,
    name: &str,
    path: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:      {name}"))?;
    out.print(&format!("  Language:     {}", options.dialect().language_name()))?;
    out.print(&format!("  Database:     {}", options.persistence()))?;
    if let Some(data_access) = options.data_access() {
        out.print(&format!("  Data access:  {data_access}"))?;
    }
    let enabled: Vec<_> = features::enabled(options)
        .map(|def| def.kind.to_string())
        .collect();
    if !enabled.is_empty() {
        out.print(&format!("  Features:     {}", enabled.join(", ")))?;
    }
    out.print(&format!("  Location:     {}", path.display()))?;
    out.print("")?;
    Ok(())
}

fn show_plan(plan: &ScaffoldPlan, path: &Path, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        out.json(plan)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' at {}",
        plan.project_name,
        path.display()
    ))?;
    out.print(&format!("  Language: {}", plan.dialect.language_name()))?;
    for artifact in &plan.artifacts {
        out.print(&format!("  {:<15} {}", artifact.kind.to_string(), artifact.path))?;
    }
    for (name, version) in &plan.patch.dependencies {
        out.print(&format!("  dependency      {name}@{version}"))?;
    }
    for (name, version) in &plan.patch.dev_dependencies {
        out.print(&format!("  devDependency   {name}@{version}"))?;
    }
    Ok(())
}

fn show_report(report: &ScaffoldReport, out: &OutputManager) -> CliResult<()> {
    for artifact in &report.artifacts {
        out.print(&format!("  + {}", artifact.path))?;
    }
    let data_access = report
        .data_access
        .map(|d| format!(", {d}"))
        .unwrap_or_default();
    out.success(&format!(
        "Project '{}' created ({} files, {}{})",
        report.project_name,
        report.artifacts.len(),
        report.dialect.language_name(),
        data_access,
    ))?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation input".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
