//! Implementation of the `kiln list` command.

use serde::Serialize;

use kiln_core::application::{CatalogService, FeatureInfo, SchematicInfo};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Catalog {
    features: Vec<FeatureInfo>,
    schematics: Vec<SchematicInfo>,
}

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let catalog = Catalog {
        features: CatalogService::features(),
        schematics: CatalogService::schematics(),
    };

    // `--output-format json` implies the JSON listing.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Feature modules:")?;
            for f in &catalog.features {
                output.print(&format!("  {:<14} {:<22} {}", f.name, f.enabled_by, f.summary))?;
            }
            output.print("")?;
            output.header("Schematics:")?;
            for s in &catalog.schematics {
                let note = if s.typed_only { "  (typed only)" } else { "" };
                output.print(&format!("  {:<11} {}{note}", s.name, s.output))?;
            }
        }

        // JSON goes to stdout even in quiet mode so pipes always get data.
        ListFormat::Json => output.json(&catalog)?,

        ListFormat::List => {
            for name in catalog
                .features
                .iter()
                .map(|f| &f.name)
                .chain(catalog.schematics.iter().map(|s| &s.name))
            {
                println!("{name}");
            }
        }

        ListFormat::Csv => {
            println!("type,name,detail");
            for f in &catalog.features {
                println!("feature,{},{}", f.name, csv_field(&f.summary));
            }
            for s in &catalog.schematics {
                println!("schematic,{},{}", s.name, csv_field(&s.output));
            }
        }
    }

    Ok(())
}

/// Quote a field when it contains a delimiter or a quote.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
