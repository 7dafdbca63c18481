// SPDX-License-Identifier: MIT OR Apache-2.0
//! `procmat` - builds the procedural materials into a material library.
//!
//! Each run rebuilds the requested materials from their parameter sets and
//! prints one confirmation line per material. With `--library` the materials
//! are built into an existing RON library file (created if missing).

mod settings;

use procmat_graph::{build_material, MaterialHandle, MaterialLibrary, MaterialRegistry};
use settings::{parse_cli, CliError, ToolSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    // Logs go to stderr so stdout only carries the confirmations
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("procmat=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    match run(&argv) {
        Ok(names) => {
            for name in names {
                println!("Material '{name}' ready.");
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

/// Build the requested materials, returning their names in build order
fn run(argv: &[String]) -> Result<Vec<String>, CliError> {
    let cli = parse_cli(argv)?;

    let settings = match &cli.settings {
        Some(path) => ToolSettings::load(path)?,
        None => ToolSettings::default(),
    };

    let mut library = match &cli.library {
        Some(path) if path.exists() => MaterialLibrary::load(path)?,
        _ => MaterialLibrary::new(),
    };

    let mut built: Vec<MaterialHandle> = Vec::new();
    if cli.target.includes_beak() {
        built.push(build_material(&mut library, &settings.beak)?);
    }
    if cli.target.includes_scales() {
        built.push(build_material(&mut library, &settings.scales)?);
    }

    if let Some(path) = &cli.library {
        library.save(path)?;
        tracing::info!("Wrote {} materials to {:?}", library.len(), path);
    }

    Ok(built
        .into_iter()
        .filter_map(|handle| library.material(handle))
        .map(|material| material.name.clone())
        .collect())
}
