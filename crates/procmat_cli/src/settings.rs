// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tool settings and command-line options.

use procmat_graph::{BeakParams, ScalesParams};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parameter sets for every material, loaded from a RON file.
///
/// Missing sections and fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Keratin beak parameters
    pub beak: BeakParams,
    /// Scales parameters
    pub scales: ScalesParams,
}

impl ToolSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| CliError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Which materials to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Keratin beak only
    Beak,
    /// Scales only
    Scales,
    /// Every material
    #[default]
    All,
}

impl Target {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "beak" => Some(Self::Beak),
            "scales" => Some(Self::Scales),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Whether the beak material is part of this target
    pub fn includes_beak(self) -> bool {
        matches!(self, Self::Beak | Self::All)
    }

    /// Whether the scales material is part of this target
    pub fn includes_scales(self) -> bool {
        matches!(self, Self::Scales | Self::All)
    }
}

/// Parsed command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cli {
    /// Materials to build
    pub target: Target,
    /// Optional settings file
    pub settings: Option<PathBuf>,
    /// Optional library file to build into
    pub library: Option<PathBuf>,
}

/// Usage text printed on argument errors
pub const USAGE: &str = "usage: procmat [beak|scales|all] [--settings FILE] [--library FILE]";

/// Parse arguments (without the program name)
pub fn parse_cli(argv: &[String]) -> Result<Cli, CliError> {
    let mut cli = Cli::default();
    let mut target_seen = false;
    let mut args = argv.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" | "--library" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                let path = Some(PathBuf::from(value));
                if arg == "--settings" {
                    cli.settings = path;
                } else {
                    cli.library = path;
                }
            }
            other if !target_seen && !other.starts_with("--") => {
                cli.target = Target::parse(other)
                    .ok_or_else(|| CliError::UnknownArgument(other.to_string()))?;
                target_seen = true;
            }
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
    }

    Ok(cli)
}

/// Error raised by the command-line front end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Unrecognized argument
    #[error("Unknown argument '{0}'\n{usage}", usage = USAGE)]
    UnknownArgument(String),

    /// Option given without its value
    #[error("Option {0} needs a value\n{usage}", usage = USAGE)]
    MissingValue(String),

    /// Settings file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Settings file is not valid RON
    #[error("Invalid settings in {path:?}: {source}")]
    Settings {
        /// File that was parsed
        path: PathBuf,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// Library load or save failed
    #[error(transparent)]
    Registry(#[from] procmat_graph::RegistryError),

    /// A material build failed
    #[error(transparent)]
    Build(#[from] procmat_graph::BuildError),
}
