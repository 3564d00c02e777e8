//! Subcommand execution.
//!
//! Each subcommand loads the target file into a [`TomlFile`], performs one
//! operation and, for mutating commands, saves the result.

use crate::cli::{Cli, Command, VersionPart};
use crate::config::Config;
use crate::error::{CliError, Result, exit_code};
use semver::{BuildMetadata, Prerelease, Version};
use std::io::Write;
use std::path::{Path, PathBuf};
use update_toml_core::{Storage, TomlFile, TomlValue};

/// Result of a command that ran without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `exists` did not find the path.
    PathMissing,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => exit_code::SUCCESS,
            Self::PathMissing => exit_code::FAILURE,
        }
    }
}

/// Run the parsed command line against the filesystem.
pub fn run(cli: &Cli, config: &Config, out: &mut impl Write) -> Result<Outcome> {
    let target = target_file(cli, config);
    execute(&cli.command, &target, config, config.storage(), out)
}

/// Run `command` against `target`, reading and writing through `storage`.
pub fn execute<S: Storage>(
    command: &Command,
    target: &Path,
    config: &Config,
    storage: S,
    out: &mut impl Write,
) -> Result<Outcome> {
    let mut file = TomlFile::with_storage(storage);
    file.load(target)?;

    match command {
        Command::Get { path, json } => {
            let value = file.get_value(path)?;
            writeln!(out, "{}", render(&value, *json, config.json.pretty)?)?;
        }
        Command::Update {
            path,
            value,
            raw,
            output,
        } => {
            let new_value = if *raw {
                parse_literal(value)?
            } else {
                TomlValue::from(value.as_str())
            };
            file.update(path, new_value)?;
            save(&file, output.as_deref())?;
            tracing::info!("Set {} in {:?}", path, output.as_deref().unwrap_or(target));
        }
        Command::Exists { path } => {
            if !file.path_exists(path)? {
                return Ok(Outcome::PathMissing);
            }
        }
        Command::Json { compact } => {
            let json = if *compact || !config.json.pretty {
                file.to_json()?
            } else {
                file.to_json_pretty()?
            };
            writeln!(out, "{}", json)?;
        }
        Command::Bump { part, path, output } => {
            let current = file.get_value(path)?;
            let next = bump(path, &current, *part)?;
            file.update(path, next.to_string())?;
            save(&file, output.as_deref())?;
            tracing::info!("Bumped {} to {}", path, next);
            writeln!(out, "{}", next)?;
        }
    }

    Ok(Outcome::Success)
}

fn save<S: Storage>(file: &TomlFile<S>, output: Option<&Path>) -> Result<()> {
    match output {
        Some(output) => file.save_as(output)?,
        None => file.save()?,
    }
    Ok(())
}

/// Strings print bare unless `json` is set; everything else prints as JSON.
fn render(value: &TomlValue, json: bool, pretty: bool) -> Result<String> {
    if let (false, Some(s)) = (json, value.as_str()) {
        return Ok(s.to_string());
    }
    let rendered = if pretty {
        value.to_json_pretty()?
    } else {
        value.to_json()?
    };
    Ok(rendered)
}

/// Parse a TOML value literal such as `42`, `true` or `["a", "b"]`.
pub fn parse_literal(literal: &str) -> Result<TomlValue> {
    literal
        .trim()
        .parse::<toml_edit::Value>()
        .map(|value| TomlValue::from(&value))
        .map_err(|source| CliError::InvalidValue {
            value: literal.to_string(),
            source,
        })
}

/// Increment `part` of the semantic version held in `current`.
///
/// Lower parts reset to zero; pre-release and build metadata are dropped.
pub fn bump(path: &str, current: &TomlValue, part: VersionPart) -> Result<Version> {
    let Some(text) = current.as_str() else {
        return Err(CliError::invalid_version(
            path,
            format!("expected a string, found {}", current.type_name()),
        ));
    };

    let mut version =
        Version::parse(text).map_err(|e| CliError::invalid_version(path, e.to_string()))?;

    let overflow = |name: &str| CliError::invalid_version(path, format!("{name} overflows"));
    match part {
        VersionPart::Major => {
            version.major = version.major.checked_add(1).ok_or_else(|| overflow("major"))?;
            version.minor = 0;
            version.patch = 0;
        }
        VersionPart::Minor => {
            version.minor = version.minor.checked_add(1).ok_or_else(|| overflow("minor"))?;
            version.patch = 0;
        }
        VersionPart::Patch => {
            version.patch = version.patch.checked_add(1).ok_or_else(|| overflow("patch"))?;
        }
    }
    version.pre = Prerelease::EMPTY;
    version.build = BuildMetadata::EMPTY;

    Ok(version)
}

/// Resolve the file a command line targets.
pub fn target_file(cli: &Cli, config: &Config) -> PathBuf {
    cli.file.clone().unwrap_or_else(|| config.file.clone())
}
