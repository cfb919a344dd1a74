//! Command-line interface for building and querying geoatlas databases.
#![forbid(unsafe_code)]

mod error;
mod query;

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use geoatlas_core::{POPULATION_FILTER_EXEMPT, PlaceFilter, is_catalogued};
use geoatlas_data::dump::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, DumpSource, HttpDumpSource};
use geoatlas_data::pipeline::{AtlasConfig, BuildReport, build_atlas};
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

pub use error::CliError;
use query::{CountriesArgs, SearchArgs, run_countries, run_search};

const ARG_WORKDIR: &str = "workdir";
const ARG_ENDPOINT: &str = "endpoint";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_COUNTRY: &str = "country";
const ARG_MIN_POPULATION: &str = "min-population";
const ENV_WORKDIR: &str = "GEOATLAS_CMDS_BUILD_WORKDIR";

/// Run the geoatlas CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Build(args) => run_build(args, &mut stdout),
        Command::Countries(args) => run_countries(&args, &mut stdout),
        Command::Search(args) => run_search(&args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "geoatlas",
    about = "Build and query an offline atlas of countries, timezones and places",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download the dumps and build `out/atlas.db` in the working directory.
    Build(BuildArgs),
    /// List the countries stored in an atlas.
    Countries(CountriesArgs),
    /// Search an atlas for places by name within a country.
    Search(SearchArgs),
}

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "build",
    long_about = "Fetch the timezone, country and per-country place dumps \
                 into <workdir>/in and load them into <workdir>/out/atlas.db. \
                 Files already present in <workdir>/in are reused. The build \
                 refuses to run when the atlas already exists.",
    about = "Build the atlas database"
)]
#[ortho_config(prefix = "GEOATLAS")]
struct BuildArgs {
    /// Working directory holding `in/` and `out/`.
    #[arg(long = ARG_WORKDIR, value_name = "dir")]
    #[serde(default)]
    workdir: Option<Utf8PathBuf>,
    /// Base URL of the dump server.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    endpoint: Option<String>,
    /// User agent sent with every download.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    user_agent: Option<String>,
    /// Restrict the build to these country codes (repeatable).
    #[arg(long = ARG_COUNTRY, value_name = "code")]
    #[serde(default)]
    country: Vec<String>,
    /// Minimum population of a place outside the exempt countries.
    #[arg(long = ARG_MIN_POPULATION, value_name = "count")]
    #[serde(default)]
    min_population: Option<i64>,
}

impl BuildArgs {
    fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildConfig::try_from(merged)
    }
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq)]
struct BuildConfig {
    atlas: AtlasConfig,
    endpoint: String,
    user_agent: String,
}

impl TryFrom<BuildArgs> for BuildConfig {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        let workdir = args.workdir.ok_or(CliError::MissingArgument {
            field: ARG_WORKDIR,
            env: ENV_WORKDIR,
        })?;
        let mut atlas = AtlasConfig::new(workdir);
        if !args.country.is_empty() {
            let codes: Vec<String> = args
                .country
                .iter()
                .map(|code| code.trim().to_ascii_uppercase())
                .collect();
            for code in codes.iter().filter(|code| !is_catalogued(code)) {
                warn!("{code} is not a catalogued country; its archive may not be published");
            }
            atlas = atlas.with_country_codes(codes);
        }
        if let Some(min_population) = args.min_population {
            atlas = atlas.with_place_filter(PlaceFilter::new(
                min_population,
                POPULATION_FILTER_EXEMPT,
            ));
        }
        Ok(Self {
            atlas,
            endpoint: args.endpoint.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            user_agent: args
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        })
    }
}

fn run_build(args: BuildArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let source = HttpDumpSource::new(config.endpoint.as_str())
        .map_err(CliError::Transport)?
        .with_user_agent(config.user_agent.as_str());
    run_build_with(&config, &source, writer)
}

fn run_build_with(
    config: &BuildConfig,
    source: &dyn DumpSource,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    info!(
        "building atlas in {} from {}",
        config.atlas.workdir(),
        source.base_url()
    );
    let report = build_atlas(&config.atlas, source)?;
    write_summary(writer, &report)
}

fn write_summary(writer: &mut dyn Write, report: &BuildReport) -> Result<(), CliError> {
    writeln!(
        writer,
        "built {}: {} timezones, {} countries, {} places",
        report.output_path,
        report.timezones,
        report.countries,
        report.total_places()
    )
    .map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
