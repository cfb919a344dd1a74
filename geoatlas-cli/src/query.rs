//! Read-only subcommands over a built atlas.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geoatlas_core::Country;
use geoatlas_data::atlas::{AtlasReader, PlaceMatch};
use serde::Serialize;

use crate::CliError;

/// CLI arguments for the `countries` subcommand.
#[derive(Debug, Clone, Parser)]
pub(crate) struct CountriesArgs {
    /// Path to the atlas database.
    #[arg(long, value_name = "path")]
    pub(crate) atlas: Utf8PathBuf,
    /// Print JSON instead of tab-separated lines.
    #[arg(long)]
    pub(crate) json: bool,
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser)]
pub(crate) struct SearchArgs {
    /// Text contained in the place name, ASCII name or alternate names.
    #[arg(value_name = "location")]
    pub(crate) location: String,
    /// Alpha-2 code, or the start of the country name.
    #[arg(long, value_name = "country")]
    pub(crate) country: String,
    /// Path to the atlas database.
    #[arg(long, value_name = "path")]
    pub(crate) atlas: Utf8PathBuf,
    /// Print JSON instead of tab-separated lines.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_countries(args: &CountriesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let reader = AtlasReader::open(&args.atlas)?;
    let countries = reader.countries()?;
    if args.json {
        return write_json(writer, &countries);
    }
    for country in &countries {
        write_line(writer, &country_line(country))?;
    }
    Ok(())
}

pub(crate) fn run_search(args: &SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let reader = AtlasReader::open(&args.atlas)?;
    let places = reader.search(&args.location, &args.country)?;
    if args.json {
        return write_json(writer, &places);
    }
    for place in &places {
        write_line(writer, &place_line(place))?;
    }
    Ok(())
}

fn country_line(country: &Country) -> String {
    format!("{}\t{}\t{}", country.iso_alpha2, country.name, country.capital)
}

fn place_line(place: &PlaceMatch) -> String {
    let elevation = place
        .elevation
        .map_or_else(String::new, |metres| metres.to_string());
    format!(
        "{}\t{}\t{:.5}\t{:.5}\t{}\t{}",
        place.name, place.country_code, place.latitude, place.longitude, elevation, place.timezone
    )
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    write_line(writer, &payload)
}

fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(writer, "{line}").map_err(CliError::WriteOutput)
}
