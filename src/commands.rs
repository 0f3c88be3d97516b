//! What each command-line flag does, in the order the flags run.

use anyhow::{Context, Result};

use crate::cleaner::{Cleaner, CleanupResult, FsRemover};
use crate::cli::Cli;
use crate::config::Config;
use crate::geocode::{self, Geocoder};
use crate::recycle_bin::SystemRecycleBin;
use crate::speedtest::SpeedTest;
use crate::targets::TargetGroup;
use crate::{output, utils};

/// Clean, then look up the postal code, then test the network.
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(selector) = cli.trgt.as_deref() {
        clean(&config, selector)?;
    }

    if let Some(code) = cli.zip.as_deref() {
        let country = cli.country.as_deref().unwrap_or(&config.geocode.country);
        locate(&config, code, country)?;
    }

    if cli.ping {
        check_speed(&config)?;
    }

    Ok(())
}

/// Clean the group named by `selector`. An unknown selector prints the
/// valid values and returns `Ok(None)` without touching anything.
pub fn clean(config: &Config, selector: &str) -> Result<Option<CleanupResult>> {
    let Ok(group) = selector.parse::<TargetGroup>() else {
        output::print_unrecognized_target(selector);
        return Ok(None);
    };

    let targets = config
        .target_set()
        .context("Invalid target directory configuration")?;
    let base = config.display_base();
    let shorten = |dir: &std::path::Path| utils::display_path(dir, base.as_deref());

    output::print_clean_header(group);
    let cleaner = Cleaner::new(&targets, &FsRemover, &SystemRecycleBin);
    let result = cleaner
        .clean_with(group, |event| output::print_event(event, shorten))
        .with_context(|| format!("Cleaning {group} directories failed"))?;

    output::print_cleanup_summary(&result);
    Ok(Some(result))
}

/// Print the location of `code` and return its `(latitude, longitude)`.
pub fn locate(config: &Config, code: &str, country: &str) -> Result<Option<(f64, f64)>> {
    output::print_geocode_start();
    let country = geocode::validate_country(country)?;
    let index = Geocoder::new(&config.geocode)?
        .load(&country)
        .with_context(|| format!("Failed to load postal code data for {country}"))?;

    match index.query_postal_code(code) {
        Some(location) => {
            output::print_location(location);
            Ok(Some(location.coordinates()))
        }
        None => {
            output::print_location_not_found(code, &country);
            Ok(None)
        }
    }
}

pub fn check_speed(config: &Config) -> Result<()> {
    output::print_network_start();
    let result = SpeedTest::new(config.speedtest.clone())?
        .run()
        .context("Network speed test failed")?;
    output::print_speed_result(&result);
    Ok(())
}
