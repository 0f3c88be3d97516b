use std::path::Path;

use colored::Colorize;

use crate::cleaner::{CleanEvent, CleanupResult, SkipReason};
use crate::geocode::PostalLocation;
use crate::recycle_bin::BinOutcome;
use crate::speedtest::SpeedTestResult;
use crate::targets::TargetGroup;

pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

pub fn print_clean_header(group: TargetGroup) {
    let what = match group {
        TargetGroup::All => "all directories",
        TargetGroup::System => "system directories",
        TargetGroup::User => "user directories",
    };
    println!("{}", format!("Cleaning {what}...").bold().cyan());
}

pub fn print_unrecognized_target(selector: &str) {
    println!(
        "{} {}",
        "Unrecognized command argument:".red().bold(),
        selector.red()
    );
    for group in TargetGroup::ALL {
        println!("    '{}' {}", group.selector().bold(), group.help());
    }
}

pub fn print_removed(file: &str, dir: &str) {
    println!("  {} {} from {}", "Removed".red(), file, dir.dimmed());
}

pub fn print_in_use(file: &str, dir: &str) {
    println!(
        "  {} {} from {}, {}",
        "Passed".yellow(),
        file,
        dir.dimmed(),
        "still in use".yellow()
    );
}

pub fn print_skipped_dir(file: &str, dir: &str) {
    println!(
        "  {} {} from {}, {}",
        "Passed".yellow(),
        file,
        dir.dimmed(),
        "directory".dimmed()
    );
}

pub fn print_recycle_bin(outcome: &BinOutcome) {
    match outcome {
        BinOutcome::Emptied(n) => {
            println!("  {} {n} items from recycle bin", "Removed".red())
        }
        BinOutcome::AlreadyEmpty => println!("  {}", "Recycle bin already empty".dimmed()),
        // Emptying the bin never fails the run; the reason is in the log.
        BinOutcome::Skipped(_) => {}
    }
}

pub fn print_clean_complete(count: usize, secs: f64, freed: &str) {
    println!(
        "{} {}",
        "COMPLETE:".green().bold(),
        format!("Cleared {count} files in {secs:.2} seconds ({freed} freed).").green()
    );
}

/// Print one cleaner event as it happens.
pub fn print_event(event: CleanEvent<'_>, shorten: impl Fn(&Path) -> String) {
    match event {
        CleanEvent::Removed(entry) => print_removed(&entry.file_name, &shorten(&entry.source_dir)),
        CleanEvent::Skipped(skipped) => {
            let dir = shorten(&skipped.entry.source_dir);
            match skipped.reason {
                SkipReason::InUse => print_in_use(&skipped.entry.file_name, &dir),
                SkipReason::Directory => print_skipped_dir(&skipped.entry.file_name, &dir),
            }
        }
    }
}

/// Recycle bin outcome and the COMPLETE line.
pub fn print_cleanup_summary(result: &CleanupResult) {
    if let Some(outcome) = &result.recycle_bin {
        print_recycle_bin(outcome);
    }
    print_clean_complete(
        result.removed_count(),
        result.elapsed.as_secs_f64(),
        &format_size(result.bytes_freed),
    );
}

pub fn print_network_start() {
    println!("{}", "Performing network operations...".cyan());
}

pub fn print_speed_result(result: &SpeedTestResult) {
    println!(
        "{} Ping: {}ms, Download: {}Mbps, Upload: {}Mbps.",
        "COMPLETE:".green().bold(),
        result.ping_ms,
        result.download_mbps(),
        result.upload_mbps()
    );
}

pub fn print_geocode_start() {
    println!("{}", "Retrieving location data...".cyan());
}

pub fn print_location(loc: &PostalLocation) {
    println!(
        "{} {}, {} - located at ({}, {}) in {}.",
        "IDENTIFIED:".green().bold(),
        loc.place_name,
        loc.state_code,
        loc.latitude,
        loc.longitude,
        loc.country_code
    );
}

pub fn print_location_not_found(code: &str, country: &str) {
    println!(
        "{} no location found for postal code {} in {}",
        "Warning:".red().bold(),
        code.red(),
        country
    );
}
