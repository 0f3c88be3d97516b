use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while cleaning temp directories.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("invalid target selector '{0}' (expected a, w or r)")]
    InvalidSelector(String),

    #[error("cannot read {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("target group '{0}' has no directories")]
    EmptyGroup(&'static str),

    #[error("{} is listed in both the system and user target groups", .0.display())]
    OverlappingTarget(PathBuf),
}

/// Failure reported by a recycle bin backend.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BinError(pub String);

impl From<trash::Error> for BinError {
    fn from(e: trash::Error) -> Self {
        BinError(e.to_string())
    }
}

/// Errors raised by the network speed test.
#[derive(Debug, Error)]
pub enum SpeedTestError {
    #[error("no speed test servers configured")]
    NoServers,

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("none of the {0} configured speed test servers answered")]
    Unreachable(usize),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised while loading postal code data.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid country code '{0}' (expected two letters)")]
    InvalidCountry(String),

    #[error("no cache directory available for postal code data")]
    NoCacheDir,

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("postal code archive for {country} is unreadable: {source}")]
    Archive {
        country: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed postal code record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
