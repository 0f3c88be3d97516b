use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "chorekit",
    about = "Clean temp directories, test the network, look up postal codes",
    version
)]
pub struct Cli {
    /// Clean temp directories: 'a' all, 'w' system, 'r' user
    #[arg(short = 'c', long = "trgt", value_name = "TARGET")]
    pub trgt: Option<String>,

    /// Test the network connection speed
    #[arg(short, long)]
    pub ping: bool,

    /// Print the location of a postal code
    #[arg(short, long, value_name = "CODE")]
    pub zip: Option<String>,

    /// Country of the postal code (two letters, e.g. "us")
    #[arg(long, value_name = "CC", requires = "zip")]
    pub country: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["chorekit", "-c", "a", "-p", "-z", "90210"]).unwrap();
        assert_eq!(cli.trgt.as_deref(), Some("a"));
        assert!(cli.ping);
        assert_eq!(cli.zip.as_deref(), Some("90210"));
    }

    #[test]
    fn unknown_target_still_parses() {
        let cli = Cli::try_parse_from(["chorekit", "--trgt", "x"]).unwrap();
        assert_eq!(cli.trgt.as_deref(), Some("x"));
    }

    #[test]
    fn country_needs_zip() {
        assert!(Cli::try_parse_from(["chorekit", "--country", "de"]).is_err());
        let cli = Cli::try_parse_from(["chorekit", "-z", "10115", "--country", "de"]).unwrap();
        assert_eq!(cli.country.as_deref(), Some("de"));
    }
}
