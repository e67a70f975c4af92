use std::path::PathBuf;

use clap::Parser;

/// Petrophysical data viewer: CSV, LAS, PNG and PDF files.
#[derive(Debug, Parser)]
#[command(name = "petro-viewer", version, about)]
pub struct Args {
    /// File to open at start-up
    pub file: Option<PathBuf>,

    /// Config file (defaults to <config dir>/petro-viewer/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_and_config() {
        let args = Args::parse_from(["petro-viewer", "well.las", "--config", "cfg.toml"]);
        assert_eq!(args.file, Some(PathBuf::from("well.las")));
        assert_eq!(args.config, Some(PathBuf::from("cfg.toml")));
    }

    #[test]
    fn everything_optional() {
        let args = Args::parse_from(["petro-viewer"]);
        assert!(args.file.is_none() && args.config.is_none());
    }
}
