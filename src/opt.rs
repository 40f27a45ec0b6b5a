use clap::{ArgAction, Parser};

/// Serve a single file (or redirect to a single URL) for one request, then exit
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Port to listen on
    #[arg(short = 'p', long = "port", default_value_t = crate::config::DEFAULT_PORT)]
    pub port: u16,

    /// Once the first response is done, fail if remaining connections take longer than this many seconds to close
    #[arg(long = "shutdown-timeout", value_name = "SECS")]
    pub shutdown_timeout: Option<u64>,

    #[arg(
        value_name = "FILE_OR_URL",
        help = "File to serve, or URL to redirect to (--help for more)",
        long_help = r"File to serve, or URL to redirect to:
    - arguments starting with `http` are redirect targets
    - anything else is a path to a regular file
Examples:
    - ./report.pdf
    - https://example.com/meeting"
    )]
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }

    #[test]
    fn port_defaults_to_8888() {
        let opts = Options::try_parse_from(["oneshot", "file.txt"]).unwrap();
        assert_eq!(opts.port, 8888);
        assert_eq!(opts.target.as_deref(), Some("file.txt"));
        assert_eq!(opts.shutdown_timeout, None);
    }

    #[test]
    fn target_is_optional_at_parse_time() {
        let opts = Options::try_parse_from(["oneshot", "-p", "9000"]).unwrap();
        assert_eq!(opts.port, 9000);
        assert_eq!(opts.target, None);
    }
}
