use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pentest-runner", version, about = "API penetration testing suite for the invoice and purchase-order API")]
pub struct Cli {
    /// Target API base URL [default: http://localhost:3000]
    #[arg(short, long)]
    pub url: Option<String>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Partner client id sent in the `client_id` header (env: PENTEST_CLIENT_ID)
    #[arg(long)]
    pub client_id: Option<String>,

    /// Partner client secret sent in the `client_secret` header (env: PENTEST_CLIENT_SECRET)
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Write the aggregate report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run the suites concurrently instead of one after another
    #[arg(long)]
    pub parallel: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Failed logins sent before a 429 is expected
    #[arg(long)]
    pub rate_limit_attempts: Option<u32>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pentest-runner"]).unwrap();
        assert!(cli.url.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.parallel);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "pentest-runner", "-u", "http://api.local:8080", "-vv", "-o", "out/report.json", "-q",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://api.local:8080"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out/report.json")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["pentest-runner", "--timeout", "soon"]).is_err());
    }
}
