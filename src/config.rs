use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::feed::{FeedError, FeedMonitor, FeedProbe};

/// Live monitoring dashboard with a feed status header.
#[derive(Debug, Parser)]
#[command(name = "livewatch", version, about)]
pub struct Cli {
    /// Feed endpoint to probe. Without it the flag is driven by hand with `c`.
    #[arg(long, value_name = "HOST:PORT")]
    pub feed: Option<String>,

    /// Milliseconds between probes.
    #[arg(long, value_name = "MS", default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_interval: u64,

    /// Milliseconds to wait for the feed to accept a connection.
    #[arg(long, value_name = "MS", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout: u64,

    /// Breadcrumb segment, outermost first. Repeat for each level.
    #[arg(long = "crumb", value_name = "LABEL")]
    pub crumbs: Vec<String>,

    /// Start a manual feed as connected.
    #[arg(long)]
    pub connected: bool,

    /// Write logs to this file. The terminal belongs to the UI, so nothing
    /// is logged without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Cli {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout)
    }

    /// Build the feed source. Probed feeds need a running tokio runtime.
    pub fn feed_monitor(&self) -> Result<FeedMonitor, FeedError> {
        match &self.feed {
            Some(address) => {
                let probe = FeedProbe::new(address.as_str(), self.probe_timeout())?;
                Ok(FeedMonitor::spawn(probe, self.probe_interval()))
            }
            None => Ok(FeedMonitor::manual(self.connected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["livewatch"]).unwrap();
        assert!(cli.feed.is_none());
        assert!(!cli.connected);
        assert_eq!(cli.probe_interval(), Duration::from_secs(2));
        assert_eq!(cli.probe_timeout(), Duration::from_secs(1));
        assert_eq!(cli.log_level, tracing::Level::INFO);
    }

    #[test]
    fn crumbs_keep_their_order() {
        let cli = Cli::try_parse_from([
            "livewatch",
            "--crumb",
            "Plant 2",
            "--crumb",
            "Line 4",
        ])
        .unwrap();
        assert_eq!(cli.crumbs, ["Plant 2", "Line 4"]);
        assert!(Cli::try_parse_from(["livewatch"]).unwrap().crumbs.is_empty());
    }

    #[test]
    fn manual_feed_without_address() {
        let cli = Cli::try_parse_from(["livewatch", "--connected"]).unwrap();
        let feed = cli.feed_monitor().unwrap();
        assert!(feed.is_manual());
        assert!(feed.latest().is_live());
    }

    #[test]
    fn bad_feed_address() {
        let cli = Cli::try_parse_from(["livewatch", "--feed", "nowhere"]).unwrap();
        assert!(matches!(
            cli.feed_monitor(),
            Err(FeedError::InvalidAddress(_))
        ));
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(Cli::try_parse_from(["livewatch", "--probe-interval", "0"]).is_err());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "livewatch",
            "--feed",
            "api:8000",
            "--probe-interval",
            "500",
            "--probe-timeout",
            "250",
            "--log-file",
            "/tmp/livewatch.log",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.feed.as_deref(), Some("api:8000"));
        assert_eq!(cli.probe_interval(), Duration::from_millis(500));
        assert_eq!(cli.probe_timeout(), Duration::from_millis(250));
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }
}
