//! Command-line interface.

use std::time::Duration;

use clap::Parser;
use kairos_engine::time::ClockPreference;

/// Feeds synthetic character events from a producer thread into a slow worker
/// thread through an event pool.
#[derive(Parser, Debug)]
#[command(name = "kairos-studio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Consumption passes per simulated frame
    #[arg(long, default_value_t = 10)]
    pub loops_per_frame: u32,

    /// Sleep after each consumption pass, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub loop_delay_ms: u64,

    /// Frames to render before shutting down
    #[arg(long, default_value_t = 5)]
    pub frames: u32,

    /// Character events the producer emits
    #[arg(long, default_value_t = 64)]
    pub events: u32,

    /// Bind the reduced-resolution platform clock instead of probing
    #[arg(long)]
    pub fallback_clock: bool,

    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,
}

/// Demo settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub loops_per_frame: u32,
    pub loop_delay: Duration,
    pub frames: u32,
    pub events: u32,
    pub clock: ClockPreference,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            loops_per_frame: 10,
            loop_delay: Duration::from_millis(100),
            frames: 5,
            events: 64,
            clock: ClockPreference::Auto,
        }
    }
}

impl From<&Cli> for StudioConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            loops_per_frame: cli.loops_per_frame.max(1),
            loop_delay: Duration::from_millis(cli.loop_delay_ms),
            frames: cli.frames,
            events: cli.events,
            clock: if cli.fallback_clock {
                ClockPreference::Fallback
            } else {
                ClockPreference::Auto
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let cli = Cli::parse_from(["kairos-studio"]);
        let config = StudioConfig::from(&cli);
        let expected = StudioConfig::default();

        assert_eq!(config.loops_per_frame, expected.loops_per_frame);
        assert_eq!(config.loop_delay, expected.loop_delay);
        assert_eq!(config.frames, expected.frames);
        assert_eq!(config.events, expected.events);
        assert_eq!(config.clock, expected.clock);
    }

    #[test]
    fn fallback_flag_selects_fallback_clock() {
        let cli = Cli::parse_from(["kairos-studio", "--fallback-clock", "--loops-per-frame", "0"]);
        let config = StudioConfig::from(&cli);

        assert_eq!(config.clock, ClockPreference::Fallback);
        assert_eq!(config.loops_per_frame, 1);
    }

    #[test]
    fn rejects_non_numeric_counts() {
        assert!(Cli::try_parse_from(["kairos-studio", "--frames", "many"]).is_err());
    }
}
