use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

const DEFAULT_DEBUG_WIDTH: u16 = 80;
const DEFAULT_DEBUG_HEIGHT: u16 = 24;
const DEFAULT_DEBUG_FRAMES: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "kokaton-musou")]
#[command(about = "Terminal arcade shooter: dodge the bombs, shoot the aliens, spend score on powers")]
pub struct Cli {
    /// Run headless against an in-memory screen with scripted input
    #[arg(long)]
    pub debug: bool,

    /// Headless screen width in cells
    #[arg(long, default_value_t = DEFAULT_DEBUG_WIDTH)]
    pub width: u16,

    /// Headless screen height in cells
    #[arg(long, default_value_t = DEFAULT_DEBUG_HEIGHT)]
    pub height: u16,

    /// Stop after this many ticks
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Seed for a reproducible round
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output goes (the terminal itself is the game screen)
    #[arg(long, default_value = "kokaton-musou.log")]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved runtime settings for one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub debug_mode: bool,
    pub debug_width: u16,
    pub debug_height: u16,
    pub max_frames: Option<u64>,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl From<Cli> for GameConfig {
    fn from(cli: Cli) -> Self {
        // A headless run with no frame cap would spin forever once the script ends.
        let max_frames = match (cli.debug, cli.max_frames) {
            (_, Some(frames)) => Some(frames),
            (true, None) => Some(DEFAULT_DEBUG_FRAMES),
            (false, None) => None,
        };
        GameConfig {
            debug_mode: cli.debug,
            debug_width: cli.width.max(1),
            debug_height: cli.height.max(1),
            max_frames,
            seed: cli.seed,
            log_file: cli.log_file,
            log_level: if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GameConfig {
        let mut argv = vec!["kokaton-musou"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert!(!config.debug_mode);
        assert_eq!(config.max_frames, None);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.log_file, PathBuf::from("kokaton-musou.log"));
    }

    #[test]
    fn test_debug_mode_gets_frame_cap() {
        let config = parse(&["--debug", "--width", "40", "--height", "12"]);
        assert!(config.debug_mode);
        assert_eq!((config.debug_width, config.debug_height), (40, 12));
        assert_eq!(config.max_frames, Some(DEFAULT_DEBUG_FRAMES));
    }

    #[test]
    fn test_explicit_options() {
        let config = parse(&["--debug", "--max-frames", "10", "--seed", "7", "-v"]);
        assert_eq!(config.max_frames, Some(10));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["kokaton-musou", "--turbo"]).is_err());
    }
}
