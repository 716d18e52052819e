//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// tooldeck - coding-agent operations server over stdio
#[derive(Parser, Debug, Clone)]
#[command(name = "tooldeck")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Workspace root served to callers (default: current directory)
    #[arg(default_value = ".")]
    pub workspace: PathBuf,

    /// Settings file (default: ~/.tooldeck/settings.toml)
    #[arg(long, env = "TOOLDECK_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_current_directory() {
        let args = Args::parse_from(["tooldeck"]);
        assert_eq!(args.workspace, PathBuf::from("."));
        assert!(!args.verbose);
        assert!(args.settings.is_none());
    }

    #[test]
    fn accepts_workspace_and_flags() {
        let args = Args::parse_from(["tooldeck", "/srv/project", "-v"]);
        assert_eq!(args.workspace, PathBuf::from("/srv/project"));
        assert!(args.verbose);
    }
}
