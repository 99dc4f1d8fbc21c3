//! Command-line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Capsule - share photos of your expeditions
#[derive(Parser, Debug)]
#[command(name = "capsule")]
#[command(about = "Browse your trips and upload expedition photos", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./capsule.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and establish the backend session
    Login {
        /// Account email (defaults to the configured email)
        #[arg(long)]
        email: Option<String>,

        /// Account password
        #[arg(long, env = "CAPSULE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// List your trips, newest first
    Trips,

    /// Show one trip with its sightings and photos
    Trip {
        /// Trip collection id
        id: String,
    },

    /// Upload photos to a trip
    Upload {
        /// Trip collection id
        collection: String,

        /// Photo files
        files: Vec<PathBuf>,

        /// Caption applied to every photo
        #[arg(long)]
        caption: Option<String>,

        /// Only you can view the photos
        #[arg(long)]
        only_you_can_view: bool,

        /// Only you can share the photos
        #[arg(long)]
        only_you_can_share: bool,
    },

    /// Check photos against the upload policy without uploading
    Check {
        /// Photo files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check an invitation to a trip collection
    Invitation {
        /// Trip collection id
        collection: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_arguments() {
        let cli = Cli::try_parse_from([
            "capsule",
            "upload",
            "c1",
            "a.jpg",
            "b.png",
            "--caption",
            "Reef",
            "--only-you-can-view",
        ])
        .unwrap();

        match cli.command {
            Commands::Upload {
                collection,
                files,
                caption,
                only_you_can_view,
                only_you_can_share,
            } => {
                assert_eq!(collection, "c1");
                assert_eq!(files.len(), 2);
                assert_eq!(caption.as_deref(), Some("Reef"));
                assert!(only_you_can_view);
                assert!(!only_you_can_share);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Cli::try_parse_from(["capsule", "check"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["capsule", "trips", "--config", "dev.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        assert!(matches!(cli.command, Commands::Trips));
    }
}
