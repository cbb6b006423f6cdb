//! Command-line interface, built on clap.
//!
//! Defines the [`Cli`] struct with the subcommands in [`Command`] and the
//! global flags (--config, --verbose).

use clap::{Parser, Subcommand};

use crate::diff::ProjectionKind;

/// hostbook — spreadsheet-backed coordinator for interview hosting requests.
#[derive(Debug, Parser)]
#[command(name = "hostbook", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file (defaults to ./hostbook.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Print the batch record as JSON when a batch finishes.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh from the record store and show the four stage counts.
    Status,

    /// Export a stage's editable rows to a JSON file.
    Export {
        /// Which stage view to export.
        #[arg(long, value_enum)]
        stage: ProjectionKind,

        /// Path of the JSON file to write.
        #[arg(long)]
        out: String,
    },

    /// Write edited rows back, one cell write per changed cell.
    Save {
        /// The stage view the edits were exported from.
        #[arg(long, value_enum)]
        stage: ProjectionKind,

        /// Path of the edited JSON file.
        #[arg(long)]
        edits: String,
    },

    /// Send receipt confirmations to candidates awaiting one.
    ConfirmReceipts {
        /// Send every draft without individual review.
        #[arg(long, default_value_t = false)]
        launch_all: bool,

        /// Edited receipt rows to save before sending.
        #[arg(long)]
        edits: Option<String>,

        /// Sender name for the signature merge tag.
        #[arg(long)]
        signature: Option<String>,
    },

    /// Announce assigned hosts to candidates awaiting pairing.
    AnnouncePairings {
        /// Send every draft without individual review.
        #[arg(long, default_value_t = false)]
        launch_all: bool,

        /// Edited pairing rows to save before sending.
        #[arg(long)]
        edits: Option<String>,

        /// Sender name for the signature merge tag.
        #[arg(long)]
        signature: Option<String>,
    },

    /// Manually override a candidate's hosting status.
    SetStatus {
        /// Sheet row of the candidate in the tracked table.
        #[arg(long)]
        row: u32,

        /// Target stage.
        #[arg(long, value_enum)]
        to: ProjectionKind,
    },

    /// Compose and send the hosting plea to the class lists.
    Plea {
        /// Recipients; falls back to the configured plea recipients.
        #[arg(long)]
        to: Vec<String>,

        /// Subject line.
        #[arg(long, default_value = "Hosting: Call for Hosts")]
        subject: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_status() {
        let cli = Cli::parse_from(["hostbook", "status"]);
        assert!(matches!(cli.command, Command::Status));
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_export_with_stage() {
        let cli = Cli::parse_from([
            "hostbook", "export", "--stage", "pairing", "--out", "rows.json",
        ]);
        match cli.command {
            Command::Export { stage, out } => {
                assert_eq!(stage, ProjectionKind::Pairing);
                assert_eq!(out, "rows.json");
            }
            _ => panic!("expected Export command"),
        }
    }

    #[test]
    fn cli_parses_confirm_receipts_flags() {
        let cli = Cli::parse_from([
            "hostbook",
            "--verbose",
            "confirm-receipts",
            "--launch-all",
            "--signature",
            "Sam",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::ConfirmReceipts {
                launch_all,
                edits,
                signature,
            } => {
                assert!(launch_all);
                assert!(edits.is_none());
                assert_eq!(signature.as_deref(), Some("Sam"));
            }
            _ => panic!("expected ConfirmReceipts command"),
        }
    }

    #[test]
    fn cli_parses_set_status() {
        let cli = Cli::parse_from(["hostbook", "set-status", "--row", "7", "--to", "ignored"]);
        match cli.command {
            Command::SetStatus { row, to } => {
                assert_eq!(row, 7);
                assert_eq!(to, ProjectionKind::Ignored);
            }
            _ => panic!("expected SetStatus command"),
        }
    }

    #[test]
    fn cli_parses_plea_recipients() {
        let cli = Cli::parse_from([
            "hostbook", "plea", "--to", "a@example.edu", "--to", "b@example.edu",
        ]);
        match cli.command {
            Command::Plea { to, subject } => {
                assert_eq!(to.len(), 2);
                assert_eq!(subject, "Hosting: Call for Hosts");
            }
            _ => panic!("expected Plea command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
