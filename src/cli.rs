//! CLI argument definitions.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::SettingsOverrides;
use crate::launch::Overrides;

/// Top-level CLI parser for `gcm-correct`.
#[derive(Debug, Parser)]
#[command(
    name = "gcm-correct",
    version,
    about = "Run UNet bias correction for climate model salinity fields"
)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted before or after any subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Settings file (YAML). Defaults to `gcm-correct.yaml` if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Root of the input data folders.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Root of the output folders.
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Directory containing the training scripts.
    #[arg(long, global = true, value_name = "DIR")]
    pub scripts_dir: Option<PathBuf>,
    /// Interpreter used to run the training scripts.
    #[arg(long = "python", global = true, value_name = "PROGRAM")]
    pub interpreter: Option<String>,
    /// Print machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Settings values given on the command line.
    #[must_use]
    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            data_dir: self.data_dir.clone(),
            output_dir: self.output_dir.clone(),
            scripts_dir: self.scripts_dir.clone(),
            interpreter: self.interpreter.clone(),
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the variables available for bias correction.
    ListVariables,
    /// Report the GPUs visible to training.
    Gpus,
    /// Check that a variable's input data files exist.
    Check {
        /// Variable identifier (see `list-variables`).
        #[arg(long)]
        variable: String,
    },
    /// Run the UNet correction for a variable.
    Run(RunArgs),
}

/// Arguments of `run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Variable identifier (see `list-variables`).
    #[arg(long)]
    pub variable: String,
    /// Override the number of training epochs.
    #[arg(long)]
    pub epochs: Option<NonZeroU32>,
    /// Override the training batch size.
    #[arg(long)]
    pub batch_size: Option<NonZeroU32>,
    /// Load the previously saved model instead of training from scratch.
    #[arg(long)]
    pub use_existing_model: bool,
    /// Launch even if input data files are missing.
    #[arg(long)]
    pub skip_data_check: bool,
}

impl RunArgs {
    /// Script overrides requested by these arguments.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            epochs: self.epochs,
            batch_size: self.batch_size,
            reuse_existing_model: self.use_existing_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_list_variables() {
        let cli = Cli::parse_from(["gcm-correct", "list-variables"]);
        assert!(matches!(cli.command, Command::ListVariables));
    }

    #[test]
    fn parses_check_with_variable() {
        let cli = Cli::parse_from(["gcm-correct", "check", "--variable", "sss"]);
        assert!(matches!(cli.command, Command::Check { variable } if variable == "sss"));
    }

    #[test]
    fn parses_run_with_overrides_and_globals() {
        let cli = Cli::parse_from([
            "gcm-correct",
            "run",
            "--variable",
            "s200mavg",
            "--epochs",
            "10",
            "--batch-size",
            "16",
            "--use-existing-model",
            "--json",
            "-vv",
        ]);
        let Command::Run(args) = cli.command else { panic!("expected run") };
        let overrides = args.overrides();
        assert_eq!(args.variable, "s200mavg");
        assert_eq!(overrides.epochs.map(u32::from), Some(10));
        assert_eq!(overrides.batch_size.map(u32::from), Some(16));
        assert!(overrides.reuse_existing_model);
        assert!(cli.global.json);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn rejects_zero_epochs() {
        let result =
            Cli::try_parse_from(["gcm-correct", "run", "--variable", "sss", "--epochs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_requires_variable() {
        assert!(Cli::try_parse_from(["gcm-correct", "run"]).is_err());
    }

    #[test]
    fn settings_flags_become_overrides() {
        let cli = Cli::parse_from(["gcm-correct", "gpus", "--python", "python3.12"]);
        assert_eq!(cli.global.settings_overrides().interpreter.as_deref(), Some("python3.12"));
    }
}
