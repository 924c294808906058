use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "chemdepict - lay out 2D chemical structure drawings: valence, charges, bond lines and stereo bonds.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute chemistry, stereo bonds, bond lines and crossings for a molecule document.
    Layout(LayoutArgs),
    /// Print the inferred valence state of every atom in a molecule document.
    Inspect(InspectArgs),
}

/// Arguments for the `layout` subcommand.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Path to the input molecule document (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the layout report. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a depiction settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the spacing between the lines of a multiple bond.
    #[arg(long, value_name = "FLOAT")]
    pub bond_dist: Option<f64>,

    /// Set a specific settings value, overriding the config file.
    /// Can be used multiple times. Example: -S padding=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Also write the laid out molecule (with assigned stereo bonds) to this path.
    #[arg(long, value_name = "PATH")]
    pub save_document: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the input molecule document (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn layout_arguments_parse() {
        let cli = Cli::parse_from([
            "chemdepict",
            "-vv",
            "layout",
            "-i",
            "mol.json",
            "-S",
            "padding=3",
            "--bond-dist",
            "6",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Layout(args) = cli.command else {
            panic!("expected the layout command");
        };
        assert_eq!(args.input, PathBuf::from("mol.json"));
        assert_eq!(args.set_values, vec!["padding=3".to_string()]);
        assert_eq!(args.bond_dist, Some(6.0));
        assert!(args.output.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["chemdepict", "-q", "-v", "inspect", "-i", "m.json"]).is_err());
    }
}
