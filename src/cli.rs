//! Command-line interface implementation for filegen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for filegen.
#[derive(Parser, Debug)]
#[command(author, version, about = "filegen: materialize a node tree into files, directories and archives", long_about = None)]
pub struct Args {
    /// Path to the manifest file, or a directory containing filegen.json/.yml/.yaml
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Directory the root node is generated into
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Generate into an existing output directory, overwriting files
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
