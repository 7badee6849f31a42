//! filegen's command-line entry point: loads a manifest and generates it.

use log::info;
use std::path::{Path, PathBuf};

use filegen::{
    cli::{get_args, Args},
    config::load_manifest,
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    Generator,
};

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * Returns `Error::OutputDirectoryExists` if directory exists and force is false
fn get_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExists { output_dir: output_dir.display().to_string() });
    }
    Ok(output_dir.to_path_buf())
}

fn run(args: Args) -> Result<()> {
    let output_root = get_output_dir(&args.output_dir, args.force)?;
    let root = load_manifest(&args.manifest)?;

    filegen::utils::create_dir_all(&output_root, 0o755)?;

    let generator = Generator::with_default_handlers();
    info!("Generating '{}' node into {}", root.tag(), output_root.display());
    generator.generate(&output_root, &root)?;

    println!("Generation completed successfully in {}.", output_root.display());
    Ok(())
}
