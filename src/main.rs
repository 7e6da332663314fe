use anyhow::{Context, Result};
use clap::Parser;
use ext_icon_gen::{config, icon_gen, manifest, IconConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[clap(
    name = "ext-icon-gen",
    about = "Draw the extension badge icons and register them in manifest.json"
)]
struct Args {
    /// Icon sizes to generate.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES", default_values_t = config::DEFAULT_SIZES)]
    sizes: Vec<u32>,

    /// Icons directory, relative to the working directory.
    #[clap(short, long, value_name = "DIR", default_value = config::DEFAULT_ICONS_DIR)]
    output: PathBuf,

    /// Manifest to update.
    #[clap(short, long, value_name = "FILE", default_value = config::DEFAULT_MANIFEST)]
    manifest: PathBuf,

    /// TrueType font for the label, tried before the system fonts.
    #[clap(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Only generate icons; leave the manifest alone.
    #[clap(long)]
    skip_manifest: bool,

    /// Exit with a failure status if any icon or the manifest update failed.
    #[clap(long)]
    strict: bool,
}

impl Args {
    fn icon_config(&self) -> IconConfig {
        IconConfig {
            sizes: self.sizes.clone(),
            icons_dir: self.output.clone(),
            manifest_path: self.manifest.clone(),
            font_path: self.font.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let config = args.icon_config();
    config.validate().context("Invalid icon configuration")?;

    let root = Path::new(".");
    let report = icon_gen::generate_icons(&config, root);
    let generated = report.succeeded().count();
    let mark = if report.is_success() { "✓" } else { "✗" };
    println!(
        "{mark} Generated {generated} of {} icons in {}",
        config.sizes.len(),
        config.icons_dir.display()
    );

    let mut manifest_ok = true;
    if !args.skip_manifest {
        let manifest_path = config.manifest_file(root);
        println!("Updating {}...", manifest_path.display());

        match manifest::update_manifest(&manifest_path, &config) {
            Ok(change) => {
                if change.icons_written() {
                    println!("  ✓ Registered icons");
                }
                if change.default_icon_added() {
                    println!("  ✓ Set action.default_icon");
                } else {
                    println!("  - Kept existing action.default_icon");
                }
            }
            Err(err) => {
                manifest_ok = false;
                eprintln!("  ✗ Failed to update {}: {err}", manifest_path.display());
            }
        }
    }

    if args.strict && !(report.is_success() && manifest_ok) {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
