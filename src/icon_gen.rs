use crate::badge::{self, BadgeOptions};
use crate::config::IconConfig;
use crate::error::IconError;
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbaImage,
};
use log::warn;
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

/// Result of generating one icon
#[derive(Debug)]
pub struct IconOutcome {
    pub size: u32,
    pub result: Result<PathBuf, IconError>,
}

/// Per-size outcomes of a batch run, in configured order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<IconOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|path| (o.size, path.as_path())))
    }

    pub fn failed(&self) -> impl Iterator<Item = (u32, &IconError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|err| (o.size, err)))
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Renders and writes every configured size under `root`.
///
/// Each size is independent: a failure is recorded in the report and the
/// remaining sizes are still attempted.
pub fn generate_icons(config: &IconConfig, root: &Path) -> BatchReport {
    println!("Generating badge icons...");

    let options = BadgeOptions {
        font_path: config.font_path.clone(),
        ..BadgeOptions::default()
    };

    let icons_dir = root.join(&config.icons_dir);
    let dir_ready = create_dir_all(&icons_dir).map_err(Arc::new);
    if let Err(err) = &dir_ready {
        warn!("Can't create {}: {}", icons_dir.display(), err);
    }

    let mut report = BatchReport::default();
    for &size in &config.sizes {
        let output_path = config.icon_file(size, root);

        let result = match &dir_ready {
            Ok(()) => {
                let image = badge::render_with(size, &options);
                save_png(&image, &output_path).map(|()| output_path)
            }
            Err(err) => Err(IconError::IconsDir {
                path: icons_dir.clone(),
                source: Arc::clone(err),
            }),
        };

        match &result {
            Ok(_) => println!("  ✓ Generated {}", config.icon_path(size)),
            Err(err) => eprintln!("  ✗ Failed to generate {}: {err}", config.icon_path(size)),
        }

        report.outcomes.push(IconOutcome { size, result });
    }

    report
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<(), IconError> {
    let io_err = |source: std::io::Error| IconError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut out_file = BufWriter::new(File::create(path).map_err(io_err)?);
    write_png(image.as_raw(), &mut out_file, image.width())?;
    out_file.flush().map_err(io_err)?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<(), IconError> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}
