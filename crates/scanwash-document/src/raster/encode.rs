// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap encoders — single-page PNG and multi-page TIFF.

use std::fs::File;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use scanwash_core::Dpi;
use scanwash_core::error::ScanwashError;
use tiff::encoder::compression::{Deflate, DeflateLevel};
use tiff::encoder::{Rational, TiffEncoder, colortype};
use tiff::tags::ResolutionUnit;
use tracing::debug;

const METRES_PER_INCH: f64 = 0.0254;

/// Encode a bitmap as RGB PNG bytes with a `pHYs` chunk for `dpi`.
pub fn encode_png(image: &DynamicImage, dpi: Dpi) -> Result<Vec<u8>, String> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels_per_metre = (f64::from(dpi.get()) / METRES_PER_INCH).round() as u32;

    let mut buffer = Vec::new();
    let mut encoder = png::Encoder::new(&mut buffer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_metre,
        yppu: pixels_per_metre,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder
        .write_header()
        .map_err(|err| format!("PNG header failed: {}", err))?;
    writer
        .write_image_data(rgb.as_raw())
        .map_err(|err| format!("PNG encoding failed: {}", err))?;
    writer
        .finish()
        .map_err(|err| format!("PNG encoding failed: {}", err))?;
    Ok(buffer)
}

/// Encode a bitmap as PNG and write it to `path`.
pub fn write_png(image: &DynamicImage, dpi: Dpi, path: &Path) -> Result<(), String> {
    let bytes = encode_png(image, dpi)?;
    std::fs::write(path, &bytes)
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    debug!(path = %path.display(), bytes = bytes.len(), "PNG written");
    Ok(())
}

/// Writes pages as successive frames of one TIFF file.
///
/// Frames are RGB, Deflate-compressed, and tagged with the render resolution.
pub struct TiffWriter {
    encoder: TiffEncoder<File>,
    path: PathBuf,
    dpi: Dpi,
    frames: usize,
}

impl TiffWriter {
    /// Create (or truncate) the output file.
    pub fn create(path: &Path, dpi: Dpi) -> Result<Self, ScanwashError> {
        let file = File::create(path).map_err(|err| {
            ScanwashError::Export(format!("cannot create {}: {}", path.display(), err))
        })?;
        let encoder = TiffEncoder::new(file).map_err(|err| {
            ScanwashError::Export(format!("cannot start TIFF {}: {}", path.display(), err))
        })?;
        Ok(Self {
            encoder,
            path: path.to_path_buf(),
            dpi,
            frames: 0,
        })
    }

    /// Append `image` as the next frame.
    pub fn add_frame(&mut self, image: &DynamicImage) -> Result<(), String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut frame = self
            .encoder
            .new_image_with_compression::<colortype::RGB8, _>(
                width,
                height,
                Deflate::with_level(DeflateLevel::Balanced),
            )
            .map_err(|err| format!("TIFF frame setup failed: {}", err))?;

        let resolution = Rational {
            n: self.dpi.get(),
            d: 1,
        };
        frame.resolution(ResolutionUnit::Inch, resolution);

        frame
            .write_data(rgb.as_raw())
            .map_err(|err| format!("TIFF frame encoding failed: {}", err))?;

        self.frames += 1;
        debug!(frame = self.frames, width, height, "TIFF frame written");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the file and return the number of frames written.
    pub fn finish(self) -> usize {
        self.frames
    }
}
