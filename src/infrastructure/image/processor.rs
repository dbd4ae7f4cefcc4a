//! Local image processing with the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ImageError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::{MediaError, MediaResult};
use crate::domain::ports::{CompressionOptions, ImageProcessorPort};

const FILE_SCHEME: &str = "file://";

/// Downscales picked images and re-encodes them as JPEG into `output_dir`.
#[derive(Debug, Clone)]
pub struct LocalImageProcessor {
    output_dir: PathBuf,
}

impl LocalImageProcessor {
    /// Creates a processor writing into `output_dir`.
    #[must_use]
    pub const fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

/// Maps a local URI to a filesystem path. Only `file://` URIs and bare paths
/// are readable here.
fn local_path(uri: &str) -> MediaResult<PathBuf> {
    if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
        return Ok(PathBuf::from(path));
    }
    if uri.contains("://") {
        return Err(MediaError::unsupported(uri));
    }
    Ok(PathBuf::from(uri))
}

/// Output dimensions for `max_width`, preserving aspect ratio and never
/// upscaling.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled = u64::from(height) * u64::from(max_width) / u64::from(width);
    (max_width, (scaled as u32).max(1))
}

/// Decodes, resizes and encodes `source` into `target`. A partially written
/// `target` is removed on failure.
fn compress_file(
    source: &Path,
    target: &Path,
    options: CompressionOptions,
) -> MediaResult<(u32, u32)> {
    let result = encode_into(source, target, options);
    if result.is_err()
        && let Err(e) = std::fs::remove_file(target)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(target = %target.display(), error = %e, "Failed to remove partial output");
    }
    result
}

/// Formats the `image` crate cannot read are reported as unavailable.
fn decode_error(e: ImageError) -> MediaError {
    match e {
        ImageError::Unsupported(e) => MediaError::unavailable(e.to_string()),
        other => MediaError::decode(other.to_string()),
    }
}

fn encode_into(
    source: &Path,
    target: &Path,
    options: CompressionOptions,
) -> MediaResult<(u32, u32)> {
    let img = image::ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(decode_error)?;

    let (width, height) = target_dimensions(img.width(), img.height(), options.max_width);
    let resized = if width == img.width() {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut writer = BufWriter::new(File::create(target)?);
    JpegEncoder::new_with_quality(&mut writer, options.quality_percent())
        .encode_image(&rgb)
        .map_err(|e| MediaError::encode(e.to_string()))?;
    writer.flush()?;

    Ok((width, height))
}

#[async_trait::async_trait]
impl ImageProcessorPort for LocalImageProcessor {
    async fn downscale(
        &self,
        local_uri: &str,
        options: CompressionOptions,
    ) -> MediaResult<String> {
        let source = local_path(local_uri)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let target = self.output_dir.join(format!("{}.jpg", Uuid::new_v4()));

        let job_target = target.clone();
        let (width, height) =
            tokio::task::spawn_blocking(move || compress_file(&source, &job_target, options))
                .await
                .map_err(|e| MediaError::task(e.to_string()))??;

        debug!(target = %target.display(), width, height, "Re-encoded image");
        Ok(format!("{FILE_SCHEME}{}", target.display()))
    }

    async fn discard(&self, local_uri: &str) -> MediaResult<bool> {
        let path = local_path(local_uri)?;
        if !path.starts_with(&self.output_dir) {
            return Ok(false);
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
