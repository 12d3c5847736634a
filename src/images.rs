//! Artwork proxy cache.
//!
//! Images are downloaded once into `<data_dir>/images/`, named by the md5 of
//! their source URL. Resized/faded/converted variants are cached next to the
//! original as `<hash>_w<w>_h<h>_o_<opacity>_<mode>`.

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;
use url::Url;

use crate::client::ServiceClient;
use crate::config::Config;
use crate::error::{DashError, Result};

const JPEG_QUALITY: u8 = 95;

/// Target colour mode, named as in the `mode` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "L" => Some(ColorMode::L),
            "RGB" => Some(ColorMode::Rgb),
            "RGBA" => Some(ColorMode::Rgba),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }
}

/// Requested variant of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOptions {
    pub height: Option<u32>,
    pub width: Option<u32>,
    /// 0-100; below 100 the image is blended towards white
    pub opacity: f32,
    pub mode: Option<ColorMode>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            height: None,
            width: None,
            opacity: 100.0,
            mode: None,
        }
    }
}

impl ImageOptions {
    fn resize_to(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    pub fn needs_processing(&self) -> bool {
        self.resize_to().is_some() || self.opacity < 100.0 || self.mode.is_some()
    }

    fn variant_suffix(&self) -> String {
        let opt = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "None".into());
        format!(
            "_w{}_h{}_o_{:.1}_{}",
            opt(self.width),
            opt(self.height),
            self.opacity,
            self.mode.map(ColorMode::as_str).unwrap_or("None")
        )
    }
}

#[derive(Debug, Clone)]
pub struct CachedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl CachedImage {
    fn new(bytes: Vec<u8>) -> Self {
        let content_type = content_type(&bytes);
        Self {
            bytes,
            content_type,
        }
    }
}

#[derive(Clone)]
pub struct ImageCache {
    dir: PathBuf,
    client: ServiceClient,
    enabled: bool,
}

impl ImageCache {
    pub fn new(data_dir: PathBuf, client: ServiceClient, enabled: bool) -> Self {
        Self {
            dir: data_dir.join("images"),
            client,
            enabled,
        }
    }

    /// Fetch `url` (through the cache when enabled) and apply `options`.
    /// When processing fails the original bytes are served.
    pub async fn get(
        &self,
        url: &Url,
        service: Option<&str>,
        options: ImageOptions,
    ) -> Result<CachedImage> {
        let hash = format!("{:x}", md5::compute(url.as_str().as_bytes()));
        let original = self.original(&hash, url, service).await?;

        if !options.needs_processing() {
            return Ok(CachedImage::new(original));
        }

        let variant = self.dir.join(format!("{}{}", hash, options.variant_suffix()));
        if self.enabled {
            if let Ok(bytes) = tokio::fs::read(&variant).await {
                return Ok(CachedImage::new(bytes));
            }
        }

        let source = original.clone();
        let processed = tokio::task::spawn_blocking(move || process(&source, options))
            .await
            .map_err(|e| DashError::Io(std::io::Error::other(e)))?;

        match processed {
            Ok(bytes) => {
                if self.enabled {
                    if let Err(e) = tokio::fs::write(&variant, &bytes).await {
                        tracing::warn!("Failed to cache {}: {}", variant.display(), e);
                    }
                }
                Ok(CachedImage::new(bytes))
            }
            Err(e) => {
                tracing::debug!("{} returning original image {}", e, url);
                Ok(CachedImage::new(original))
            }
        }
    }

    async fn original(&self, hash: &str, url: &Url, service: Option<&str>) -> Result<Vec<u8>> {
        if !self.enabled {
            return self.client.get_bytes(url, service).await;
        }

        let path = self.dir.join(hash);
        if let Ok(bytes) = tokio::fs::read(&path).await {
            return Ok(bytes);
        }

        tracing::debug!("No local image found for {}. Downloading {}", path.display(), url);
        let bytes = self.client.get_bytes(url, service).await?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        Ok(bytes)
    }
}

/// Where artwork for `service` comes from: absolute URLs are fetched as-is,
/// anything else (media-center image paths, library keys) through the
/// service's own thumbnail route.
pub fn source_url(config: &Config, service: &str, thumb: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(thumb) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(url);
        }
    }
    config.service_url(
        service,
        &format!("GetThumb?thumb={}", urlencoding::encode(thumb)),
    )
}

/// Resize, fade and convert an encoded image, re-encoding it in its source
/// format (JPEG at quality 95).
pub fn process(data: &[u8], options: ImageOptions) -> Result<Vec<u8>> {
    let format = image::guess_format(data)?;
    let mut img = image::load_from_memory_with_format(data, format)?;

    if let Some((w, h)) = options.resize_to() {
        img = img.resize_exact(w, h, FilterType::Triangle);
    }

    if options.opacity < 100.0 {
        img = fade_to_white(&img, options.opacity / 100.0);
    }

    if let Some(mode) = options.mode {
        img = match mode {
            ColorMode::L => DynamicImage::ImageLuma8(img.to_luma8()),
            ColorMode::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
            ColorMode::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
        };
    }

    let mut output = Cursor::new(Vec::new());
    if format == ImageFormat::Jpeg {
        // JPEG has no alpha channel
        let img = match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        let encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
        img.write_with_encoder(encoder)?;
    } else {
        img.write_to(&mut output, format)?;
    }
    Ok(output.into_inner())
}

/// Blend with a white overlay: `white * (1 - alpha) + image * alpha`.
fn fade_to_white(img: &DynamicImage, alpha: f32) -> DynamicImage {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = (255.0 * (1.0 - alpha) + *channel as f32 * alpha).round() as u8;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

pub fn content_type(data: &[u8]) -> &'static str {
    if looks_like_svg(data) {
        return "image/svg+xml";
    }
    image::guess_format(data)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

fn looks_like_svg(data: &[u8]) -> bool {
    data.iter()
        .find(|&&b| b != 0xEF && b != 0xBB && b != 0xBF && !b.is_ascii_whitespace())
        == Some(&b'<')
}

/// Placeholder for artwork that is missing.
pub fn placeholder_svg(width: u32, height: u32) -> String {
    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"##,
            r##"<rect width="100%" height="100%" fill="#333"/>"##,
            r##"<text x="50%" y="50%" fill="#888" text-anchor="middle" "##,
            r##"dy=".3em" font-family="sans-serif" font-size="24">No cover</text>"##,
            r##"</svg>"##
        ),
        width, height, width, height
    )
}
