//! Raster images and PDF documents.
//!
//! These have no depth data; they are decoded just far enough to display:
//! PNG bytes are validated and measured, PDFs yield their text
//! ([`pdf_extract`]) and embedded images ([`lopdf`]).

use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

/// An encoded image ready for display.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Encoded bytes (PNG or JPEG), shared with the image loader.
    pub bytes: Arc<[u8]>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    /// Stable `bytes://` URI for the egui image loaders.
    pub fn uri(&self, label: &str) -> String {
        let ext = match self.format {
            ImageFormat::Jpeg => "jpg",
            _ => "png",
        };
        format!("bytes://{label}.{ext}")
    }
}

/// Text and images pulled out of a PDF.
#[derive(Debug, Clone, Default)]
pub struct DocumentContent {
    pub text: String,
    pub images: Vec<RasterImage>,
    pub page_count: usize,
}

/// Validate a PNG and record its dimensions.
pub fn parse_png(bytes: Vec<u8>) -> Result<RasterImage> {
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .context("decoding PNG")?;
    Ok(RasterImage {
        width: decoded.width(),
        height: decoded.height(),
        format: ImageFormat::Png,
        bytes: bytes.into(),
    })
}

/// Extract the text of every page plus the images we can decode.
pub fn parse_pdf(bytes: &[u8]) -> Result<DocumentContent> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("failed to extract text from PDF: {e}"))?;
    log::debug!("Extracted {} characters of text from PDF", text.len());

    let doc = lopdf::Document::load_mem(bytes).context("opening PDF")?;
    let pages = doc.get_pages();

    let mut images = Vec::new();
    for (page_no, page_id) in &pages {
        let page_images = match doc.get_page_images(*page_id) {
            Ok(imgs) => imgs,
            Err(e) => {
                log::debug!("page {page_no}: no readable images ({e})");
                continue;
            }
        };
        for img in page_images {
            match embedded_image(&doc, &img) {
                Ok(Some(raster)) => images.push(raster),
                Ok(None) => log::debug!(
                    "page {page_no}: skipping image {:?} with filters {:?}, colour space {:?}",
                    img.id,
                    img.filters,
                    img.color_space
                ),
                Err(e) => log::warn!("page {page_no}: image {:?}: {e:#}", img.id),
            }
        }
    }

    Ok(DocumentContent {
        text,
        images,
        page_count: pages.len(),
    })
}

/// JPEG streams are passed through; raw 8-bit RGB/gray streams are
/// re-encoded as PNG. Anything else is unsupported (`None`).
fn embedded_image(
    doc: &lopdf::Document,
    img: &lopdf::xobject::PdfImage<'_>,
) -> Result<Option<RasterImage>> {
    let (Ok(width), Ok(height)) = (u32::try_from(img.width), u32::try_from(img.height)) else {
        return Ok(None);
    };
    let filters = img.filters.as_deref().unwrap_or_default();

    if filters.iter().any(|f| f == "DCTDecode") {
        return Ok(Some(RasterImage {
            bytes: img.content.into(),
            format: ImageFormat::Jpeg,
            width,
            height,
        }));
    }

    if img.bits_per_component != Some(8) {
        return Ok(None);
    }
    let raw = if filters.is_empty() {
        img.content.to_vec()
    } else if filters.iter().all(|f| f == "FlateDecode") {
        doc.get_object(img.id)
            .and_then(|obj| obj.as_stream())
            .and_then(|stream| stream.decompressed_content())
            .context("decompressing image stream")?
    } else {
        return Ok(None);
    };

    let decoded = match img.color_space.as_deref() {
        Some("DeviceRGB") => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
        Some("DeviceGray") => {
            GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8)
        }
        _ => return Ok(None),
    };
    let Some(decoded) = decoded else {
        return Ok(None);
    };

    let mut bytes = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("encoding PNG")?;
    Ok(Some(RasterImage {
        bytes: bytes.into(),
        format: ImageFormat::Png,
        width,
        height,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn png_dimensions() {
        let raster = parse_png(tiny_png()).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.uri("log"), "bytes://log.png");
    }

    #[test]
    fn png_rejects_garbage() {
        assert!(parse_png(b"not a png".to_vec()).is_err());
    }

    #[test]
    fn pdf_rejects_garbage() {
        assert!(parse_pdf(b"%PDF-broken").is_err());
    }
}
