use std::path::PathBuf;

use dieline_core::{ArtifactConverter, ConvertError, OutputFormat};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use tracing::debug;

use crate::psd;

/// Settings shared by the raster-backed converters.
#[derive(Clone, Debug)]
pub struct RasterSettings {
    /// Device pixels per layout unit.
    pub pixels_per_unit: f32,
    /// Extra font file; system fonts are always loaded.
    pub font: Option<PathBuf>,
}

impl Default for RasterSettings {
    fn default() -> Self {
        RasterSettings {
            pixels_per_unit: 1.0,
            font: None,
        }
    }
}

pub(crate) fn usvg_options(font: Option<&PathBuf>) -> Result<usvg::Options<'static>, ConvertError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(path) = font {
        let db = opt.fontdb_mut();
        db.load_font_file(path)
            .map_err(|e| ConvertError::SvgParse(format!("font {}: {e}", path.display())))?;
        // Text is set in generic sans-serif, so a --font file takes over that family.
        let family = db
            .faces()
            .last()
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
        if let Some(name) = family {
            db.set_sans_serif_family(name);
        }
    }
    Ok(opt)
}

/// Rasterize `svg` on an opaque white background.
pub fn svg_to_pixmap(svg: &[u8], settings: &RasterSettings) -> Result<tiny_skia::Pixmap, ConvertError> {
    let opt = usvg_options(settings.font.as_ref())?;
    let tree = usvg::Tree::from_data(svg, &opt).map_err(|e| ConvertError::SvgParse(e.to_string()))?;

    let s = settings.pixels_per_unit;
    let size = tree.size();
    let width = (size.width() * s).ceil().max(1.0) as u32;
    let height = (size.height() * s).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ConvertError::PixmapAlloc { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::from_scale(s, s), &mut pixmap.as_mut());
    debug!(width, height, "rasterized");
    Ok(pixmap)
}

fn encode_png_deterministic(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out, pixmap.width(), pixmap.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    enc.set_filter(FilterType::NoFilter);
    enc.set_compression(Compression::Default);
    let mut writer = enc.write_header()?;
    writer.write_image_data(pixmap.data())?;
    writer.finish()?;
    Ok(out)
}

#[derive(Clone, Debug, Default)]
pub struct PngConverter {
    pub settings: RasterSettings,
}

impl ArtifactConverter for PngConverter {
    fn target(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn convert(&self, svg: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let pixmap = svg_to_pixmap(svg, &self.settings)?;
        encode_png_deterministic(&pixmap).map_err(|e| ConvertError::Encode {
            format: "png",
            message: e.to_string(),
        })
    }
}

/// Flattened Photoshop document of the rasterized layout.
#[derive(Clone, Debug, Default)]
pub struct PsdConverter {
    pub settings: RasterSettings,
}

impl ArtifactConverter for PsdConverter {
    fn target(&self) -> OutputFormat {
        OutputFormat::Psd
    }

    fn convert(&self, svg: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let pixmap = svg_to_pixmap(svg, &self.settings)?;
        let rgb: Vec<[u8; 3]> = pixmap
            .pixels()
            .iter()
            .map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();
        psd::encode_rgb(pixmap.width(), pixmap.height(), &rgb).map_err(|message| ConvertError::Encode {
            format: "psd",
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect x="0" y="0" width="10" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn pixmap_is_scaled_and_white() {
        let settings = RasterSettings {
            pixels_per_unit: 2.0,
            font: None,
        };
        let pm = svg_to_pixmap(SQUARE, &settings).unwrap();
        assert_eq!((pm.width(), pm.height()), (80, 40));
        let corner = pm.pixel(79, 39).unwrap().demultiply();
        assert_eq!((corner.red(), corner.green(), corner.blue()), (255, 255, 255));
        let red = pm.pixel(5, 5).unwrap().demultiply();
        assert_eq!((red.red(), red.green(), red.blue()), (255, 0, 0));
    }

    #[test]
    fn png_magic() {
        let out = PngConverter::default().convert(SQUARE).unwrap();
        assert!(out.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn psd_magic_and_size() {
        let out = PsdConverter::default().convert(SQUARE).unwrap();
        assert!(out.starts_with(b"8BPS"));
        assert_eq!(u32::from_be_bytes(out[14..18].try_into().unwrap()), 20);
        assert_eq!(u32::from_be_bytes(out[18..22].try_into().unwrap()), 40);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = PngConverter::default().convert(b"not svg").unwrap_err();
        assert!(matches!(err, ConvertError::SvgParse(_)));
    }
}
