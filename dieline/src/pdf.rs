use std::path::PathBuf;

use dieline_core::{ArtifactConverter, ConvertError, OutputFormat};

/// Vector PDF through svg2pdf; one page sized to the SVG canvas.
#[derive(Clone, Debug, Default)]
pub struct PdfConverter {
    pub font: Option<PathBuf>,
}

impl ArtifactConverter for PdfConverter {
    fn target(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn convert(&self, svg: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let mut opt = svg2pdf::usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        if let Some(path) = &self.font {
            opt.fontdb_mut()
                .load_font_file(path)
                .map_err(|e| ConvertError::SvgParse(format!("font {}: {e}", path.display())))?;
        }
        let tree = svg2pdf::usvg::Tree::from_data(svg, &opt).map_err(|e| ConvertError::SvgParse(e.to_string()))?;
        svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        )
        .map_err(|e| ConvertError::Encode {
            format: "pdf",
            message: format!("{e:?}"),
        })
    }
}
