//! Vector rendering of a [`Layout`].
//!
//! The renderer only translates panels by the margin; sizes and relative
//! positions are written exactly as generated, printed with enough digits
//! that small panels keep a non-zero size.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_STROKE_WIDTH};
use crate::error::DielineError;
use crate::model::{EdgeKind, Layout, Material};

/// Artifact formats known to the system. Only [`OutputFormat::Svg`] is
/// produced natively; the others need an
/// [`ArtifactConverter`](crate::convert::ArtifactConverter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
    Psd,
    Pdf,
    Cdr,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Psd => "psd",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Cdr => "cdr",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Png => "image/png",
            OutputFormat::Psd => "image/vnd.adobe.photoshop",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Cdr => "application/vnd.corel-draw",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = DielineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "psd" => Ok(OutputFormat::Psd),
            "pdf" => Ok(OutputFormat::Pdf),
            "cdr" => Ok(OutputFormat::Cdr),
            _ => Err(DielineError::UnsupportedFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Drawing options. Every field has a default, so a partial JSON object is
/// a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Blank border on every side, in layout units.
    pub margin: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub font_size: f64,
    /// Tint panels by role; `false` leaves them unfilled.
    pub fill_panels: bool,
    /// `stroke-dasharray` of fold lines.
    pub fold_dash: String,
    /// Print dimensions and material under the drawing.
    pub caption: bool,
    pub material: Material,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            margin: DEFAULT_MARGIN,
            stroke: "#000000".to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            fill_panels: true,
            fold_dash: "6 4".to_string(),
            caption: false,
            material: Material::default(),
        }
    }
}

impl RenderOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), DielineError> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(DielineError::InvalidOption {
                name: "margin",
                reason: format!("{} is not a finite, non-negative length", self.margin),
            });
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(DielineError::InvalidOption {
                name: "stroke_width",
                reason: format!("{} is not positive", self.stroke_width),
            });
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(DielineError::InvalidOption {
                name: "font_size",
                reason: format!("{} is not positive", self.font_size),
            });
        }
        Ok(())
    }

    fn line_gap(&self) -> f64 {
        self.font_size * 7.0 / 5.0
    }
}

/// Render `layout` into `format`. Only SVG is emitted here.
pub fn render(
    layout: &Layout,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<Vec<u8>, DielineError> {
    if format != OutputFormat::Svg {
        return Err(DielineError::UnsupportedFormat {
            name: format.to_string(),
        });
    }
    options.validate()?;
    Ok(render_svg(layout, options).into_bytes())
}

fn caption_lines(layout: &Layout, options: &RenderOptions) -> Vec<String> {
    if !options.caption {
        return Vec::new();
    }
    let d = &layout.dimensions;
    vec![
        format!("Length: {} cm", fmt_num(d.length())),
        format!("Breadth: {} cm", fmt_num(d.breadth())),
        format!("Height: {} cm", fmt_num(d.height())),
        format!("Material: {}", options.material),
        format!("Style: {}", layout.style),
    ]
}

fn render_svg(layout: &Layout, options: &RenderOptions) -> String {
    let bbox = layout.bounding_box;
    let m = options.margin;
    let dx = m - bbox.min_x();
    let dy = m - bbox.min_y();
    let caption = caption_lines(layout, options);
    let caption_h = caption.len() as f64 * options.line_gap();
    let w = ceil2(bbox.size.width + 2.0 * m);
    let h = ceil2(bbox.size.height + 2.0 * m + caption_h);
    debug!(width = w, height = h, panels = layout.panels.len(), "rendering svg");

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" stroke=\"{}\" fill=\"none\" stroke-width=\"{}\" stroke-linejoin=\"miter\" font-family=\"sans-serif\" font-size=\"{}\">",
        svg_escape(&options.stroke),
        fmt_num(options.stroke_width),
        fmt_num(options.font_size),
        w = fmt_num(w),
        h = fmt_num(h),
    );

    s.push_str("<g id=\"panels\">\n");
    for p in &layout.panels {
        let r = p.rect.translate(dx, dy);
        let fill = if options.fill_panels {
            dieline_palette::role_color(p.role.as_str())
        } else {
            "none"
        };
        let _ = writeln!(
            s,
            "<rect id=\"{}\" data-role=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            svg_escape(&p.id),
            p.role,
            fmt_num(r.min_x()),
            fmt_num(r.min_y()),
            fmt_num(r.size.width),
            fmt_num(r.size.height),
            fill
        );
    }
    s.push_str("</g>\n");

    // A shared fold is the top edge of the lower panel or the left edge of the
    // right-hand panel, so drawing only those two sides draws each fold once.
    let _ = writeln!(
        s,
        "<g id=\"folds\" stroke-dasharray=\"{}\">",
        svg_escape(&options.fold_dash)
    );
    for p in &layout.panels {
        let r = p.rect.translate(dx, dy);
        if p.edges.top == EdgeKind::Fold {
            push_line(&mut s, r.min_x(), r.min_y(), r.max_x(), r.min_y());
        }
        if p.edges.left == EdgeKind::Fold {
            push_line(&mut s, r.min_x(), r.min_y(), r.min_x(), r.max_y());
        }
    }
    s.push_str("</g>\n");

    let _ = writeln!(
        s,
        "<g id=\"labels\" fill=\"{}\" stroke=\"none\" text-anchor=\"middle\" dominant-baseline=\"middle\">",
        svg_escape(&options.stroke)
    );
    for p in &layout.panels {
        let c = p.rect.translate(dx, dy).center();
        let _ = writeln!(
            s,
            "<text x=\"{}\" y=\"{}\">{}</text>",
            fmt_num(c.x),
            fmt_num(c.y),
            svg_escape(&p.id)
        );
    }
    s.push_str("</g>\n");

    if !caption.is_empty() {
        let _ = writeln!(
            s,
            "<g id=\"caption\" fill=\"{}\" stroke=\"none\">",
            svg_escape(&options.stroke)
        );
        let top = m + bbox.size.height + m / 2.0;
        for (i, line) in caption.iter().enumerate() {
            let _ = writeln!(
                s,
                "<text x=\"{}\" y=\"{}\">{}</text>",
                fmt_num(m),
                fmt_num(top + (i as f64 + 0.5) * options.line_gap()),
                svg_escape(line)
            );
        }
        s.push_str("</g>\n");
    }

    s.push_str("</svg>\n");
    s
}

fn push_line(s: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    let _ = writeln!(
        s,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2)
    );
}

/// Round up to the next hundredth so a printed canvas never undercuts its content.
fn ceil2(v: f64) -> f64 {
    // The slack keeps float noise such as 290.00000000000006 from bumping a digit.
    ((v * 100.0) - 1e-6).ceil() / 100.0
}

// At least two decimals and six significant digits, trailing zeros trimmed.
// Values within float noise of an integer print as that integer.
fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let r = v.round();
    if (v - r).abs() <= 1e-9 * v.abs().max(1.0) {
        return format!("{:.0}", if r == 0.0 { 0.0 } else { r });
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(2) as usize;
    let s = format!("{v:.decimals$}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
