//! Boundary between a web layer and the core: a deserialized request goes
//! in, an [`Artifact`] comes out.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::DEFAULT_SCALE;
use crate::convert::{Artifact, Converters};
use crate::error::DielineError;
use crate::generate::generate;
use crate::model::{Dimensions, Material, Style};
use crate::render::{OutputFormat, RenderOptions, render};

/// Body of a layout request, e.g.
/// `{ "length": 20, "breadth": 10, "height": 15, "format": "svg" }`.
///
/// `width` and `depth` are accepted for `length` and `breadth`. Style and
/// format stay strings here so unknown values surface as
/// [`DielineError::UnsupportedStyle`] / [`DielineError::UnsupportedFormat`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxLayoutRequest {
    #[serde(alias = "width")]
    pub length: f64,
    #[serde(alias = "depth")]
    pub breadth: f64,
    pub height: f64,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub caption: bool,
}

fn default_format() -> String {
    OutputFormat::Svg.as_str().to_string()
}

fn default_style() -> String {
    "rsc".to_string()
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

/// Request fields after validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidRequest {
    pub dimensions: Dimensions,
    pub style: Style,
    pub scale: f64,
    pub format: OutputFormat,
}

impl BoxLayoutRequest {
    pub fn new(length: f64, breadth: f64, height: f64) -> Self {
        BoxLayoutRequest {
            length,
            breadth,
            height,
            format: default_format(),
            style: default_style(),
            scale: DEFAULT_SCALE,
            material: Material::default(),
            caption: false,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse the query-string form `L=20&B=10&H=15[&format=..&style=..&scale=..]`.
    ///
    /// Missing or unparsable dimensions are reported as
    /// [`DielineError::InvalidDimension`] with a NaN value.
    pub fn from_query(query: &str) -> Result<Self, DielineError> {
        let dim = |short: &str, long: &'static str| -> Result<f64, DielineError> {
            query_value(query, short)
                .or_else(|| query_value(query, long))
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or(DielineError::InvalidDimension {
                    name: long,
                    value: f64::NAN,
                })
        };
        let mut req = BoxLayoutRequest::new(dim("L", "length")?, dim("B", "breadth")?, dim("H", "height")?);
        if let Some(f) = query_value(query, "format") {
            req.format = f;
        }
        if let Some(s) = query_value(query, "style") {
            req.style = s;
        }
        if let Some(s) = query_value(query, "scale") {
            req.scale = s.trim().parse().unwrap_or(f64::NAN);
        }
        if let Some(m) = query_value(query, "material") {
            req.material = m.parse()?;
        }
        if let Some(c) = query_value(query, "caption") {
            req.caption = matches!(c.as_str(), "1" | "true" | "yes");
        }
        Ok(req)
    }

    /// Check every field in a fixed order: dimensions, scale, style, format.
    pub fn validate(&self) -> Result<ValidRequest, DielineError> {
        let dimensions = Dimensions::new(self.length, self.breadth, self.height)?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(DielineError::InvalidScale { value: self.scale });
        }
        let style = self.style.parse::<Style>()?;
        let format = self.format.parse::<OutputFormat>()?;
        Ok(ValidRequest {
            dimensions,
            style,
            scale: self.scale,
            format,
        })
    }
}

/// Validate, generate, render and (when needed) convert.
///
/// A format with no registered converter fails with
/// [`DielineError::UnsupportedFormat`] before any geometry is computed.
pub fn produce_artifact(
    request: &BoxLayoutRequest,
    converters: &Converters,
    options: &RenderOptions,
) -> Result<Artifact, DielineError> {
    let valid = request.validate()?;
    let converter = match valid.format {
        OutputFormat::Svg => None,
        format => match converters.get(format) {
            Some(c) => Some(c),
            None => {
                warn!(%format, available = ?converters.formats(), "no converter registered");
                return Err(DielineError::UnsupportedFormat {
                    name: format.to_string(),
                });
            }
        },
    };

    let mut options = options.clone();
    options.material = request.material;
    options.caption |= request.caption;
    options.validate()?;

    let layout = generate(valid.dimensions, valid.style, valid.scale)?;
    let svg = render(&layout, OutputFormat::Svg, &options)?;
    let bytes = match converter {
        None => svg,
        Some(c) => c.convert(&svg).map_err(|source| DielineError::Conversion {
            format: valid.format,
            source,
        })?,
    };
    debug!(format = %valid.format, bytes = bytes.len(), "artifact ready");
    Ok(Artifact {
        format: valid.format,
        bytes,
    })
}

/// First value bound to `name` in a `k=v&k=v` query, percent-decoded with
/// `+` read as a space. A leading `?` is skipped and a bare `name` yields "".
pub fn query_value(query: &str, name: &str) -> Option<String> {
    query.trim_start_matches('?').split('&').find_map(|pair| {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then(|| decode_component(raw))
    })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .into_owned()
}
