//! Error types for dieline generation, rendering and conversion.

use thiserror::Error;

use crate::render::OutputFormat;

/// Errors returned by the public entry points.
///
/// Everything except [`DielineError::Conversion`] is an input validation
/// failure and is reported before any geometry is computed.
#[derive(Error, Debug)]
pub enum DielineError {
    #[error("invalid dimension {name}: {value} (must be finite and > 0)")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("invalid scale: {value} (must be finite, > 0 and keep the layout within f64 range)")]
    InvalidScale { value: f64 },

    #[error("unsupported style: {name}")]
    UnsupportedStyle { name: String },

    #[error("unsupported output format: {name}")]
    UnsupportedFormat { name: String },

    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("conversion to {format} failed")]
    Conversion {
        format: OutputFormat,
        #[source]
        source: ConvertError,
    },
}

impl DielineError {
    /// HTTP status a web layer should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            DielineError::Conversion { .. } => 500,
            _ => 400,
        }
    }

    /// True when retrying with the same input cannot succeed.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DielineError::Conversion { .. })
    }
}

/// Failures raised by an [`ArtifactConverter`](crate::convert::ArtifactConverter).
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

/// Violations of the fold-back-into-a-box invariant, see [`crate::closure`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClosureError {
    #[error("panels {a} and {b} overlap")]
    Overlap { a: String, b: String },

    #[error("fold edge {side} of {panel} has {partners} partners (expected 1)")]
    UnpairedFold {
        panel: String,
        side: &'static str,
        partners: usize,
    },

    #[error("glue edges of length {length} do not pair up")]
    UnpairedGlue { length: f64 },

    #[error("panel {panel} is {width}x{height}, expected {expected_w}x{expected_h}")]
    FaceSize {
        panel: String,
        width: f64,
        height: f64,
        expected_w: f64,
        expected_h: f64,
    },

    #[error("{face} face covered by {covered} of {required} area units")]
    Uncovered {
        face: &'static str,
        covered: f64,
        required: f64,
    },

    #[error("panel {panel} is not connected to the front over fold edges")]
    Detached { panel: String },
}
