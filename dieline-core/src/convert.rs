//! Optional conversion of rendered SVG into other artifact formats.
//!
//! The core never performs conversions itself. Callers register converters
//! for the formats their environment supports; a format with no converter is
//! simply unavailable.

use std::collections::HashMap;
use std::fmt;

use crate::error::ConvertError;
use crate::render::OutputFormat;

/// Turns an SVG document into one target format.
pub trait ArtifactConverter: Send + Sync {
    fn target(&self) -> OutputFormat;

    fn convert(&self, svg: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

/// Converters available to a caller, keyed by their target format.
#[derive(Default)]
pub struct Converters {
    by_format: HashMap<OutputFormat, Box<dyn ArtifactConverter>>,
}

impl Converters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter`, replacing any earlier one for the same target.
    pub fn register(&mut self, converter: Box<dyn ArtifactConverter>) -> &mut Self {
        self.by_format.insert(converter.target(), converter);
        self
    }

    pub fn with(mut self, converter: impl ArtifactConverter + 'static) -> Self {
        self.register(Box::new(converter));
        self
    }

    pub fn get(&self, format: OutputFormat) -> Option<&dyn ArtifactConverter> {
        self.by_format.get(&format).map(|c| c.as_ref())
    }

    /// Formats that can be produced: SVG plus every registered target.
    pub fn formats(&self) -> Vec<OutputFormat> {
        let mut out = vec![OutputFormat::Svg];
        out.extend(self.by_format.keys().copied().filter(|f| *f != OutputFormat::Svg));
        out.sort_by_key(|f| f.as_str());
        out
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Finished artifact handed back to the caller for streaming or storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Artifact {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}
