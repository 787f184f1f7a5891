//! Parametric box dielines.
//!
//! [`generate`] unfolds a box of given [`Dimensions`] into a [`Layout`] of
//! rectangular panels for one of the supported [`Style`]s, [`render`] draws
//! it as SVG, and [`produce_artifact`] runs the whole request pipeline,
//! handing non-SVG formats to caller-supplied [`ArtifactConverter`]s.
//!
//! Everything here is pure: no files, no processes, no shared state.
//!
//! ```
//! use dieline_core::{Dimensions, OutputFormat, RenderOptions, Style, generate, render};
//!
//! let dims = Dimensions::new(20.0, 10.0, 15.0)?;
//! let layout = generate(dims, Style::RscStandard, 10.0)?;
//! assert_eq!(layout.panels.len(), 12);
//! let svg = render(&layout, OutputFormat::Svg, &RenderOptions::default())?;
//! assert!(svg.starts_with(b"<?xml"));
//! # Ok::<(), dieline_core::DielineError>(())
//! ```

pub mod closure;
pub mod constants;
pub mod convert;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod model;
pub mod render;
pub mod request;

pub use closure::check_closure;
pub use convert::{Artifact, ArtifactConverter, Converters};
pub use error::{ClosureError, ConvertError, DielineError};
pub use generate::generate;
pub use geometry::{Point, Rect, Size};
pub use model::{Dimensions, EdgeKind, Edges, Layout, Material, PanelRole, PanelSpec, Style};
pub use render::{OutputFormat, RenderOptions, render};
pub use request::{BoxLayoutRequest, ValidRequest, produce_artifact};
