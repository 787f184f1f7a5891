//! Value types shared by the generator, the closure check and the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DielineError;
use crate::geometry::Rect;

/// Outer box dimensions in centimeters.
///
/// Only constructible through [`Dimensions::new`], so a value of this type is
/// always finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Dimensions {
    length: f64,
    breadth: f64,
    height: f64,
}

impl Dimensions {
    pub fn new(length: f64, breadth: f64, height: f64) -> Result<Self, DielineError> {
        for (name, value) in [("length", length), ("breadth", breadth), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DielineError::InvalidDimension { name, value });
            }
        }
        Ok(Dimensions {
            length,
            breadth,
            height,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }
    pub fn breadth(&self) -> f64 {
        self.breadth
    }
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Unfold pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Style {
    /// Regular slotted container: four faces in a row, half-breadth flaps.
    #[default]
    RscStandard,
    /// One column (lid, front, bottom, back) with the ends folding off the front.
    FrontBackStacked,
    /// Six separate faces on a two-row sheet.
    SixPanelCompact,
}

impl Style {
    pub const ALL: [Style; 3] = [
        Style::RscStandard,
        Style::FrontBackStacked,
        Style::SixPanelCompact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::RscStandard => "RSC_STANDARD",
            Style::FrontBackStacked => "FRONT_BACK_STACKED",
            Style::SixPanelCompact => "SIX_PANEL_COMPACT",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = DielineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "rsc" | "rsc_standard" => Ok(Style::RscStandard),
            "stacked" | "front_back_stacked" => Ok(Style::FrontBackStacked),
            "compact" | "six_panel" | "six_panel_compact" => Ok(Style::SixPanelCompact),
            _ => Err(DielineError::UnsupportedStyle {
                name: s.to_string(),
            }),
        }
    }
}

/// Board material recorded with a design. Never affects geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Cardboard,
    Plastic,
    Metal,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Material::Cardboard => "Cardboard",
            Material::Plastic => "Plastic",
            Material::Metal => "Metal",
        })
    }
}

impl FromStr for Material {
    type Err = DielineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cardboard" => Ok(Material::Cardboard),
            "plastic" => Ok(Material::Plastic),
            "metal" => Ok(Material::Metal),
            _ => Err(DielineError::InvalidOption {
                name: "material",
                reason: format!("unknown material '{s}'"),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelRole {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    TopFlap,
    BottomFlap,
    GlueFlap,
}

impl PanelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelRole::Front => "front",
            PanelRole::Back => "back",
            PanelRole::Left => "left",
            PanelRole::Right => "right",
            PanelRole::Top => "top",
            PanelRole::Bottom => "bottom",
            PanelRole::TopFlap => "top-flap",
            PanelRole::BottomFlap => "bottom-flap",
            PanelRole::GlueFlap => "glue-flap",
        }
    }
}

impl fmt::Display for PanelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an edge is treated on the cutting table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Fold,
    Cut,
    Glue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub top: EdgeKind,
    pub right: EdgeKind,
    pub bottom: EdgeKind,
    pub left: EdgeKind,
}

impl Edges {
    pub const CUT: Edges = Edges {
        top: EdgeKind::Cut,
        right: EdgeKind::Cut,
        bottom: EdgeKind::Cut,
        left: EdgeKind::Cut,
    };

    pub fn with_top(mut self, k: EdgeKind) -> Self {
        self.top = k;
        self
    }
    pub fn with_right(mut self, k: EdgeKind) -> Self {
        self.right = k;
        self
    }
    pub fn with_bottom(mut self, k: EdgeKind) -> Self {
        self.bottom = k;
        self
    }
    pub fn with_left(mut self, k: EdgeKind) -> Self {
        self.left = k;
        self
    }

    /// Edges in `top, right, bottom, left` order, paired with their names.
    pub fn sides(&self) -> [(&'static str, EdgeKind); 4] {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
    }
}

/// One rectangular region of a dieline, in layout units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    pub role: PanelRole,
    pub rect: Rect,
    pub edges: Edges,
}

/// Generated dieline: panels plus the tight box around them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub style: Style,
    pub dimensions: Dimensions,
    pub scale: f64,
    pub panels: Vec<PanelSpec>,
    pub bounding_box: Rect,
}

impl Layout {
    pub fn panel(&self, id: &str) -> Option<&PanelSpec> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panels_with_role(&self, role: PanelRole) -> impl Iterator<Item = &PanelSpec> {
        self.panels.iter().filter(move |p| p.role == role)
    }
}
