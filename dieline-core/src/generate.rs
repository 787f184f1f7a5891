//! Dieline generation.
//!
//! Every style places its first panel at a fixed origin and derives each
//! following panel from the rectangle of a neighbor that is already on the
//! sheet (`max_x`, `min_y - h`, ...). Shared edges therefore coincide exactly
//! and panels never overlap. Coordinates stay `f64` throughout; rounding
//! happens only when a renderer writes them out.

use tracing::debug;

use crate::constants::{COMPACT_GAP_CM, GLUE_FLAP_RATIO};
use crate::error::DielineError;
use crate::geometry::{Rect, bounds_of_all};
use crate::model::{Dimensions, EdgeKind, Edges, Layout, PanelRole, PanelSpec, Style};

use EdgeKind::{Fold, Glue};

/// Build the unfolded layout of a box.
///
/// `scale` converts centimeters into layout units and must be finite and
/// positive. The returned bounding box is tight; margins belong to the renderer.
pub fn generate(dimensions: Dimensions, style: Style, scale: f64) -> Result<Layout, DielineError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(DielineError::InvalidScale { value: scale });
    }
    let scaled = Scaled {
        l: dimensions.length() * scale,
        b: dimensions.breadth() * scale,
        h: dimensions.height() * scale,
        scale,
    };
    // Valid dimensions and scale can still multiply out of f64 range.
    if [scaled.l, scaled.b, scaled.h]
        .iter()
        .any(|v| !v.is_finite() || *v <= 0.0)
    {
        return Err(DielineError::InvalidScale { value: scale });
    }

    let panels = match style {
        Style::RscStandard => rsc_standard(&scaled),
        Style::FrontBackStacked => front_back_stacked(&scaled),
        Style::SixPanelCompact => six_panel_compact(&scaled),
    };
    // Cursor sums and halved flaps can overflow or underflow on their own.
    if let Some(p) = panels.iter().find(|p| !p.rect.is_drawable()) {
        debug!(style = %style, panel = %p.id, rect = ?p.rect, "layout leaves f64 range");
        return Err(DielineError::InvalidScale { value: scale });
    }
    let bounding_box = bounds_of_all(panels.iter().map(|p| &p.rect)).unwrap_or_default();
    debug!(
        style = %style,
        panels = panels.len(),
        width = bounding_box.size.width,
        height = bounding_box.size.height,
        "generated dieline"
    );

    Ok(Layout {
        style,
        dimensions,
        scale,
        panels,
        bounding_box,
    })
}

/// Dimensions already multiplied by the scale.
struct Scaled {
    l: f64,
    b: f64,
    h: f64,
    scale: f64,
}

#[derive(Default)]
struct Sheet {
    panels: Vec<PanelSpec>,
}

impl Sheet {
    fn place(&mut self, id: impl Into<String>, role: PanelRole, rect: Rect, edges: Edges) -> Rect {
        self.panels.push(PanelSpec {
            id: id.into(),
            role,
            rect,
            edges,
        });
        rect
    }
}

// front | right | back | left, each face with a half-breadth flap above and below.
fn rsc_standard(s: &Scaled) -> Vec<PanelSpec> {
    let flap_h = s.b / 2.0;
    let faces = [
        ("front", PanelRole::Front, s.l),
        ("right", PanelRole::Right, s.b),
        ("back", PanelRole::Back, s.l),
        ("left", PanelRole::Left, s.b),
    ];
    let last = faces.len() - 1;

    let mut sheet = Sheet::default();
    let mut x = 0.0;
    for (i, (id, role, w)) in faces.into_iter().enumerate() {
        // The free ends of the row meet at the manufacturer's joint.
        let edges = Edges {
            top: Fold,
            right: if i == last { Glue } else { Fold },
            bottom: Fold,
            left: if i == 0 { Glue } else { Fold },
        };
        let face = sheet.place(id, role, Rect::new(x, flap_h, w, s.h), edges);
        sheet.place(
            format!("{id}-top-flap"),
            PanelRole::TopFlap,
            Rect::new(face.min_x(), face.min_y() - flap_h, w, flap_h),
            Edges::CUT.with_bottom(Fold),
        );
        sheet.place(
            format!("{id}-bottom-flap"),
            PanelRole::BottomFlap,
            Rect::new(face.min_x(), face.max_y(), w, flap_h),
            Edges::CUT.with_top(Fold),
        );
        x = face.max_x();
    }
    sheet.panels
}

// Column at x = b: tuck, lid, front, bottom, back. Ends hang off the front,
// glue flaps off the back.
fn front_back_stacked(s: &Scaled) -> Vec<PanelSpec> {
    let glue_w = s.b * GLUE_FLAP_RATIO;
    let mut sheet = Sheet::default();

    let tuck = sheet.place(
        "tuck-flap",
        PanelRole::TopFlap,
        Rect::new(s.b, 0.0, s.l, s.b / 2.0),
        Edges::CUT.with_bottom(Fold),
    );
    let lid = sheet.place(
        "top",
        PanelRole::Top,
        Rect::new(tuck.min_x(), tuck.max_y(), s.l, s.b),
        Edges::CUT.with_top(Fold).with_bottom(Fold),
    );
    let front = sheet.place(
        "front",
        PanelRole::Front,
        Rect::new(lid.min_x(), lid.max_y(), s.l, s.h),
        Edges {
            top: Fold,
            right: Fold,
            bottom: Fold,
            left: Fold,
        },
    );
    sheet.place(
        "left",
        PanelRole::Left,
        Rect::new(front.min_x() - s.b, front.min_y(), s.b, s.h),
        Edges::CUT.with_right(Fold),
    );
    sheet.place(
        "right",
        PanelRole::Right,
        Rect::new(front.max_x(), front.min_y(), s.b, s.h),
        Edges::CUT.with_left(Fold),
    );
    let bottom = sheet.place(
        "bottom",
        PanelRole::Bottom,
        Rect::new(front.min_x(), front.max_y(), s.l, s.b),
        Edges::CUT.with_top(Fold).with_bottom(Fold),
    );
    let back = sheet.place(
        "back",
        PanelRole::Back,
        Rect::new(bottom.min_x(), bottom.max_y(), s.l, s.h),
        Edges::CUT.with_top(Fold).with_right(Fold).with_left(Fold),
    );
    sheet.place(
        "back-glue-flap-left",
        PanelRole::GlueFlap,
        Rect::new(back.min_x() - glue_w, back.min_y(), glue_w, s.h),
        Edges::CUT.with_right(Fold),
    );
    sheet.place(
        "back-glue-flap-right",
        PanelRole::GlueFlap,
        Rect::new(back.max_x(), back.min_y(), glue_w, s.h),
        Edges::CUT.with_left(Fold),
    );
    sheet.panels
}

// Two rows of loose faces. The gap is sheet spacing only, scaled with the
// layout; it is never part of the box.
fn six_panel_compact(s: &Scaled) -> Vec<PanelSpec> {
    let gap = COMPACT_GAP_CM * s.scale;
    let mut sheet = Sheet::default();

    let front = sheet.place(
        "front",
        PanelRole::Front,
        Rect::new(0.0, 0.0, s.l, s.h),
        Edges::CUT,
    );
    sheet.place(
        "back",
        PanelRole::Back,
        Rect::new(front.max_x() + gap, front.min_y(), s.l, s.h),
        Edges::CUT,
    );

    let row_y = front.max_y() + gap;
    let mut x = front.min_x();
    for (id, role, w, h) in [
        ("left", PanelRole::Left, s.b, s.h),
        ("right", PanelRole::Right, s.b, s.h),
        ("top", PanelRole::Top, s.l, s.b),
        ("bottom", PanelRole::Bottom, s.l, s.b),
    ] {
        let r = sheet.place(id, role, Rect::new(x, row_y, w, h), Edges::CUT);
        x = r.max_x() + gap;
    }
    sheet.panels
}
