//! Checks that a layout folds back into the box it was generated for.
//!
//! The check is structural: panels must not overlap, every fold edge must be
//! shared with exactly one neighbor, glue edges must pair up, every face of
//! the box must be present at the right size (or fully covered by flaps) and
//! a folded sheet must be a single piece.

use std::collections::VecDeque;

use crate::error::ClosureError;
use crate::geometry::{Rect, approx_eq};
use crate::model::{EdgeKind, Layout, PanelRole, PanelSpec};

pub fn check_closure(layout: &Layout) -> Result<(), ClosureError> {
    check_overlap(&layout.panels)?;
    let adjacency = fold_adjacency(&layout.panels)?;
    check_glue(&layout.panels)?;
    check_faces(layout)?;
    if adjacency.iter().any(|n| !n.is_empty()) {
        check_connected(&layout.panels, &adjacency)?;
    }
    Ok(())
}

fn check_overlap(panels: &[PanelSpec]) -> Result<(), ClosureError> {
    for (i, a) in panels.iter().enumerate() {
        for b in &panels[i + 1..] {
            let shared = a.rect.overlap_area(&b.rect);
            let tol = 1e-9 * a.rect.size.area().max(b.rect.size.area());
            if shared > tol {
                return Err(ClosureError::Overlap {
                    a: a.id.clone(),
                    b: b.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Edge of `r` on side `side` expressed as (fixed coordinate, start, end).
fn segment(r: &Rect, side: &str) -> (f64, f64, f64) {
    match side {
        "top" => (r.min_y(), r.min_x(), r.max_x()),
        "bottom" => (r.max_y(), r.min_x(), r.max_x()),
        "left" => (r.min_x(), r.min_y(), r.max_y()),
        _ => (r.max_x(), r.min_y(), r.max_y()),
    }
}

fn opposite(side: &str) -> &'static str {
    match side {
        "top" => "bottom",
        "bottom" => "top",
        "left" => "right",
        _ => "left",
    }
}

fn edge_kind(p: &PanelSpec, side: &str) -> EdgeKind {
    match side {
        "top" => p.edges.top,
        "bottom" => p.edges.bottom,
        "left" => p.edges.left,
        _ => p.edges.right,
    }
}

fn fold_adjacency(panels: &[PanelSpec]) -> Result<Vec<Vec<usize>>, ClosureError> {
    let mut adjacency = vec![Vec::new(); panels.len()];
    for (i, p) in panels.iter().enumerate() {
        for (side, kind) in p.edges.sides() {
            if kind != EdgeKind::Fold {
                continue;
            }
            let (at, from, to) = segment(&p.rect, side);
            let other_side = opposite(side);
            let partners: Vec<usize> = panels
                .iter()
                .enumerate()
                .filter(|(j, q)| {
                    if *j == i || edge_kind(q, other_side) != EdgeKind::Fold {
                        return false;
                    }
                    let (q_at, q_from, q_to) = segment(&q.rect, other_side);
                    approx_eq(at, q_at) && approx_eq(from, q_from) && approx_eq(to, q_to)
                })
                .map(|(j, _)| j)
                .collect();
            if partners.len() != 1 {
                return Err(ClosureError::UnpairedFold {
                    panel: p.id.clone(),
                    side,
                    partners: partners.len(),
                });
            }
            adjacency[i].extend(partners);
        }
    }
    Ok(adjacency)
}

fn check_glue(panels: &[PanelSpec]) -> Result<(), ClosureError> {
    let mut lengths: Vec<f64> = panels
        .iter()
        .flat_map(|p| {
            p.edges.sides().into_iter().filter_map(move |(side, kind)| {
                (kind == EdgeKind::Glue).then(|| {
                    let (_, from, to) = segment(&p.rect, side);
                    to - from
                })
            })
        })
        .collect();
    lengths.sort_by(f64::total_cmp);
    for pair in lengths.chunks(2) {
        match pair {
            [a, b] if approx_eq(*a, *b) => {}
            [a, ..] => return Err(ClosureError::UnpairedGlue { length: *a }),
            [] => {}
        }
    }
    Ok(())
}

struct Face {
    name: &'static str,
    role: PanelRole,
    flap: Option<PanelRole>,
    w: f64,
    h: f64,
}

fn check_faces(layout: &Layout) -> Result<(), ClosureError> {
    let d = &layout.dimensions;
    let (l, b, h) = (
        d.length() * layout.scale,
        d.breadth() * layout.scale,
        d.height() * layout.scale,
    );
    let faces = [
        Face { name: "front", role: PanelRole::Front, flap: None, w: l, h },
        Face { name: "back", role: PanelRole::Back, flap: None, w: l, h },
        Face { name: "left", role: PanelRole::Left, flap: None, w: b, h },
        Face { name: "right", role: PanelRole::Right, flap: None, w: b, h },
        Face { name: "top", role: PanelRole::Top, flap: Some(PanelRole::TopFlap), w: l, h: b },
        Face { name: "bottom", role: PanelRole::Bottom, flap: Some(PanelRole::BottomFlap), w: l, h: b },
    ];

    for face in &faces {
        let mut covered = 0.0;
        for p in layout.panels_with_role(face.role) {
            let (pw, ph) = (p.rect.size.width, p.rect.size.height);
            let upright = approx_eq(pw, face.w) && approx_eq(ph, face.h);
            let turned = approx_eq(pw, face.h) && approx_eq(ph, face.w);
            if !upright && !turned {
                return Err(ClosureError::FaceSize {
                    panel: p.id.clone(),
                    width: pw,
                    height: ph,
                    expected_w: face.w,
                    expected_h: face.h,
                });
            }
            covered += p.rect.size.area();
        }
        if let Some(flap) = face.flap {
            covered += layout
                .panels_with_role(flap)
                .map(|p| p.rect.size.area())
                .sum::<f64>();
        }
        let required = face.w * face.h;
        if covered < required && !approx_eq(covered, required) {
            return Err(ClosureError::Uncovered {
                face: face.name,
                covered,
                required,
            });
        }
    }
    Ok(())
}

fn check_connected(panels: &[PanelSpec], adjacency: &[Vec<usize>]) -> Result<(), ClosureError> {
    let start = panels
        .iter()
        .position(|p| p.role == PanelRole::Front)
        .unwrap_or(0);
    let mut seen = vec![false; panels.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(i) = queue.pop_front() {
        for &j in &adjacency[i] {
            if !seen[j] {
                seen[j] = true;
                queue.push_back(j);
            }
        }
    }
    match seen.iter().position(|s| !s) {
        Some(i) => Err(ClosureError::Detached {
            panel: panels[i].id.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use crate::model::{Dimensions, Edges, Style};

    fn layout(style: Style) -> Layout {
        generate(Dimensions::new(20.0, 10.0, 15.0).unwrap(), style, 10.0).unwrap()
    }

    #[test]
    fn generated_styles_close() {
        for style in Style::ALL {
            assert_eq!(check_closure(&layout(style)), Ok(()), "{style}");
        }
    }

    #[test]
    fn shifted_flap_breaks_fold_pairing() {
        let mut l = layout(Style::RscStandard);
        let idx = l.panels.iter().position(|p| p.id == "back-top-flap").unwrap();
        l.panels[idx].rect = l.panels[idx].rect.translate(0.0, -5.0);
        assert!(matches!(
            check_closure(&l),
            Err(ClosureError::UnpairedFold { .. })
        ));
    }

    #[test]
    fn overlapping_panels_detected() {
        let mut l = layout(Style::SixPanelCompact);
        let front = l.panel("front").unwrap().rect;
        l.panels[1].rect = front.translate(10.0, 10.0);
        assert!(matches!(check_closure(&l), Err(ClosureError::Overlap { .. })));
    }

    #[test]
    fn missing_face_is_uncovered() {
        let mut l = layout(Style::SixPanelCompact);
        l.panels.retain(|p| p.id != "bottom");
        assert!(matches!(
            check_closure(&l),
            Err(ClosureError::Uncovered { face: "bottom", .. })
        ));
    }

    #[test]
    fn wrong_face_size_detected() {
        let mut l = layout(Style::SixPanelCompact);
        let idx = l.panels.iter().position(|p| p.id == "left").unwrap();
        l.panels[idx].rect.size.width += 1.0;
        assert!(matches!(check_closure(&l), Err(ClosureError::FaceSize { .. })));
    }

    #[test]
    fn lone_glue_edge_detected() {
        let mut l = layout(Style::RscStandard);
        let idx = l.panels.iter().position(|p| p.id == "left").unwrap();
        l.panels[idx].edges = l.panels[idx].edges.with_right(EdgeKind::Cut);
        assert!(matches!(
            check_closure(&l),
            Err(ClosureError::UnpairedGlue { .. })
        ));
    }

    #[test]
    fn detached_piece_detected() {
        let mut l = layout(Style::FrontBackStacked);
        // Cut the back (and its glue flaps) loose from the bottom panel.
        for p in l.panels.iter_mut() {
            match p.id.as_str() {
                "bottom" => p.edges = Edges::CUT.with_top(EdgeKind::Fold),
                "back" => p.edges = p.edges.with_top(EdgeKind::Cut),
                _ => {}
            }
        }
        assert!(matches!(check_closure(&l), Err(ClosureError::Detached { .. })));
    }
}
