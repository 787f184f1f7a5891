use dieline_core::{
    BoxLayoutRequest, Converters, DielineError, Dimensions, EdgeKind, Layout, OutputFormat,
    PanelRole, RenderOptions, Style, generate, produce_artifact, render,
};

fn reference(style: Style) -> Layout {
    generate(Dimensions::new(20.0, 10.0, 15.0).unwrap(), style, 10.0).unwrap()
}

fn svg_text(layout: &Layout, options: &RenderOptions) -> String {
    String::from_utf8(render(layout, OutputFormat::Svg, options).unwrap()).unwrap()
}

fn attr_f64(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name).unwrap().parse().unwrap()
}

fn group<'a, 'i>(doc: &'a roxmltree::Document<'i>, id: &str) -> roxmltree::Node<'a, 'i> {
    doc.descendants()
        .find(|n| n.has_tag_name("g") && n.attribute("id") == Some(id))
        .unwrap()
}

#[test]
fn reference_rsc_box() {
    let layout = reference(Style::RscStandard);
    assert_eq!(layout.panels.len(), 12);

    for id in ["front", "back"] {
        let r = layout.panel(id).unwrap().rect;
        assert_eq!((r.size.width, r.size.height), (200.0, 150.0), "{id}");
    }
    for id in ["front-top-flap", "back-top-flap"] {
        let r = layout.panel(id).unwrap().rect;
        assert_eq!((r.size.width, r.size.height), (200.0, 50.0), "{id}");
    }
    assert_eq!(layout.panels_with_role(PanelRole::TopFlap).count(), 4);
    assert_eq!(layout.panels_with_role(PanelRole::BottomFlap).count(), 4);
}

#[test]
fn one_rect_and_label_per_panel() {
    for style in Style::ALL {
        let layout = reference(style);
        let text = svg_text(&layout, &RenderOptions::default());
        let doc = roxmltree::Document::parse(&text).unwrap();

        let rects: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("rect")).collect();
        assert_eq!(rects.len(), layout.panels.len(), "{style}");

        let labels: Vec<_> = group(&doc, "labels")
            .children()
            .filter(|n| n.has_tag_name("text"))
            .filter_map(|n| n.text())
            .collect();
        for p in &layout.panels {
            assert!(labels.contains(&p.id.as_str()), "{style}: no label for {}", p.id);
        }
    }
}

#[test]
fn canvas_holds_bbox_and_margin() {
    let options = RenderOptions {
        margin: 35.0,
        ..RenderOptions::default()
    };
    for style in Style::ALL {
        let layout = reference(style);
        let text = svg_text(&layout, &options);
        let doc = roxmltree::Document::parse(&text).unwrap();
        let root = doc.root_element();
        let w = attr_f64(root, "width");
        let h = attr_f64(root, "height");
        assert!(w >= layout.bounding_box.size.width + 70.0, "{style}");
        assert!(h >= layout.bounding_box.size.height + 70.0, "{style}");

        for r in doc.descendants().filter(|n| n.has_tag_name("rect")) {
            let x = attr_f64(r, "x");
            let y = attr_f64(r, "y");
            assert!(x >= 35.0 - 0.01 && y >= 35.0 - 0.01);
            assert!(x + attr_f64(r, "width") <= w - 35.0 + 0.01);
            assert!(y + attr_f64(r, "height") <= h - 35.0 + 0.01);
        }
    }
}

#[test]
fn each_fold_drawn_once() {
    for style in Style::ALL {
        let layout = reference(style);
        let fold_edges: usize = layout
            .panels
            .iter()
            .map(|p| p.edges.sides().iter().filter(|(_, k)| *k == EdgeKind::Fold).count())
            .sum();
        let text = svg_text(&layout, &RenderOptions::default());
        let doc = roxmltree::Document::parse(&text).unwrap();
        let lines = group(&doc, "folds")
            .children()
            .filter(|n| n.has_tag_name("line"))
            .count();
        assert_eq!(lines * 2, fold_edges, "{style}");
    }
}

#[test]
fn compact_has_no_folds() {
    let layout = reference(Style::SixPanelCompact);
    let text = svg_text(&layout, &RenderOptions::default());
    let doc = roxmltree::Document::parse(&text).unwrap();
    assert_eq!(doc.descendants().filter(|n| n.has_tag_name("line")).count(), 0);
}

#[test]
fn unfilled_panels() {
    let options = RenderOptions {
        fill_panels: false,
        ..RenderOptions::default()
    };
    let text = svg_text(&reference(Style::RscStandard), &options);
    let doc = roxmltree::Document::parse(&text).unwrap();
    assert!(
        doc.descendants()
            .filter(|n| n.has_tag_name("rect"))
            .all(|n| n.attribute("fill") == Some("none"))
    );
}

#[test]
fn caption_lines_listed() {
    let mut req = BoxLayoutRequest::new(20.0, 10.0, 15.0);
    req.caption = true;
    let a = produce_artifact(&req, &Converters::new(), &RenderOptions::default()).unwrap();
    let text = String::from_utf8(a.bytes).unwrap();
    let doc = roxmltree::Document::parse(&text).unwrap();
    let lines: Vec<_> = group(&doc, "caption")
        .children()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(
        lines,
        vec![
            "Length: 20 cm",
            "Breadth: 10 cm",
            "Height: 15 cm",
            "Material: Cardboard",
            "Style: RSC_STANDARD",
        ]
    );
}

#[test]
fn cdr_request_fails_without_output() {
    let mut req = BoxLayoutRequest::new(20.0, 10.0, 15.0);
    req.format = "cdr".into();
    let err = produce_artifact(&req, &Converters::new(), &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, DielineError::UnsupportedFormat { .. }));

    let layout = reference(Style::RscStandard);
    assert!(matches!(
        render(&layout, OutputFormat::Cdr, &RenderOptions::default()),
        Err(DielineError::UnsupportedFormat { .. })
    ));
}

#[test]
fn small_panels_keep_their_size() {
    let layout = generate(Dimensions::new(0.1, 0.1, 0.1).unwrap(), Style::RscStandard, 0.01).unwrap();
    let text = svg_text(&layout, &RenderOptions::default());
    let doc = roxmltree::Document::parse(&text).unwrap();
    for r in doc.descendants().filter(|n| n.has_tag_name("rect")) {
        let id = r.attribute("id").unwrap();
        let expected = layout.panel(id).unwrap().rect.size;
        let (w, h) = (attr_f64(r, "width"), attr_f64(r, "height"));
        assert!(w > 0.0 && h > 0.0, "{id} collapsed to {w}x{h}");
        assert!((w - expected.width).abs() <= 1e-5 * expected.width, "{id}: {w}");
        assert!((h - expected.height).abs() <= 1e-5 * expected.height, "{id}: {h}");
    }
}
