// Fill colors for dieline panels. Faces get light tints, flaps a paler
// shade of the same family so a printed sheet reads at a glance.
const PALETTE: [&str; 12] = [
    "lightblue",      // 0
    "lightgreen",     // 1
    "pink",           // 2
    "lightgray",      // 3
    "lightyellow",    // 4
    "navajowhite",    // 5
    "aliceblue",      // 6
    "honeydew",       // 7
    "lavenderblush",  // 8
    "whitesmoke",     // 9
    "lemonchiffon",   // 10
    "papayawhip",     // 11
];

/// Color for the `i`-th entry of the palette, cycling by index.
pub fn panel_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Color for a panel role tag (`front`, `top-flap`, ...).
///
/// Unknown tags fall back to a neutral gray.
pub fn role_color(tag: &str) -> &'static str {
    match tag {
        "front" => panel_color(0),
        "back" => panel_color(1),
        "left" => panel_color(2),
        "right" => panel_color(3),
        "top" => panel_color(4),
        "bottom" => panel_color(5),
        "top-flap" => panel_color(10),
        "bottom-flap" => panel_color(11),
        "glue-flap" => panel_color(9),
        _ => "gainsboro",
    }
}
