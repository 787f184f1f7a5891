/// Library-wide numeric defaults.
/// Physical values are in centimeters, layout values in layout units.
pub const DEFAULT_SCALE: f64 = 10.0;
/// Blank border around the drawing on every side (layout units).
pub const DEFAULT_MARGIN: f64 = 20.0;
pub const DEFAULT_FONT_SIZE: f64 = 15.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
/// Glue flap width as a fraction of the breadth.
pub const GLUE_FLAP_RATIO: f64 = 0.5;
/// Separation between pieces of the compact six-panel sheet (cm, scaled with the layout).
pub const COMPACT_GAP_CM: f64 = 2.0;
/// Tolerance for comparing layout coordinates.
pub const EPS: f64 = 1e-9;
