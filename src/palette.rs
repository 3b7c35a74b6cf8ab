use plotters::style::RGBColor;

// Named colours used by the dashboard charts (CSS/X11 values)
pub const CORNFLOWER_BLUE: RGBColor = RGBColor(100, 149, 237);
pub const MEDIUM_SEA_GREEN: RGBColor = RGBColor(60, 179, 113);
pub const GOLDENROD: RGBColor = RGBColor(218, 165, 32);
pub const SLATE_BLUE: RGBColor = RGBColor(106, 90, 205);
pub const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
pub const SEA_GREEN: RGBColor = RGBColor(46, 139, 87);
pub const TOMATO: RGBColor = RGBColor(255, 99, 71);
pub const CORAL: RGBColor = RGBColor(255, 127, 80);

/// Slice colours of the shipment-mode donut, cycled when there are more slices
pub const DONUT_CYCLE: [RGBColor; 3] = [MEDIUM_SEA_GREEN, GOLDENROD, SLATE_BLUE];

/// Colour for the i-th donut slice
pub fn donut_color(index: usize) -> RGBColor {
    DONUT_CYCLE[index % DONUT_CYCLE.len()]
}
