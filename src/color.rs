use std::fmt;

use eframe::egui::Color32;
use palette::Srgb;
use plotters::style::RGBColor;

/// Line colours handed out to newly opened files, in order.
pub const CYCLE_NAMES: [&str; 8] = [
    "red", "blue", "green", "black", "orange", "pink", "purple", "cyan",
];

/// Colour of the peak-only chart; distinct from every cycle entry.
pub const PEAK_COLOR_NAME: &str = "magenta";

// ---------------------------------------------------------------------------
// PlotColor – a named sRGB colour
// ---------------------------------------------------------------------------

/// A CSS colour name resolved to its sRGB value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotColor {
    name: &'static str,
    rgb: Srgb<u8>,
}

impl PlotColor {
    /// Look up a CSS colour name (`"red"`, `"cyan"`, …).
    pub fn named(name: &'static str) -> Option<Self> {
        palette::named::from_str(name).map(|rgb| PlotColor { name, rgb })
    }

    pub fn peak() -> Self {
        PlotColor {
            name: PEAK_COLOR_NAME,
            rgb: palette::named::MAGENTA,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn to_plotters(self) -> RGBColor {
        RGBColor(self.rgb.red, self.rgb.green, self.rgb.blue)
    }

    pub fn to_egui(self) -> Color32 {
        Color32::from_rgb(self.rgb.red, self.rgb.green, self.rgb.blue)
    }
}

impl fmt::Display for PlotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// ColorCycle – per-window rotation over CYCLE_NAMES
// ---------------------------------------------------------------------------

/// Hands out the next line colour each time a file is opened.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    palette: Vec<PlotColor>,
    index: usize,
}

impl Default for ColorCycle {
    fn default() -> Self {
        let palette = CYCLE_NAMES
            .iter()
            .filter_map(|&name| PlotColor::named(name))
            .collect();
        Self { palette, index: 0 }
    }
}

impl ColorCycle {
    /// Return the current colour and advance; wraps around.
    pub fn next_color(&mut self) -> PlotColor {
        let color = self.palette[self.index % self.palette.len()];
        self.index += 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cycle_name_resolves() {
        for name in CYCLE_NAMES {
            assert!(PlotColor::named(name).is_some(), "{name}");
        }
        assert!(PlotColor::named("not-a-colour").is_none());
    }

    #[test]
    fn cycle_wraps_around() {
        let mut cycle = ColorCycle::default();
        let first: Vec<_> = (0..CYCLE_NAMES.len()).map(|_| cycle.next_color().name()).collect();
        assert_eq!(first, CYCLE_NAMES.to_vec());
        assert_eq!(cycle.next_color().name(), "red");
    }

    #[test]
    fn peak_colour_is_not_in_the_cycle() {
        let peak = PlotColor::peak();
        assert_eq!(peak.to_plotters(), RGBColor(255, 0, 255));
        assert!(!CYCLE_NAMES.contains(&peak.name()));
    }
}
