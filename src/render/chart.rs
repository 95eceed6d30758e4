use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;

use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Chart style
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub font_family: &'static str,
    pub label_font_size: u32,
    pub annotation_font_size: u32,
    /// Unit printed after Y values in the annotation box.
    pub y_unit: String,
    /// Unit printed after the X threshold in the annotation box.
    pub x_unit: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: WHITE,
            font_family: "sans-serif",
            label_font_size: 18,
            annotation_font_size: 16,
            y_unit: "A".into(),
            x_unit: "s".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bundled font
// ---------------------------------------------------------------------------

/// DejaVu Sans, so chart text never depends on the fonts of the host.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Make `family` resolve to the bundled face. Re-registering replaces the
/// entry, so calling this before every render is fine.
fn register_bundled_font(family: &str) -> Result<(), RenderError> {
    register_font(family, FontStyle::Normal, BUNDLED_FONT)
        .map_err(|_| RenderError::Draw("bundled font is not a valid TrueType file".into()))
}

// ---------------------------------------------------------------------------
// Line chart description
// ---------------------------------------------------------------------------

/// Everything needed to draw one single-series chart.
pub struct LineChart<'a> {
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    /// Start the X axis at 0 instead of the first sample.
    pub floor_x: bool,
    /// Text lines for the upper-left annotation box.
    pub annotation: Option<Vec<String>>,
}

/// Draw a line chart into memory and return it PNG-encoded.
///
/// The Y axis always starts at 0 and no grid is drawn. Non-finite samples
/// are left out.
pub fn render_line_png(chart: &LineChart<'_>, style: &ChartStyle) -> Result<Vec<u8>, RenderError> {
    register_bundled_font(style.font_family)?;

    let points: Vec<(f64, f64)> = chart
        .points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let (x_range, y_range) = axis_ranges(&points, chart.floor_x);

    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;

        let mut ctx = ChartBuilder::on(&root)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 90)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(x_range, y_range)?;

        let label_font = (style.font_family, style.label_font_size)
            .into_font()
            .color(&BLACK);
        ctx.configure_mesh()
            .disable_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_label_formatter(&|v| format_tick(*v))
            .y_label_formatter(&|v| format_tick(*v))
            .label_style(label_font.clone())
            .axis_desc_style(label_font)
            .axis_style(BLACK)
            .draw()?;

        ctx.draw_series(LineSeries::new(points, &chart.color))?;

        if let Some(lines) = &chart.annotation {
            draw_annotation(&ctx.plotting_area().strip_coord_spec(), lines, style)?;
        }

        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

/// X from the first sample (or 0) to the last; Y from 0 to the maximum plus
/// a little headroom. Degenerate spans are widened so the axis stays drawable.
fn axis_ranges(points: &[(f64, f64)], floor_x: bool) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let x_lo = if floor_x || !x_min.is_finite() { 0.0 } else { x_min };
    let mut x_hi = if x_max.is_finite() { x_max } else { 1.0 };
    if x_hi <= x_lo {
        x_hi = x_lo + 1.0;
    }

    let y_hi = if y_max.is_finite() && y_max > 0.0 {
        y_max * 1.05
    } else {
        1.0
    };

    (x_lo..x_hi, 0.0..y_hi)
}

fn draw_annotation(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    lines: &[String],
    style: &ChartStyle,
) -> Result<(), RenderError> {
    const PAD: i32 = 8;
    const LINE_GAP: i32 = 4;

    let font = (style.font_family, style.annotation_font_size)
        .into_font()
        .color(&BLACK);

    let mut text_w = 0i32;
    let mut line_h = 0i32;
    for line in lines {
        let (w, h) = area.estimate_text_size(line, &font)?;
        text_w = text_w.max(w as i32);
        line_h = line_h.max(h as i32);
    }

    // Anchored at 5% from the left and top edges of the plotting area.
    let (area_w, area_h) = area.dim_in_pixel();
    let x0 = (area_w as f64 * 0.05) as i32;
    let y0 = (area_h as f64 * 0.05) as i32;
    let n = lines.len() as i32;
    let corner = (
        x0 + text_w + 2 * PAD,
        y0 + n * line_h + (n - 1).max(0) * LINE_GAP + 2 * PAD,
    );

    area.draw(&Rectangle::new([(x0, y0), corner], WHITE.mix(0.7).filled()))?;
    area.draw(&Rectangle::new([(x0, y0), corner], BLACK.mix(0.4).stroke_width(1)))?;
    for (i, line) in lines.iter().enumerate() {
        let y = y0 + PAD + i as i32 * (line_h + LINE_GAP);
        area.draw(&Text::new(line.as_str(), (x0 + PAD, y), font.clone()))?;
    }
    Ok(())
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| RenderError::Draw("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Scientific notation with a signed, two-digit exponent: `2.500e-06`.
pub fn format_sci(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => s,
    }
}

/// Axis tick text: scientific for very small or large magnitudes.
fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".into()
    } else if !(1e-3..1e4).contains(&a) {
        format_sci(v, 1)
    } else {
        format!("{v:.2}")
    }
}
