use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

/// Style configuration for bar layers
#[derive(Debug, Clone)]
pub struct BarStyle {
    pub color: RGBColor,
    pub alpha: f64,
    /// Bar thickness in category units (1.0 fills the whole slot)
    pub width: f64,
}

impl BarStyle {
    pub fn solid(color: RGBColor, width: f64) -> Self {
        Self {
            color,
            alpha: 1.0,
            width,
        }
    }
}

/// Axis descriptions; `None` leaves the axis undescribed
#[derive(Debug, Clone, Default)]
pub struct AxisLabels {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisLabels {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
        }
    }
}

/// One horizontal range bar: background spans [low, high], overlay spans [low, mid]
#[derive(Debug, Clone)]
pub struct RangeBar {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    pub overlay_color: RGBColor,
}

/// Donut (hollow pie) configuration
#[derive(Debug, Clone)]
pub struct DonutStyle {
    pub colors: Vec<RGBColor>,
    /// Ring thickness as a fraction of the outer radius
    pub ring_width: f64,
    /// Angle of the first slice edge, degrees counter-clockwise from 3 o'clock
    pub start_angle: f64,
}

/// Single-chart bitmap canvas
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    title: String,
}

impl Canvas {
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Canvas dimensions must be non-zero (got {}x{})", width, height);
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| anyhow::anyhow!("Canvas {}x{} is too large", width, height))?;
        let buffer = vec![0u8; len];

        Ok(Canvas {
            buffer,
            width,
            height,
            title: title.to_string(),
        })
    }

    /// Vertical bars, one per category, no grid and no top/right border
    pub fn draw_bars(
        &mut self,
        categories: &[String],
        values: &[f64],
        style: &BarStyle,
        axes: &AxisLabels,
    ) -> Result<()> {
        if categories.len() != values.len() {
            anyhow::bail!(
                "Categories and values must have the same length (categories: {}, values: {})",
                categories.len(),
                values.len()
            );
        }
        if categories.is_empty() {
            anyhow::bail!("Cannot create bar chart with no data");
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let n = categories.len();
        let y_max = padded_max(values.iter().copied());

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..y_max)
            .context("Failed to build chart")?;

        let formatter = |x: &f64| category_label(categories, *x);
        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .disable_y_mesh()
                .x_labels(n)
                .x_label_formatter(&formatter);
            if let Some(desc) = &axes.x {
                mesh.x_desc(desc.as_str());
            }
            if let Some(desc) = &axes.y {
                mesh.y_desc(desc.as_str());
            }
            mesh.draw().context("Failed to draw mesh")?;
        }

        let half = style.width / 2.0;
        chart
            .draw_series(values.iter().enumerate().map(|(idx, &v)| {
                let x = idx as f64;
                Rectangle::new(
                    [(x - half, 0.0), (x + half, v)],
                    style.color.mix(style.alpha).filled(),
                )
            }))
            .context("Failed to draw bars")?;

        root.present().context("Failed to present drawing")?;

        Ok(())
    }

    /// Horizontal range bars, categories listed bottom to top
    pub fn draw_range_bars(
        &mut self,
        categories: &[String],
        bars: &[RangeBar],
        background: &BarStyle,
        overlay_width: f64,
    ) -> Result<()> {
        if categories.len() != bars.len() {
            anyhow::bail!(
                "Categories and bars must have the same length (categories: {}, bars: {})",
                categories.len(),
                bars.len()
            );
        }
        if categories.is_empty() {
            anyhow::bail!("Cannot create range chart with no data");
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let n = categories.len();
        let x_max = padded_max(bars.iter().map(|b| b.high));

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))
            .context("Failed to build chart")?;

        let formatter = |y: &f64| category_label(categories, *y);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&formatter)
            .draw()
            .context("Failed to draw mesh")?;

        let back_half = background.width / 2.0;
        chart
            .draw_series(bars.iter().enumerate().map(|(idx, bar)| {
                let y = idx as f64;
                Rectangle::new(
                    [(bar.low, y - back_half), (bar.high, y + back_half)],
                    background.color.mix(background.alpha).filled(),
                )
            }))
            .context("Failed to draw range background")?;

        let over_half = overlay_width / 2.0;
        chart
            .draw_series(bars.iter().enumerate().map(|(idx, bar)| {
                let y = idx as f64;
                Rectangle::new(
                    [(bar.low, y - over_half), (bar.mid, y + over_half)],
                    bar.overlay_color.filled(),
                )
            }))
            .context("Failed to draw range overlay")?;

        root.present().context("Failed to present drawing")?;

        Ok(())
    }

    /// Frequency histogram from precomputed bin edges and counts
    pub fn draw_histogram(
        &mut self,
        edges: &[f64],
        counts: &[usize],
        fill: RGBColor,
        edge: RGBColor,
        axes: &AxisLabels,
    ) -> Result<()> {
        if counts.is_empty() || edges.len() != counts.len() + 1 {
            anyhow::bail!(
                "Histogram needs one more edge than bins (edges: {}, bins: {})",
                edges.len(),
                counts.len()
            );
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let x_min = edges[0];
        let x_max = edges[edges.len() - 1];
        let x_pad = (x_max - x_min) * 0.05;
        let y_max = padded_max(counts.iter().map(|&c| c as f64));

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((x_min - x_pad)..(x_max + x_pad), 0.0..y_max)
            .context("Failed to build chart")?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh().disable_y_mesh();
            if let Some(desc) = &axes.x {
                mesh.x_desc(desc.as_str());
            }
            if let Some(desc) = &axes.y {
                mesh.y_desc(desc.as_str());
            }
            mesh.draw().context("Failed to draw mesh")?;
        }

        let bins = || {
            edges
                .windows(2)
                .zip(counts)
                .map(|(w, &c)| [(w[0], 0.0), (w[1], c as f64)])
        };

        chart
            .draw_series(bins().map(|coords| Rectangle::new(coords, fill.filled())))
            .context("Failed to draw histogram bins")?;
        chart
            .draw_series(bins().map(|coords| Rectangle::new(coords, edge.stroke_width(1))))
            .context("Failed to draw histogram edges")?;

        root.present().context("Failed to present drawing")?;

        Ok(())
    }

    /// Donut chart with category labels outside and percentages inside the ring
    pub fn draw_donut(
        &mut self,
        labels: &[String],
        values: &[f64],
        percent_labels: &[String],
        style: &DonutStyle,
    ) -> Result<()> {
        if labels.len() != values.len() || labels.len() != percent_labels.len() {
            anyhow::bail!(
                "Donut labels, values and percentages must have the same length ({}, {}, {})",
                labels.len(),
                values.len(),
                percent_labels.len()
            );
        }
        if style.colors.is_empty() {
            anyhow::bail!("Donut chart needs at least one colour");
        }
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            anyhow::bail!("Cannot create donut chart with no data");
        }

        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let area = root
            .titled(&self.title, ("sans-serif", 20))
            .context("Failed to draw title")?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as f64 / 2.0, h as f64 / 2.0);
        // Leave room for the outside labels
        let radius = w.min(h) as f64 / 2.0 * 0.8;
        let inner = radius * (1.0 - style.ring_width).max(0.0);

        let label_font = ("sans-serif", 14).into_font();
        let pct_font = ("sans-serif", 13).into_font();

        let mut angle = style.start_angle;
        for (idx, &value) in values.iter().enumerate() {
            let sweep = 360.0 * value / total;
            if sweep <= 0.0 {
                continue;
            }
            let color = style.colors[idx % style.colors.len()];

            let points = annulus_sector(center, radius, inner, angle, angle + sweep);
            area.draw(&Polygon::new(points, color.filled()))
                .context("Failed to draw donut slice")?;

            let mid = angle + sweep / 2.0;
            let pct_at = polar(center, (radius + inner) / 2.0, mid);
            area.draw(&Text::new(
                percent_labels[idx].clone(),
                pct_at,
                pct_font.color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .context("Failed to draw percentage label")?;

            let label_at = polar(center, radius * 1.1, mid);
            let h_pos = if mid.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            area.draw(&Text::new(
                labels[idx].clone(),
                label_at,
                label_font.color(&BLACK).pos(Pos::new(h_pos, VPos::Center)),
            ))
            .context("Failed to draw slice label")?;

            angle += sweep;
        }

        root.present().context("Failed to present drawing")?;

        Ok(())
    }

    /// Finalize and encode the canvas as PNG
    pub fn render(self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(
                    &self.buffer,
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                )
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }
}

/// Label for a category axis tick; ticks between slots stay blank
fn category_label(categories: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper axis bound with 5% headroom, never below 1.0
fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    (max * 1.05).max(1.0)
}

/// Pixel position at `radius` and `degrees` (counter-clockwise, y grows downward)
fn polar(center: (f64, f64), radius: f64, degrees: f64) -> (i32, i32) {
    let theta = degrees * PI / 180.0;
    (
        (center.0 + radius * theta.cos()).round() as i32,
        (center.1 - radius * theta.sin()).round() as i32,
    )
}

/// Polygon outline of a ring segment between two angles
fn annulus_sector(
    center: (f64, f64),
    outer: f64,
    inner: f64,
    from_deg: f64,
    to_deg: f64,
) -> Vec<(i32, i32)> {
    let steps = ((to_deg - from_deg).abs().ceil() as usize).max(2);
    let at = |i: usize| from_deg + (to_deg - from_deg) * i as f64 / steps as f64;

    let mut points: Vec<(i32, i32)> = (0..=steps).map(|i| polar(center, outer, at(i))).collect();
    points.extend((0..=steps).rev().map(|i| polar(center, inner, at(i))));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_png(bytes: &[u8]) -> bool {
        bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canvas_rejects_zero_size() {
        assert!(Canvas::new(0, 400, "t").is_err());
    }

    #[test]
    fn test_canvas_rejects_oversized_buffer() {
        // 2^32 x 2^32 x 3 bytes does not fit any usize
        let result = Canvas::new(u32::MAX, u32::MAX, "t");
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("too large"));
    }

    #[test]
    fn test_category_label() {
        let cats = labels(&["A", "B"]);
        assert_eq!(category_label(&cats, 0.0), "A");
        assert_eq!(category_label(&cats, 1.0), "B");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, -1.0), "");
        assert_eq!(category_label(&cats, 2.0), "");
    }

    #[test]
    fn test_padded_max() {
        assert!((padded_max([10.0, 20.0].into_iter()) - 21.0).abs() < 1e-9);
        assert_eq!(padded_max(std::iter::empty()), 1.0);
    }

    #[test]
    fn test_polar_quarter_turns() {
        assert_eq!(polar((100.0, 100.0), 50.0, 0.0), (150, 100));
        assert_eq!(polar((100.0, 100.0), 50.0, 90.0), (100, 50));
        assert_eq!(polar((100.0, 100.0), 50.0, 180.0), (50, 100));
    }

    #[test]
    fn test_annulus_sector_shape() {
        let points = annulus_sector((0.0, 0.0), 10.0, 6.0, 90.0, 180.0);
        // 90 one-degree steps on each arc, both endpoints included
        assert_eq!(points.len(), 2 * 91);
        assert_eq!(points[0], (0, -10));
        assert_eq!(points[90], (-10, 0));
        assert_eq!(points[91], (-6, 0));
        assert_eq!(*points.last().unwrap(), (0, -6));
    }

    #[test]
    fn test_bars_length_mismatch() {
        let mut canvas = Canvas::new(300, 200, "t").unwrap();
        let result = canvas.draw_bars(
            &labels(&["A"]),
            &[1.0, 2.0],
            &BarStyle::solid(BLUE, 0.8),
            &AxisLabels::default(),
        );
        assert!(result.unwrap_err().to_string().contains("same length"));
    }

    #[test]
    fn test_histogram_edge_mismatch() {
        let mut canvas = Canvas::new(300, 200, "t").unwrap();
        let result = canvas.draw_histogram(&[0.0, 1.0], &[1, 2], RED, WHITE, &AxisLabels::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_donut_empty_total() {
        let mut canvas = Canvas::new(300, 200, "t").unwrap();
        let style = DonutStyle {
            colors: vec![RED],
            ring_width: 0.4,
            start_angle: 90.0,
        };
        let result = canvas.draw_donut(&labels(&["A"]), &[0.0], &labels(&["0.0%"]), &style);
        assert!(result.unwrap_err().to_string().contains("no data"));
    }

    #[test]
    fn test_render_bars_png() {
        let mut canvas = Canvas::new(300, 200, "Bars").unwrap();
        canvas
            .draw_bars(
                &labels(&["A", "B", "C"]),
                &[3.0, 1.0, 2.0],
                &BarStyle::solid(BLUE, 0.8),
                &AxisLabels::new("block", "count"),
            )
            .unwrap();
        assert!(is_png(&canvas.render().unwrap()));
    }

    #[test]
    fn test_render_donut_png() {
        let mut canvas = Canvas::new(300, 200, "Donut").unwrap();
        let style = DonutStyle {
            colors: vec![RED, GREEN, BLUE],
            ring_width: 0.4,
            start_angle: 90.0,
        };
        canvas
            .draw_donut(
                &labels(&["Ship", "Road"]),
                &[2.0, 1.0],
                &labels(&["66.7%", "33.3%"]),
                &style,
            )
            .unwrap();
        assert!(is_png(&canvas.render().unwrap()));
    }
}
