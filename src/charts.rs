// Renderers: one aggregation result in, PNG bytes out

use crate::aggregate::{self, CategoryCount, Histogram, RatingRange};
use crate::graph::{AxisLabels, BarStyle, Canvas, DonutStyle, RangeBar};
use crate::palette;
use crate::RenderOptions;
use anyhow::Result;
use plotters::prelude::WHITE;

pub const WAREHOUSE_FILE: &str = "shipping_per_warehouse.png";
pub const MODE_FILE: &str = "mode_of_shipment.png";
pub const RATING_FILE: &str = "average_customer_rating.png";
pub const WEIGHT_FILE: &str = "weight_distribution.png";

pub const WAREHOUSE_TITLE: &str = "Shipping per Warehouse";
pub const MODE_TITLE: &str = "Mode of Shipment";
pub const RATING_TITLE: &str = "Average Customer Rating";
pub const WEIGHT_TITLE: &str = "Weight Distribution";

/// Bar chart of shipments per warehouse block
pub fn render_warehouse_chart(counts: &[CategoryCount], options: &RenderOptions) -> Result<Vec<u8>> {
    let (labels, values) = split_counts(counts);

    let mut canvas = Canvas::new(options.width, options.height, WAREHOUSE_TITLE)?;
    canvas.draw_bars(
        &labels,
        &values,
        &BarStyle::solid(palette::CORNFLOWER_BLUE, 0.5),
        &AxisLabels::new("Warehouse Block", "Record count"),
    )?;
    canvas.render()
}

/// Donut chart of the shipment mode split
pub fn render_mode_chart(counts: &[CategoryCount], options: &RenderOptions) -> Result<Vec<u8>> {
    let (labels, values) = split_counts(counts);
    let percent_labels: Vec<String> = aggregate::shares(counts)
        .into_iter()
        .map(aggregate::format_share)
        .collect();

    let style = DonutStyle {
        colors: palette::DONUT_CYCLE.to_vec(),
        ring_width: 0.4,
        start_angle: 90.0,
    };

    let mut canvas = Canvas::new(options.width, options.height, MODE_TITLE)?;
    canvas.draw_donut(&labels, &values, &percent_labels, &style)?;
    canvas.render()
}

/// Horizontal min/mean/max bars of the customer rating per mode
pub fn render_rating_chart(ranges: &[RatingRange], options: &RenderOptions) -> Result<Vec<u8>> {
    let labels: Vec<String> = ranges.iter().map(|r| r.mode.clone()).collect();
    let bars: Vec<RangeBar> = ranges.iter().map(rating_bar).collect();

    let background = BarStyle {
        color: palette::LIGHT_GRAY,
        alpha: 0.7,
        width: 0.8,
    };

    let mut canvas = Canvas::new(options.width, options.height, RATING_TITLE)?;
    canvas.draw_range_bars(&labels, &bars, &background, 0.5)?;
    canvas.render()
}

/// Histogram of shipment weights
pub fn render_weight_chart(histogram: &Histogram, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(options.width, options.height, WEIGHT_TITLE)?;
    canvas.draw_histogram(
        &histogram.edges,
        &histogram.counts,
        palette::CORAL,
        WHITE,
        &AxisLabels::new("Weight in gms", "Frequency"),
    )?;
    canvas.render()
}

fn split_counts(counts: &[CategoryCount]) -> (Vec<String>, Vec<f64>) {
    counts
        .iter()
        .map(|c| (c.label.clone(), c.count as f64))
        .unzip()
}

fn rating_bar(range: &RatingRange) -> RangeBar {
    let overlay_color = if range.is_well_rated() {
        palette::SEA_GREEN
    } else {
        palette::TOMATO
    };
    RangeBar {
        low: range.min,
        mid: range.mean,
        high: range.max,
        overlay_color,
    }
}
