//! Chart rasterization for the report.
//!
//! Two fixed views of the table are rendered as 800x500 PNGs: an age
//! histogram with a smoothed density overlay, and a bar chart of mean charges
//! per region.  Either both charts are produced or neither is; a failure here
//! is reported to the orchestrator, which logs it and keeps going.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use plotters::prelude::*;

use crate::dataset::Table;
use crate::stats::RegionAggregate;

/// File name of the age histogram inside the output directory.
pub const AGE_CHART_FILE: &str = "age_distribution.png";
/// File name of the per-region bar chart inside the output directory.
pub const REGION_CHART_FILE: &str = "avg_charges_by_region.png";

const CHART_SIZE: (u32, u32) = (800, 500);
const AGE_BIN_COUNT: usize = 20;

const BAR_FILL: RGBColor = RGBColor(135, 206, 235);
const DENSITY_STROKE: RGBColor = RGBColor(31, 78, 121);

// Coarse cool-to-warm ramp, interpolated by bar position.
const REGION_PALETTE: &[RGBColor] = &[
    RGBColor(59, 76, 192),
    RGBColor(124, 159, 249),
    RGBColor(192, 212, 245),
    RGBColor(245, 219, 194),
    RGBColor(244, 154, 123),
    RGBColor(180, 4, 38),
];

fn palette_color(index: usize, total: usize) -> RGBColor {
    if total <= 1 {
        return REGION_PALETTE[0];
    }
    let slot = index * (REGION_PALETTE.len() - 1) / (total - 1);
    REGION_PALETTE[slot]
}

/// Renders both charts into `output_dir`, creating the directory if needed.
///
/// There is no per-chart isolation: if the histogram fails the bar chart is
/// never attempted, matching the all-or-nothing contract of this stage.
pub fn render_charts(table: &Table, output_dir: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    render_age_histogram(table, &output_dir.join(AGE_CHART_FILE))?;
    render_region_bars(table, &output_dir.join(REGION_CHART_FILE))?;
    Ok(())
}

fn render_age_histogram(table: &Table, path: &Path) -> Result<()> {
    ensure!(!table.is_empty(), "cannot chart an empty table");

    let ages: Vec<f64> = table.iter().map(|r| r.age).collect();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &age in &ages {
        min = min.min(age);
        max = max.max(age);
    }
    // Degenerate single-value data still needs a non-zero axis span.
    if max - min < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }

    let bin_width = (max - min) / AGE_BIN_COUNT as f64;
    let mut counts = [0usize; AGE_BIN_COUNT];
    for &age in &ages {
        let bin = (((age - min) / bin_width) as usize).min(AGE_BIN_COUNT - 1);
        counts[bin] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Age Distribution of Patients", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(min..max, 0f64..peak * 1.15)?;

    chart
        .configure_mesh()
        .x_desc("Age")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let lo = min + i as f64 * bin_width;
        let hi = lo + bin_width;
        Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_FILL.filled())
    }))?;

    chart.draw_series(LineSeries::new(
        density_curve(&ages, min, max, bin_width),
        DENSITY_STROKE.stroke_width(2),
    ))?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Gaussian-kernel density estimate scaled to the count axis, so the curve
/// overlays the histogram the way seaborn's `kde=True` does.
fn density_curve(values: &[f64], min: f64, max: f64, bin_width: f64) -> Vec<(f64, f64)> {
    const SAMPLES: usize = 200;

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    // Silverman's rule of thumb, floored so constant data does not divide by
    // zero.
    let bandwidth = (1.06 * std_dev * n.powf(-0.2)).max(bin_width / 2.0).max(1e-9);

    let step = (max - min) / (SAMPLES - 1) as f64;
    (0..SAMPLES)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
            (x, density * n * bin_width)
        })
        .collect()
}

fn render_region_bars(table: &Table, path: &Path) -> Result<()> {
    let aggregate = RegionAggregate::from_table(table);
    ensure!(!aggregate.is_empty(), "no regions to chart");

    let entries = aggregate.entries();
    let peak = entries
        .iter()
        .map(|(_, mean)| *mean)
        .fold(0f64, f64::max);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Medical Charges by Region", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d((0..entries.len()).into_segmented(), 0f64..peak * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Region")
        .y_desc("Average Charges ($)")
        .x_label_formatter(&|segment: &SegmentValue<usize>| match segment {
            SegmentValue::CenterOf(i) => entries
                .get(*i)
                .map(|(region, _)| region.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, mean))| {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *mean),
            ],
            palette_color(i, entries.len()).filled(),
        );
        bar.set_margin(0, 0, 18, 18);
        bar
    }))?;

    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
