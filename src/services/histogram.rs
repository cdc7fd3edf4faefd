use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation_types::{BinBand, CostPercentiles, HistogramBin};

pub const HISTOGRAM_BINS: usize = 20;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

/// Partitions `[min, max]` of the sorted samples into `bins` equal-width
/// bins. The maximum lands in the last bin, so the counts always add up to
/// the sample count.
pub fn build_histogram(
    sorted_samples: &[f64],
    bins: usize,
    percentiles: &CostPercentiles,
) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted_samples.first(), sorted_samples.last()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in sorted_samples {
        let index = if width > 0.0 {
            ((value - min) / width).floor() as usize
        } else {
            0
        };
        counts[index.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| {
            let bin_start = min + index as f64 * width;
            HistogramBin {
                bin_start,
                count,
                band: band_for(bin_start, percentiles),
            }
        })
        .collect()
}

fn band_for(bin_start: f64, percentiles: &CostPercentiles) -> BinBand {
    if bin_start >= percentiles.p90 {
        BinBand::AboveP90
    } else if bin_start <= percentiles.p10 {
        BinBand::BelowP10
    } else {
        BinBand::Middle
    }
}

pub fn write_histogram_png(output_path: &str, bins: &[HistogramBin]) -> Result<(), HistogramError> {
    render_histogram_png(output_path, bins)
}

fn render_histogram_png(output_path: &str, bins: &[HistogramBin]) -> Result<(), HistogramError> {
    if bins.is_empty() {
        return Ok(());
    }

    let min_value = bins[0].bin_start;
    let width = if bins.len() > 1 {
        bins[1].bin_start - bins[0].bin_start
    } else {
        0.0
    };
    let width = if width > 0.0 { width } else { 1.0 };
    let max_value = min_value + width * bins.len() as f64;
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Cost at Completion", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(min_value..max_value, 0..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Total cost (millions)")
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{:.0}M", value / 1_000_000.0))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .draw_series(bins.iter().map(|bin| {
            let style = ShapeStyle::from(&band_color(bin.band)).filled();
            Rectangle::new([(bin.bin_start, 0), (bin.bin_start + width, bin.count)], style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

fn band_color(band: BinBand) -> RGBColor {
    match band {
        BinBand::BelowP10 => RGBColor(16, 185, 129),
        BinBand::Middle => RGBColor(59, 130, 246),
        BinBand::AboveP90 => RGBColor(239, 68, 68),
    }
}
