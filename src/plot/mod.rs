//! Bandwidth-curve rendering.
//!
//! The plotter is a pure sink: it is handed a finished [`Series`] plus an
//! explicit [`PlotConfig`] and draws one labeled line chart with point
//! markers and a grid. Points are drawn in file order, so repeated sizes
//! from multiple repetitions show up as separate markers rather than being
//! averaged away.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::store::{self, Series};

/// Chart parameters, passed explicitly rather than held as ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Output image path; `.svg` selects the SVG backend, anything else
    /// renders a bitmap
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "LinearCopy Bandwidth Results".to_string(),
            x_label: "Size (MB)".to_string(),
            y_label: "Bandwidth (GB/s)".to_string(),
            output: PathBuf::from("bandwidth_plot.png"),
            width: 1024,
            height: 768,
        }
    }
}

/// Extract two columns from a record store and render them.
///
/// Returns the extracted series; rendering is the side effect. Fatal on a
/// missing store, any malformed record, or a store with no data lines.
pub fn plot_series<P: AsRef<Path>>(
    store_path: P,
    x_field: usize,
    y_field: usize,
    config: &PlotConfig,
) -> Result<Series> {
    let series = store::read_series(&store_path, x_field, y_field)?;
    if series.is_empty() {
        return Err(SweepError::EmptyStore(store_path.as_ref().to_path_buf()));
    }
    render(&series, config)?;
    Ok(series)
}

/// Draw a series to the configured output file.
pub fn render(series: &Series, config: &PlotConfig) -> Result<()> {
    if series.is_empty() {
        return Err(SweepError::EmptyStore(config.output.clone()));
    }

    let svg = config
        .output
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if svg {
        let root =
            SVGBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
        draw_chart(&root, series, config)?;
    } else {
        let root =
            BitMapBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
        draw_chart(&root, series, config)?;
    }
    Ok(())
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &Series,
    config: &PlotConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(render_err)?;

    let points: Vec<(f64, f64)> = series
        .x
        .iter()
        .zip(series.y.iter())
        .map(|(&x, &y)| (x as f64, y))
        .collect();

    let (x_min, x_max) = padded_range(
        points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min),
        points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max),
    );
    let (y_min, y_max) = padded_range(
        points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min),
        points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max),
    );

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(render_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Widen a min/max pair into a usable axis range. A degenerate single-value
/// range gets a fixed pad so the coordinate system stays non-empty.
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        (min - pad, max + pad)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> SweepError {
    SweepError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use tempfile::tempdir;

    fn sample_series() -> Series {
        Series {
            x: vec![8, 8, 24, 24, 40, 40],
            y: vec![12.5, 12.5, 12.5, 12.5, 12.5, 12.5],
        }
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempdir().unwrap();
        let config = PlotConfig {
            output: dir.path().join("curve.png"),
            ..PlotConfig::default()
        };
        render(&sample_series(), &config).unwrap();
        assert!(config.output.exists());
        assert!(std::fs::metadata(&config.output).unwrap().len() > 0);
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = tempdir().unwrap();
        let config = PlotConfig {
            output: dir.path().join("curve.svg"),
            ..PlotConfig::default()
        };
        render(&sample_series(), &config).unwrap();
        let content = std::fs::read_to_string(&config.output).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn test_render_empty_series_is_an_error() {
        let dir = tempdir().unwrap();
        let config = PlotConfig {
            output: dir.path().join("curve.png"),
            ..PlotConfig::default()
        };
        let err = render(&Series::default(), &config).unwrap_err();
        assert!(matches!(err, SweepError::EmptyStore(_)));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_plot_series_scenario() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("results.csv");
        let mut store =
            RecordStore::create(&store_path, "size_mb,copy_x,copy_y,copy_z,bandwidth_gbs")
                .unwrap();
        for size in [8u64, 8, 24, 24, 40, 40] {
            store.append(&format!("{},0,0,0,12.5", size)).unwrap();
        }
        drop(store);

        let config = PlotConfig {
            output: dir.path().join("curve.png"),
            ..PlotConfig::default()
        };
        let series = plot_series(&store_path, 0, 4, &config).unwrap();
        assert_eq!(series.x, vec![8, 8, 24, 24, 40, 40]);
        assert_eq!(series.y, vec![12.5; 6]);
        assert!(config.output.exists());
    }

    #[test]
    fn test_plot_series_header_only_store() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("results.csv");
        RecordStore::create(&store_path, "size_mb,bandwidth_gbs").unwrap();

        let config = PlotConfig {
            output: dir.path().join("curve.png"),
            ..PlotConfig::default()
        };
        let err = plot_series(&store_path, 0, 1, &config).unwrap_err();
        assert!(matches!(err, SweepError::EmptyStore(_)));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_plot_series_malformed_store_plots_nothing() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("results.csv");
        let mut store = RecordStore::create(&store_path, "h").unwrap();
        store.append("8,0,0,0,12.5").unwrap();
        store.append("24,0").unwrap();
        drop(store);

        let config = PlotConfig {
            output: dir.path().join("curve.png"),
            ..PlotConfig::default()
        };
        let err = plot_series(&store_path, 0, 4, &config).unwrap_err();
        assert!(matches!(err, SweepError::MalformedRecord { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_padded_range_degenerate() {
        let (lo, hi) = padded_range(12.5, 12.5);
        assert!(lo < 12.5 && hi > 12.5);
        let (lo, hi) = padded_range(0.0, 0.0);
        assert!(lo < 0.0 && hi > 0.0);
    }
}
