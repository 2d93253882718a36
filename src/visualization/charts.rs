use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::fonts::{text_available, FONT_FAMILY};
use crate::analysis::{grid_layout, BoxStats, CorrelationMatrix, Histogram};
use crate::config::PlotConfig;
use crate::error::EdaError;

pub const HISTOGRAM_FILE: &str = "histograms.png";
pub const HEATMAP_FILE: &str = "corr_heatmap.png";
pub const BOXPLOT_FILE: &str = "boxplot.png";

const HEATMAP_TITLE: &str = "Correlation Heatmap";
const BOXPLOT_TITLE: &str = "Outlier Detection (Boxplot)";

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const BOX_COLOR: RGBColor = RGBColor(76, 114, 176);
const NAN_COLOR: RGBColor = RGBColor(235, 235, 235);
const COLD: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const HOT: RGBColor = RGBColor(180, 4, 38);

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Which boxplot drawing path produced the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxplotRenderer {
    /// Composed plotters elements anchored on a segmented category axis
    Native,
    /// Boxes, whiskers and outliers drawn on a plain numeric grid
    Manual,
}

/// Positions both boxplot renderers draw.
///
/// Whiskers end at the furthest observation inside 1.5 × IQR, never at the
/// fences themselves, so plotters' `Quartiles` cannot be used here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl From<&BoxStats> for BoxGeometry {
    fn from(s: &BoxStats) -> Self {
        BoxGeometry {
            lower_whisker: s.lower_whisker,
            q1: s.q1,
            median: s.median,
            q3: s.q3,
            upper_whisker: s.upper_whisker,
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Label colour that stays readable on the cell drawn for `r`.
fn annotation_color(r: f64) -> &'static RGBColor {
    if r.abs() > 0.6 {
        &WHITE
    } else {
        &BLACK
    }
}

/// Diverging colour for a coefficient in `[-1, 1]`; grey for `NaN`.
pub fn correlation_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return NAN_COLOR;
    }
    let r = r.clamp(-1.0, 1.0);
    let (from, to, t) = if r < 0.0 {
        (NEUTRAL, COLD, -r)
    } else {
        (NEUTRAL, HOT, r)
    };
    RGBColor(lerp(from.0, to.0, t), lerp(from.1, to.1, t), lerp(from.2, to.2, t))
}

fn centered(size: i32) -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

/// Render one histogram panel per column in an auto-sized grid.
pub fn render_histograms(
    histograms: &[Histogram],
    path: &Path,
    plots: &PlotConfig,
) -> Result<(), EdaError> {
    if histograms.is_empty() {
        return Err(EdaError::InsufficientData(
            "no numeric columns to plot".to_string(),
        ));
    }
    let text = text_available(plots.font.as_deref());

    let root = BitMapBackend::new(path, plots.pixels(plots.histogram_size)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly(grid_layout(histograms.len()));
    for (hist, panel) in histograms.iter().zip(panels.iter()) {
        draw_histogram_panel(panel, hist, text)?;
    }

    root.present()?;
    info!(path = %path.display(), panels = histograms.len(), "saved histograms");
    Ok(())
}

fn draw_histogram_panel(area: &Canvas<'_>, hist: &Histogram, text: bool) -> Result<(), EdaError> {
    let (x_min, x_max) = hist.range().unwrap_or((0.0, 1.0));
    let y_max = hist.max_count().max(1) as f64 * 1.05;

    let mut builder = ChartBuilder::on(area);
    builder.margin(12);
    if text {
        builder
            .caption(&hist.column, (FONT_FAMILY, 22))
            .x_label_area_size(30)
            .y_label_area_size(45);
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    if text {
        chart
            .configure_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&|v| format!("{v:.2}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .draw()?;
    }

    chart.draw_series(hist.bins().map(|(lo, hi, count)| {
        Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_COLOR.filled())
    }))?;
    chart.draw_series(hist.bins().map(|(lo, hi, count)| {
        Rectangle::new([(lo, 0.0), (hi, count as f64)], WHITE.stroke_width(1))
    }))?;
    Ok(())
}

/// Render the correlation matrix as an annotated, square-celled heatmap.
pub fn render_correlation_heatmap(
    matrix: &CorrelationMatrix,
    path: &Path,
    plots: &PlotConfig,
) -> Result<(), EdaError> {
    if matrix.is_empty() {
        return Err(EdaError::InsufficientData(
            "no numeric columns to correlate".to_string(),
        ));
    }
    let text = text_available(plots.font.as_deref());
    let (width, height) = plots.pixels(plots.heatmap_size);
    let n = matrix.len();

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let colorbar_width = (width / 8) as i32;
    let (main, legend) = root.split_horizontally(width as i32 - colorbar_width);

    let label_space = if text { (height / 6) as i32 } else { 0 };
    let caption_space = if text { 60 } else { 0 };
    let margin = 20;
    let avail_w = width as i32 - colorbar_width - label_space - 2 * margin;
    let avail_h = height as i32 - label_space - caption_space - 2 * margin;
    let side = avail_w.min(avail_h).max(1);

    let mut builder = ChartBuilder::on(&main);
    builder
        .margin_top(margin)
        .margin_bottom(margin + avail_h - side)
        .margin_left(margin)
        .margin_right(margin + avail_w - side)
        .x_label_area_size(label_space)
        .y_label_area_size(label_space);
    if text {
        builder.caption(HEATMAP_TITLE, (FONT_FAMILY, 32));
    }
    let mut chart = builder.build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

    // Row 0 is drawn at the top.
    let cell_y = |i: usize| (n - 1 - i) as f64;

    chart.draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
        let y = cell_y(i);
        Rectangle::new(
            [(j as f64, y), (j as f64 + 1.0, y + 1.0)],
            correlation_color(matrix.values[i][j]).filled(),
        )
    }))?;

    if text {
        let font_size = (side / (n as i32 * 4)).clamp(8, 28);
        chart.draw_series(
            (0..n)
                .flat_map(|i| (0..n).map(move |j| (i, j)))
                .filter(|&(i, j)| !matrix.values[i][j].is_nan())
                .map(|(i, j)| {
                    let r = matrix.values[i][j];
                    let color = annotation_color(r);
                    Text::new(
                        format!("{r:.2}"),
                        (j as f64 + 0.5, cell_y(i) + 0.5),
                        centered(font_size).color(color),
                    )
                }),
        )?;

        let label_size = font_size.clamp(10, 18);
        for (k, name) in matrix.columns.iter().enumerate() {
            let (x, _) = chart.backend_coord(&(k as f64 + 0.5, 0.0));
            let (_, y) = chart.backend_coord(&(0.0, cell_y(k) + 0.5));
            let (left, bottom) = chart.backend_coord(&(0.0, 0.0));
            root.draw(&Text::new(
                name.clone(),
                (x, bottom + label_size),
                centered(label_size),
            ))?;
            root.draw(&Text::new(
                name.clone(),
                (left - 6, y),
                TextStyle::from((FONT_FAMILY, label_size).into_font())
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
    }

    draw_colorbar(&legend, text)?;
    root.present()?;
    info!(path = %path.display(), columns = n, "saved correlation heatmap");
    Ok(())
}

fn draw_colorbar(area: &Canvas<'_>, text: bool) -> Result<(), EdaError> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let top = h / 8;
    let bottom = h - h / 8;
    let left = w / 6;
    let right = left + (w / 4).max(4);
    let steps = 100;
    let span = (bottom - top).max(1);

    for s in 0..steps {
        let y0 = top + span * s / steps;
        let y1 = top + span * (s + 1) / steps;
        let r = 1.0 - 2.0 * (s as f64 + 0.5) / steps as f64;
        area.draw(&Rectangle::new(
            [(left, y0), (right, y1)],
            correlation_color(r).filled(),
        ))?;
    }
    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    if text {
        for (label, y) in [("1.0", top), ("0.0", (top + bottom) / 2), ("-1.0", bottom)] {
            area.draw(&Text::new(
                label,
                (right + 6, y),
                TextStyle::from((FONT_FAMILY, 16).into_font())
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            ))?;
        }
    }
    Ok(())
}

/// Render a horizontal boxplot, falling back to the manual renderer if the
/// native path fails. Returns the renderer that produced the image.
pub fn render_boxplot(
    stats: &[BoxStats],
    path: &Path,
    plots: &PlotConfig,
) -> Result<BoxplotRenderer, EdaError> {
    render_boxplot_with(stats, path, plots, draw_boxplot)
}

/// [`render_boxplot`] with the per-renderer drawing step supplied by the
/// caller. `draw` is called with `Native` first and at most once more with
/// `Manual`; each call must start from a fresh surface at `path`.
pub fn render_boxplot_with<F>(
    stats: &[BoxStats],
    path: &Path,
    plots: &PlotConfig,
    mut draw: F,
) -> Result<BoxplotRenderer, EdaError>
where
    F: FnMut(&[BoxStats], &Path, &PlotConfig, BoxplotRenderer) -> Result<(), EdaError>,
{
    if stats.is_empty() {
        return Err(EdaError::InsufficientData(
            "no numeric values to box".to_string(),
        ));
    }

    let renderer = match draw(stats, path, plots, BoxplotRenderer::Native) {
        Ok(()) => BoxplotRenderer::Native,
        Err(err) => {
            warn!(error = %err, "native boxplot failed; drawing manually");
            draw(stats, path, plots, BoxplotRenderer::Manual)?;
            BoxplotRenderer::Manual
        }
    };
    info!(path = %path.display(), ?renderer, "saved boxplot");
    Ok(renderer)
}

/// Draw the boxplot with one specific renderer onto a fresh surface.
pub fn draw_boxplot(
    stats: &[BoxStats],
    path: &Path,
    plots: &PlotConfig,
    renderer: BoxplotRenderer,
) -> Result<(), EdaError> {
    let text = text_available(plots.font.as_deref());
    let root = BitMapBackend::new(path, plots.pixels(plots.boxplot_size)).into_drawing_area();
    root.fill(&WHITE)?;

    match renderer {
        BoxplotRenderer::Native => draw_boxplot_native(&root, stats, text)?,
        BoxplotRenderer::Manual => draw_boxplot_manual(&root, stats, text)?,
    }

    root.present()?;
    Ok(())
}

fn value_range(stats: &[BoxStats]) -> (f64, f64) {
    let lo = stats.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = stats.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}

fn name_area_width(stats: &[BoxStats]) -> i32 {
    let longest = stats.iter().map(|s| s.column.chars().count()).max().unwrap_or(0);
    (longest as i32 * 11 + 20).clamp(60, 400)
}

fn draw_boxplot_native(root: &Canvas<'_>, stats: &[BoxStats], text: bool) -> Result<(), EdaError> {
    let names: Vec<String> = stats.iter().map(|s| s.column.clone()).collect();
    let (lo, hi) = value_range(stats);

    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    if text {
        builder
            .caption(BOXPLOT_TITLE, (FONT_FAMILY, 32))
            .x_label_area_size(40)
            .y_label_area_size(name_area_width(stats));
    }
    let mut chart = builder.build_cartesian_2d(lo as f32..hi as f32, names[..].into_segmented())?;

    if text {
        chart
            .configure_mesh()
            .y_labels(names.len())
            .light_line_style(WHITE)
            .draw()?;
    }

    let half = (root.dim_in_pixel().1 / (names.len() as u32 * 4)).clamp(2, 30) as i32;
    let cap = (half / 2).max(1);

    // Box anchored at q1; median and q3 as pixel offsets from it.
    let boxes: Vec<(SegmentValue<&String>, BoxGeometry, i32, i32)> = names
        .iter()
        .zip(stats)
        .map(|(name, s)| {
            let g = BoxGeometry::from(s);
            let key = SegmentValue::CenterOf(name);
            let (x_q1, _) = chart.backend_coord(&(g.q1 as f32, key.clone()));
            let (x_median, _) = chart.backend_coord(&(g.median as f32, key.clone()));
            let (x_q3, _) = chart.backend_coord(&(g.q3 as f32, key.clone()));
            (key, g, x_median - x_q1, x_q3 - x_q1)
        })
        .collect();

    chart.draw_series(boxes.iter().flat_map(|(key, g, _, _)| {
        [
            PathElement::new(
                vec![(g.lower_whisker as f32, key.clone()), (g.q1 as f32, key.clone())],
                BOX_COLOR.stroke_width(2),
            ),
            PathElement::new(
                vec![(g.q3 as f32, key.clone()), (g.upper_whisker as f32, key.clone())],
                BOX_COLOR.stroke_width(2),
            ),
        ]
    }))?;

    chart.draw_series(boxes.iter().map(|(key, g, median_px, width_px)| {
        EmptyElement::at((g.q1 as f32, key.clone()))
            + Rectangle::new([(0, -half), (*width_px, half)], BOX_COLOR.mix(0.35).filled())
            + Rectangle::new([(0, -half), (*width_px, half)], BOX_COLOR.stroke_width(2))
            + PathElement::new(
                vec![(*median_px, -half), (*median_px, half)],
                BOX_COLOR.stroke_width(2),
            )
    }))?;

    chart.draw_series(boxes.iter().flat_map(|(key, g, _, _)| {
        [g.lower_whisker, g.upper_whisker].into_iter().map(move |w| {
            EmptyElement::at((w as f32, key.clone()))
                + PathElement::new(vec![(0, -cap), (0, cap)], BOX_COLOR.stroke_width(2))
        })
    }))?;

    chart.draw_series(names.iter().zip(stats).flat_map(|(name, s)| {
        s.outliers
            .iter()
            .map(move |v| Circle::new((*v as f32, SegmentValue::CenterOf(name)), 3, BOX_COLOR.filled()))
    }))?;
    Ok(())
}

fn draw_boxplot_manual(root: &Canvas<'_>, stats: &[BoxStats], text: bool) -> Result<(), EdaError> {
    let n = stats.len();
    let (lo, hi) = value_range(stats);
    let label_space = if text { name_area_width(stats) } else { 0 };

    let mut builder = ChartBuilder::on(root);
    builder.margin(20).y_label_area_size(label_space);
    if text {
        builder.caption(BOXPLOT_TITLE, (FONT_FAMILY, 32)).x_label_area_size(40);
    }
    let mut chart = builder.build_cartesian_2d(lo..hi, -0.5f64..n as f64 - 0.5)?;

    if text {
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_labels(8)
            .light_line_style(WHITE)
            .draw()?;
    }

    // First column on top.
    let row_y = |i: usize| (n - 1 - i) as f64;
    let half = 0.3;

    let geometry: Vec<BoxGeometry> = stats.iter().map(BoxGeometry::from).collect();

    chart.draw_series(geometry.iter().enumerate().map(|(i, g)| {
        let y = row_y(i);
        Rectangle::new([(g.q1, y - half), (g.q3, y + half)], BOX_COLOR.mix(0.35).filled())
    }))?;
    chart.draw_series(geometry.iter().enumerate().map(|(i, g)| {
        let y = row_y(i);
        Rectangle::new([(g.q1, y - half), (g.q3, y + half)], BOX_COLOR.stroke_width(2))
    }))?;

    let whiskers = geometry.iter().enumerate().flat_map(|(i, g)| {
        let y = row_y(i);
        let cap = half / 2.0;
        [
            vec![(g.median, y - half), (g.median, y + half)],
            vec![(g.lower_whisker, y), (g.q1, y)],
            vec![(g.q3, y), (g.upper_whisker, y)],
            vec![(g.lower_whisker, y - cap), (g.lower_whisker, y + cap)],
            vec![(g.upper_whisker, y - cap), (g.upper_whisker, y + cap)],
        ]
    });
    chart.draw_series(whiskers.map(|points| PathElement::new(points, BOX_COLOR.stroke_width(2))))?;

    chart.draw_series(stats.iter().enumerate().flat_map(|(i, s)| {
        let y = row_y(i);
        s.outliers
            .iter()
            .map(move |v| Circle::new((*v, y), 3, BOX_COLOR.filled()))
    }))?;

    if text {
        for (i, s) in stats.iter().enumerate() {
            let (left, y) = chart.backend_coord(&(lo, row_y(i)));
            root.draw(&Text::new(
                s.column.clone(),
                (left - 8, y),
                TextStyle::from((FONT_FAMILY, 16).into_font())
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
    }
    Ok(())
}
