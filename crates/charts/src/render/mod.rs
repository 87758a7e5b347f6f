//! Chart renderers
//!
//! Each chart kind draws in three passes: a static pass once per render, an
//! animated frame pass called with increasing progress, and a settled pass
//! once progress reaches 1. `redraw` runs all three without animation; it
//! serves pan/zoom updates, one-shot renders and the vector export.

mod bar;
mod line;
mod pie;

pub use bar::{BarChart, BarMark, BAR_DEPTH};
pub use line::{LineChart, POINT_RADIUS};
pub use pie::{PieChart, EMPTY_LABEL};

use crate::error::{ChartError, ChartResult};
use crate::interaction::{PanZoom, Tooltip};
use crate::layout::{LayoutPoint, LayoutResult, LegendEntry};
use crate::model::{ChartKind, ChartLabels, Color, RenderRequest};
use crate::surface::{DrawingSurface, FontSpec, Stroke, SurfaceMetrics, TextAlign, TextBaseline, TextStyle};

/// A laid-out chart ready to draw onto any surface
pub trait ChartRenderer: std::fmt::Debug {
    fn kind(&self) -> ChartKind;

    /// Frames from first tick to settled
    fn animation_steps(&self) -> u32;

    /// Drawn once at the start of a render, after a full clear
    fn draw_static(&self, surface: &mut dyn DrawingSurface);

    /// Clears and repaints the animated region at `progress` in (0, 1]
    fn draw_frame(&self, surface: &mut dyn DrawingSurface, progress: f64);

    /// Decorations added once the animation has finished
    fn draw_settled(&self, surface: &mut dyn DrawingSurface);

    /// Tooltip for the element under the pointer, if any
    fn hit_test(&self, x: f64, y: f64) -> Option<Tooltip>;

    /// Geometry shared with layout, when the chart has a cartesian plot
    fn layout(&self) -> Option<&LayoutResult> {
        None
    }

    /// Bar thickness that replaced an invalid request
    fn corrected_thickness(&self) -> Option<f64> {
        None
    }

    fn pan_zoom(&self) -> Option<&PanZoom> {
        None
    }

    fn pan_zoom_mut(&mut self) -> Option<&mut PanZoom> {
        None
    }

    /// Full settled frame without animation
    fn redraw(&self, surface: &mut dyn DrawingSurface) {
        surface.clear();
        self.draw_static(surface);
        self.draw_frame(surface, 1.0);
        self.draw_settled(surface);
    }
}

/// Validate a request and lay it out for `surface`'s size and text metrics
pub fn build_renderer(
    request: &RenderRequest<'_>,
    surface: &dyn DrawingSurface,
) -> ChartResult<Box<dyn ChartRenderer>> {
    let width = surface.width();
    let height = surface.height();
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ChartError::CanvasTooSmall { width, height });
    }
    let expected = request.table.series_count();
    if request.series.len() != expected {
        return Err(ChartError::SeriesMismatch {
            expected,
            found: request.series.len(),
        });
    }

    let measure = SurfaceMetrics(surface);
    let renderer: Box<dyn ChartRenderer> = match request.kind {
        ChartKind::Line => Box::new(LineChart::new(request, width, height, &measure)?),
        ChartKind::Bar => Box::new(BarChart::new(request, width, height, false, &measure)?),
        ChartKind::Bar3d => Box::new(BarChart::new(request, width, height, true, &measure)?),
        ChartKind::Pie => Box::new(PieChart::new(request, width, height, &measure)?),
    };
    Ok(renderer)
}

pub(crate) fn grid_stroke() -> Stroke {
    Stroke::solid(Color::GRID, 1.0)
}

pub(crate) fn draw_legend(
    surface: &mut dyn DrawingSurface,
    entries: &[LegendEntry],
    font: FontSpec,
    text_color: Color,
) {
    let style = TextStyle::new(font, text_color).aligned(TextAlign::Left, TextBaseline::Middle);
    for entry in entries {
        surface.fill_rect(entry.swatch, entry.color);
        surface.draw_text(&entry.text, entry.text_position, &style);
    }
}

/// Axis titles around a cartesian plot; empty labels are skipped
pub(crate) fn draw_axis_titles(
    surface: &mut dyn DrawingSurface,
    labels: &ChartLabels,
    layout: &LayoutResult,
    title_y: f64,
    font: FontSpec,
    text_color: Color,
) {
    let centered = TextStyle::new(font, text_color).aligned(TextAlign::Center, TextBaseline::Middle);
    let width = surface.width();
    let height = surface.height();

    if !labels.y_axis.is_empty() {
        let rotated = centered.rotated(-std::f64::consts::FRAC_PI_2);
        surface.draw_text(&labels.y_axis, LayoutPoint::new(10.0, height / 2.0), &rotated);
    }
    if !labels.x_axis.is_empty() {
        surface.draw_text(
            &labels.x_axis,
            LayoutPoint::new(width / 2.0, layout.plot.bottom() + 40.0),
            &centered,
        );
    }
    if !labels.title.is_empty() {
        surface.draw_text(&labels.title, LayoutPoint::new(width / 2.0, title_y), &centered);
    }
}

/// Value label for a horizontal grid line, right-aligned left of the plot
pub(crate) fn draw_grid_labels(
    surface: &mut dyn DrawingSurface,
    layout: &LayoutResult,
    font: FontSpec,
    text_color: Color,
) {
    let style = TextStyle::new(font, text_color).aligned(TextAlign::Right, TextBaseline::Middle);
    for line in layout.value_scale.grid_lines() {
        surface.draw_text(
            &format!("{:.2}", line.value),
            LayoutPoint::new(layout.plot.x - 10.0, line.y + 3.0),
            &style,
        );
    }
}

pub(crate) fn draw_grid_lines(surface: &mut dyn DrawingSurface, layout: &LayoutResult) {
    let stroke = grid_stroke();
    for line in layout.value_scale.grid_lines() {
        surface.draw_line(
            LayoutPoint::new(layout.plot.x, line.y),
            LayoutPoint::new(layout.plot.right(), line.y),
            &stroke,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasSurface, DrawCommand};
    use crate::layout::LayoutRect;
    use crate::model::ChartOptions;
    use crate::series::SeriesConfig;
    use table_model::Table;

    /// Canvas whose font reports every string as too wide for any legend slot
    struct WideText(CanvasSurface);

    impl DrawingSurface for WideText {
        fn width(&self) -> f64 {
            self.0.width()
        }
        fn height(&self) -> f64 {
            self.0.height()
        }
        fn clear(&mut self) {
            self.0.clear()
        }
        fn clear_rect(&mut self, rect: LayoutRect) {
            self.0.clear_rect(rect)
        }
        fn draw_line(&mut self, from: LayoutPoint, to: LayoutPoint, stroke: &Stroke) {
            self.0.draw_line(from, to, stroke)
        }
        fn draw_polyline(&mut self, points: &[LayoutPoint], stroke: &Stroke) {
            self.0.draw_polyline(points, stroke)
        }
        fn fill_rect(&mut self, rect: LayoutRect, fill: Color) {
            self.0.fill_rect(rect, fill)
        }
        fn fill_polygon(&mut self, points: &[LayoutPoint], fill: Color) {
            self.0.fill_polygon(points, fill)
        }
        fn fill_arc(&mut self, center: LayoutPoint, radius: f64, start_angle: f64, end_angle: f64, fill: Color) {
            self.0.fill_arc(center, radius, start_angle, end_angle, fill)
        }
        fn fill_circle(&mut self, center: LayoutPoint, radius: f64, fill: Color) {
            self.0.fill_circle(center, radius, fill)
        }
        fn draw_text(&mut self, text: &str, position: LayoutPoint, style: &TextStyle) {
            self.0.draw_text(text, position, style)
        }
        fn push_clip(&mut self, rect: LayoutRect) {
            self.0.push_clip(rect)
        }
        fn pop_clip(&mut self) {
            self.0.pop_clip()
        }
        fn measure_text(&self, _text: &str, _font: &FontSpec) -> f64 {
            1000.0
        }
    }

    fn texts(canvas: &CanvasSurface) -> Vec<String> {
        canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_legend_uses_surface_metrics() {
        let table = Table::from_rows(vec![
            vec!["Month".into(), "Quarterly revenue".into(), "Cost".into()],
            vec!["Jan".into(), "1".into(), "2".into()],
            vec!["Feb".into(), "3".into(), "4".into()],
        ])
        .unwrap();
        let labels = ChartLabels::new("", "Month", "");
        let series = SeriesConfig::for_table(&table);
        let options = ChartOptions::default();
        let request = RenderRequest {
            kind: ChartKind::Line,
            table: &table,
            labels: &labels,
            series: &series,
            options: &options,
        };

        let mut canvas = CanvasSurface::new(500.0, 400.0, 1.0);
        build_renderer(&request, &canvas).unwrap().redraw(&mut canvas);
        let plain = texts(&canvas);
        assert!(plain.iter().any(|t| t == "Quarterly revenue"));
        assert!(plain.iter().any(|t| t == "Cost"));

        let mut wide = WideText(CanvasSurface::new(500.0, 400.0, 1.0));
        build_renderer(&request, &wide).unwrap().redraw(&mut wide);
        let narrowed = texts(&wide.0);
        assert!(!narrowed.iter().any(|t| t == "Quarterly revenue" || t == "Cost"));
        assert_eq!(narrowed.iter().filter(|t| t.as_str() == "...").count(), 2);
    }
}
