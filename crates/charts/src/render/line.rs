//! Line chart renderer
//!
//! Every frame repaints the whole canvas: grid, category lines and the
//! polylines revealed up to `progress * (n - 1)` categories, the last
//! segment interpolated. Markers, legend and titles appear once settled.

use crate::error::ChartResult;
use crate::interaction::{PanZoom, Tooltip, HIT_RADIUS};
use crate::layout::{legend_row, line_layout, LayoutPoint, LayoutResult, LegendEntry, TextMeasure};
use crate::model::{format_value, ChartKind, ChartLabels, Color, RenderRequest};
use crate::render::{draw_axis_titles, draw_grid_labels, draw_grid_lines, draw_legend, grid_stroke, ChartRenderer};
use crate::series::SeriesDescriptor;
use crate::surface::{with_clip, DrawingSurface, FontSpec, Stroke, TextAlign, TextBaseline, TextStyle};

const ANIMATION_STEPS: u32 = 200;
pub const POINT_RADIUS: f64 = 3.0;
const FONT: FontSpec = FontSpec::bold(12.0);

#[derive(Debug, Clone)]
struct LineSeries {
    descriptor: SeriesDescriptor,
    values: Vec<f64>,
}

impl LineSeries {
    fn stroke(&self) -> Stroke {
        Stroke::dashed(
            self.descriptor.color,
            self.descriptor.thickness,
            self.descriptor.style.dash_pattern(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LineChart {
    layout: LayoutResult,
    categories: Vec<String>,
    series: Vec<LineSeries>,
    legend: Vec<LegendEntry>,
    labels: ChartLabels,
    text_color: Color,
    pan_zoom: PanZoom,
}

impl LineChart {
    pub fn new(
        request: &RenderRequest<'_>,
        width: f64,
        height: f64,
        measure: &dyn TextMeasure,
    ) -> ChartResult<Self> {
        let enabled = request.series.enabled(&request.options.palette);
        if enabled.is_empty() {
            tracing::warn!("line chart has no enabled series, drawing an empty plot");
        }
        let layout = line_layout(request.table, &enabled, width, height, request.labels)?;

        let items: Vec<(String, Color)> = enabled
            .iter()
            .map(|d| (d.label.clone(), d.color))
            .collect();
        let legend = legend_row(
            &items,
            layout.plot.x,
            height - layout.padding + 10.0,
            layout.plot.width,
            &FONT,
            measure,
        );

        let series = enabled
            .into_iter()
            .map(|descriptor| LineSeries {
                values: request.table.series_values(descriptor.index),
                descriptor,
            })
            .collect();

        let categories: Vec<String> = request.table.categories().map(str::to_string).collect();
        let pan_zoom = PanZoom::new(categories.len(), layout.category_step, layout.plot.width);

        Ok(Self {
            layout,
            categories,
            series,
            legend,
            labels: request.labels.clone(),
            text_color: request.options.theme.text_color(),
            pan_zoom,
        })
    }

    /// X position of a category under the current pan/zoom
    pub fn category_x(&self, category: usize) -> f64 {
        if self.categories.len() < 2 {
            self.layout.plot.center_x()
        } else {
            self.layout.plot.x + self.pan_zoom.offset_of(category)
        }
    }

    /// Settled position of every point of the `rank`-th enabled series
    pub fn series_points(&self, rank: usize) -> Vec<LayoutPoint> {
        let Some(series) = self.series.get(rank) else {
            return Vec::new();
        };
        series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| LayoutPoint::new(self.category_x(i), self.layout.value_scale.to_pixel(v)))
            .collect()
    }

    /// Polyline revealed at `progress`; empty when there is no segment
    pub fn partial_points(&self, rank: usize, progress: f64) -> Vec<LayoutPoint> {
        let points = self.series_points(rank);
        if points.len() < 2 {
            return Vec::new();
        }
        let reach = progress.clamp(0.0, 1.0) * (points.len() - 1) as f64;
        let mut visible = vec![points[0]];
        for i in 1..points.len() {
            if i as f64 <= reach {
                visible.push(points[i]);
            } else {
                let fraction = reach - (i - 1) as f64;
                if fraction > 0.0 {
                    visible.push(points[i - 1].lerp(points[i], fraction));
                }
                break;
            }
        }
        if visible.len() < 2 {
            Vec::new()
        } else {
            visible
        }
    }

    pub fn enabled_series(&self) -> usize {
        self.series.len()
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    fn draw_category_lines(&self, surface: &mut dyn DrawingSurface) {
        let plot = self.layout.plot;
        let stroke = grid_stroke();
        with_clip(surface, plot, |s| {
            for i in 0..self.categories.len() {
                let x = self.category_x(i);
                s.draw_line(LayoutPoint::new(x, plot.y), LayoutPoint::new(x, plot.bottom()), &stroke);
            }
        });

        let style = TextStyle::new(FONT, self.text_color).aligned(TextAlign::Center, TextBaseline::Middle);
        for (i, label) in self.categories.iter().enumerate() {
            let x = self.category_x(i);
            if x >= plot.x && x <= plot.right() {
                surface.draw_text(label, LayoutPoint::new(x, plot.bottom() + 20.0), &style);
            }
        }
    }

    fn draw_points(&self, surface: &mut dyn DrawingSurface) {
        with_clip(surface, self.layout.plot.grow(POINT_RADIUS), |s| {
            for (rank, series) in self.series.iter().enumerate() {
                for point in self.series_points(rank) {
                    s.fill_circle(point, POINT_RADIUS, series.descriptor.color);
                }
            }
        });
    }
}

impl ChartRenderer for LineChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn animation_steps(&self) -> u32 {
        ANIMATION_STEPS
    }

    /// Frames repaint everything, so there is nothing static
    fn draw_static(&self, _surface: &mut dyn DrawingSurface) {}

    fn draw_frame(&self, surface: &mut dyn DrawingSurface, progress: f64) {
        surface.clear();
        draw_grid_lines(surface, &self.layout);
        draw_grid_labels(surface, &self.layout, FONT, self.text_color);
        self.draw_category_lines(surface);

        with_clip(surface, self.layout.plot, |s| {
            for (rank, series) in self.series.iter().enumerate() {
                s.draw_polyline(&self.partial_points(rank, progress), &series.stroke());
            }
        });
        tracing::trace!(progress, "line frame");
    }

    fn draw_settled(&self, surface: &mut dyn DrawingSurface) {
        self.draw_points(surface);
        draw_legend(surface, &self.legend, FONT, self.text_color);
        draw_axis_titles(
            surface,
            &self.labels,
            &self.layout,
            self.layout.padding - 10.0,
            FONT,
            self.text_color,
        );
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<Tooltip> {
        let visible = self.layout.plot.grow(POINT_RADIUS);
        for (rank, series) in self.series.iter().enumerate() {
            for (point, value) in self.series_points(rank).iter().zip(&series.values) {
                if visible.contains(point.x, point.y) && point.distance_to(x, y) <= HIT_RADIUS {
                    let text = format!("{}: {}", series.descriptor.label, format_value(*value));
                    return Some(Tooltip::at_cursor(text, x, y));
                }
            }
        }
        None
    }

    fn layout(&self) -> Option<&LayoutResult> {
        Some(&self.layout)
    }

    fn pan_zoom(&self) -> Option<&PanZoom> {
        Some(&self.pan_zoom)
    }

    fn pan_zoom_mut(&mut self) -> Option<&mut PanZoom> {
        Some(&mut self.pan_zoom)
    }
}
