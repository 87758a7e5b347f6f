//! Bar and 3-D bar chart renderer
//!
//! Labels, titles and legend are painted once. Each frame clears only the
//! plot (grown by the extrusion depth for 3-D) and regrows the bars to
//! `height * progress`.

use crate::error::ChartResult;
use crate::interaction::Tooltip;
use crate::layout::{
    bar_layout, bar_rect, legend_row, resolve_bar_thickness, BarThickness, LayoutPoint, LayoutRect,
    LayoutResult, LegendEntry, TextMeasure,
};
use crate::model::{format_value, ChartKind, ChartLabels, Color, RenderRequest};
use crate::render::{draw_axis_titles, draw_grid_labels, draw_grid_lines, draw_legend, ChartRenderer};
use crate::series::SeriesDescriptor;
use crate::surface::{with_clip, DrawingSurface, FontSpec, TextAlign, TextBaseline, TextStyle};

const ANIMATION_STEPS: u32 = 70;
/// Extrusion of 3-D bars, in CSS pixels up and to the right
pub const BAR_DEPTH: usize = 20;
const SHADE_PERCENT: f64 = 30.0;
const TOP_LIGHTEN_PERCENT: f64 = 20.0;

const LABEL_FONT: FontSpec = FontSpec::regular(12.0);
const TITLE_FONT: FontSpec = FontSpec::bold(12.0);
const LEGEND_FONT: FontSpec = FontSpec::regular(16.0);

/// One bar at full height
#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub category: usize,
    pub rank: usize,
    pub rect: LayoutRect,
    pub color: Color,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct BarSeries {
    descriptor: SeriesDescriptor,
    values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    layout: LayoutResult,
    categories: Vec<String>,
    series: Vec<BarSeries>,
    thickness: BarThickness,
    legend: Vec<LegendEntry>,
    labels: ChartLabels,
    text_color: Color,
    three_d: bool,
}

impl BarChart {
    pub fn new(
        request: &RenderRequest<'_>,
        width: f64,
        height: f64,
        three_d: bool,
        measure: &dyn TextMeasure,
    ) -> ChartResult<Self> {
        let enabled = request.series.enabled(&request.options.palette);
        if enabled.is_empty() {
            tracing::warn!("bar chart has no enabled series, drawing an empty plot");
        }
        let layout = bar_layout(request.table, &enabled, width, height, request.labels)?;

        let thickness = resolve_bar_thickness(
            request.options.bar_thickness,
            layout.category_step,
            enabled.len(),
        );
        if let (Some(requested), Some(corrected)) = (request.options.bar_thickness, thickness.corrected) {
            tracing::warn!(requested, corrected, "bar thickness out of range, using default");
        }

        let items: Vec<(String, Color)> = enabled
            .iter()
            .map(|d| (d.label.clone(), d.color))
            .collect();
        let legend = legend_row(
            &items,
            layout.plot.x,
            layout.plot.bottom() + 50.0,
            layout.plot.width,
            &LEGEND_FONT,
            measure,
        );

        let series = enabled
            .into_iter()
            .map(|descriptor| BarSeries {
                values: request.table.series_values(descriptor.index),
                descriptor,
            })
            .collect();

        Ok(Self {
            layout,
            categories: request.table.categories().map(str::to_string).collect(),
            series,
            thickness,
            legend,
            labels: request.labels.clone(),
            text_color: request.options.theme.text_color(),
            three_d,
        })
    }

    pub fn thickness(&self) -> f64 {
        self.thickness.thickness
    }

    pub fn is_three_d(&self) -> bool {
        self.three_d
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Every bar at full height, category-major
    pub fn bars(&self) -> Vec<BarMark> {
        let enabled = self.series.len();
        let mut marks = Vec::with_capacity(enabled * self.categories.len());
        for category in 0..self.categories.len() {
            for (rank, series) in self.series.iter().enumerate() {
                let value = series.values.get(category).copied().unwrap_or(0.0);
                marks.push(BarMark {
                    category,
                    rank,
                    rect: bar_rect(&self.layout, category, rank, enabled, self.thickness.thickness, value),
                    color: series.descriptor.color,
                    value,
                });
            }
        }
        marks
    }

    fn depth(&self) -> f64 {
        if self.three_d {
            BAR_DEPTH as f64
        } else {
            0.0
        }
    }

    /// Area cleared and clipped on every frame
    pub fn animated_region(&self) -> LayoutRect {
        let depth = self.depth();
        self.layout.plot.grow_sides(depth, depth, 0.0, 0.0)
    }

    fn draw_bar(&self, surface: &mut dyn DrawingSurface, rect: LayoutRect, color: Color) {
        if !self.three_d {
            surface.fill_rect(rect, color);
            return;
        }
        let shade = color.darken(SHADE_PERCENT);
        for n in (1..=BAR_DEPTH).rev() {
            let n = n as f64;
            surface.fill_rect(rect.translate(n, -n), shade);
        }
        surface.fill_rect(rect, color);
        surface.fill_polygon(&top_face(rect, self.depth()), color.lighten(TOP_LIGHTEN_PERCENT));
    }

    fn draw_category_labels(&self, surface: &mut dyn DrawingSurface) {
        let style = TextStyle::new(LABEL_FONT, self.text_color).aligned(TextAlign::Center, TextBaseline::Middle);
        let plot = self.layout.plot;
        let step = self.layout.category_step;
        for (i, label) in self.categories.iter().enumerate() {
            let x = plot.x + i as f64 * step + step / 2.0;
            surface.draw_text(label, LayoutPoint::new(x, plot.bottom() + 20.0), &style);
        }
    }

    fn title_y(&self) -> f64 {
        if self.three_d {
            20.0
        } else {
            self.layout.padding - 20.0
        }
    }
}

fn top_face(rect: LayoutRect, depth: f64) -> [LayoutPoint; 4] {
    [
        LayoutPoint::new(rect.x, rect.y),
        LayoutPoint::new(rect.x + depth, rect.y - depth),
        LayoutPoint::new(rect.right() + depth, rect.y - depth),
        LayoutPoint::new(rect.right(), rect.y),
    ]
}

fn side_face(rect: LayoutRect, depth: f64) -> [LayoutPoint; 4] {
    [
        LayoutPoint::new(rect.right(), rect.y),
        LayoutPoint::new(rect.right() + depth, rect.y - depth),
        LayoutPoint::new(rect.right() + depth, rect.bottom() - depth),
        LayoutPoint::new(rect.right(), rect.bottom()),
    ]
}

/// Even-odd ray cast
fn polygon_contains(points: &[LayoutPoint], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len().saturating_sub(1);
    for (i, pi) in points.iter().enumerate() {
        let pj = points[j];
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl ChartRenderer for BarChart {
    fn kind(&self) -> ChartKind {
        if self.three_d {
            ChartKind::Bar3d
        } else {
            ChartKind::Bar
        }
    }

    fn animation_steps(&self) -> u32 {
        ANIMATION_STEPS
    }

    fn draw_static(&self, surface: &mut dyn DrawingSurface) {
        self.draw_category_labels(surface);
        draw_grid_labels(surface, &self.layout, LABEL_FONT, self.text_color);
        draw_axis_titles(surface, &self.labels, &self.layout, self.title_y(), TITLE_FONT, self.text_color);
        draw_legend(surface, &self.legend, LEGEND_FONT, self.text_color);
    }

    fn draw_frame(&self, surface: &mut dyn DrawingSurface, progress: f64) {
        let region = self.animated_region();
        let progress = progress.clamp(0.0, 1.0);
        surface.clear_rect(region);
        with_clip(surface, region, |s| {
            draw_grid_lines(s, &self.layout);
            for mark in self.bars() {
                let height = mark.rect.height * progress;
                if height > 0.0 {
                    let rect = LayoutRect::new(mark.rect.x, mark.rect.bottom() - height, mark.rect.width, height);
                    self.draw_bar(s, rect, mark.color);
                }
            }
        });
        tracing::trace!(progress, "bar frame");
    }

    /// The last frame already shows every bar at full height
    fn draw_settled(&self, _surface: &mut dyn DrawingSurface) {}

    fn hit_test(&self, x: f64, y: f64) -> Option<Tooltip> {
        let bars = self.bars();
        let tooltip = |mark: &BarMark| {
            let label = &self.series[mark.rank].descriptor.label;
            Tooltip::at_cursor(format!("{}: {}", label, format_value(mark.value)), x, y)
        };

        if let Some(mark) = bars.iter().find(|m| m.rect.height > 0.0 && m.rect.contains(x, y)) {
            return Some(tooltip(mark));
        }
        if self.three_d {
            let depth = self.depth();
            return bars
                .iter()
                .filter(|m| m.rect.height > 0.0)
                .find(|m| {
                    polygon_contains(&top_face(m.rect, depth), x, y)
                        || polygon_contains(&side_face(m.rect, depth), x, y)
                })
                .map(tooltip);
        }
        None
    }

    fn layout(&self) -> Option<&LayoutResult> {
        Some(&self.layout)
    }

    fn corrected_thickness(&self) -> Option<f64> {
        self.thickness.corrected
    }
}
