//! Pie chart renderer
//!
//! Slices sweep clockwise from 3 o'clock. A pie whose values sum to zero
//! draws a single gray disc labelled "No data" and reports no hits.

use std::f64::consts::TAU;

use crate::error::{ChartError, ChartResult};
use crate::interaction::Tooltip;
use crate::layout::{pie_layout, LayoutPoint, LayoutRect, PieLayout, TextMeasure, PIE_BASE_PADDING};
use crate::model::{ChartKind, ChartLabels, Color, RenderRequest};
use crate::render::{draw_legend, ChartRenderer};
use crate::surface::{DrawingSurface, FontSpec, TextAlign, TextBaseline, TextStyle};

const ANIMATION_STEPS: u32 = 200;
const TITLE_FONT: FontSpec = FontSpec::regular(24.0);
const FONT: FontSpec = FontSpec::regular(16.0);
const LABEL_RADIUS: f64 = 0.75;
pub const EMPTY_LABEL: &str = "No data";

#[derive(Debug, Clone)]
pub struct PieChart {
    pie: PieLayout,
    labels: ChartLabels,
    text_color: Color,
    width: f64,
}

impl PieChart {
    /// Lays out the first enabled series
    pub fn new(
        request: &RenderRequest<'_>,
        width: f64,
        height: f64,
        measure: &dyn TextMeasure,
    ) -> ChartResult<Self> {
        let series = request
            .series
            .enabled(&request.options.palette)
            .first()
            .map(|d| d.index)
            .ok_or(ChartError::NoEnabledSeries)?;

        let pie = pie_layout(
            request.table,
            series,
            width,
            height,
            request.labels.has_title(),
            &request.options.palette,
            &FONT,
            measure,
        )?;
        if pie.is_empty() {
            tracing::warn!(series, "pie values sum to zero, drawing the empty state");
        }

        Ok(Self {
            pie,
            labels: request.labels.clone(),
            text_color: request.options.theme.text_color(),
            width,
        })
    }

    pub fn pie(&self) -> &PieLayout {
        &self.pie
    }

    fn disc_bounds(&self) -> LayoutRect {
        let r = self.pie.radius;
        LayoutRect::new(self.pie.center.x - r, self.pie.center.y - r, 2.0 * r, 2.0 * r).grow(1.0)
    }

    fn centered(&self) -> TextStyle {
        TextStyle::new(FONT, self.text_color).aligned(TextAlign::Center, TextBaseline::Middle)
    }
}

impl ChartRenderer for PieChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Pie
    }

    fn animation_steps(&self) -> u32 {
        ANIMATION_STEPS
    }

    fn draw_static(&self, surface: &mut dyn DrawingSurface) {
        if self.labels.has_title() {
            let style = TextStyle::new(TITLE_FONT, self.text_color).aligned(TextAlign::Center, TextBaseline::Top);
            surface.draw_text(
                &self.labels.title,
                LayoutPoint::new(self.width / 2.0, PIE_BASE_PADDING / 2.0),
                &style,
            );
        }
    }

    fn draw_frame(&self, surface: &mut dyn DrawingSurface, progress: f64) {
        let limit = TAU * progress.clamp(0.0, 1.0);
        surface.clear_rect(self.disc_bounds());
        if self.pie.is_empty() {
            surface.fill_arc(self.pie.center, self.pie.radius, 0.0, limit, Color::LIGHT_GRAY);
            return;
        }
        for slice in &self.pie.slices {
            if slice.start_angle >= limit {
                break;
            }
            let end = slice.end_angle.min(limit);
            if end > slice.start_angle {
                surface.fill_arc(self.pie.center, self.pie.radius, slice.start_angle, end, slice.color);
            }
        }
        tracing::trace!(progress, "pie frame");
    }

    fn draw_settled(&self, surface: &mut dyn DrawingSurface) {
        let style = self.centered();
        if self.pie.is_empty() {
            surface.draw_text(EMPTY_LABEL, self.pie.center, &style);
        } else {
            let label_radius = self.pie.radius * LABEL_RADIUS;
            for slice in self.pie.slices.iter().filter(|s| s.sweep() > 0.0) {
                let angle = slice.mid_angle();
                let at = LayoutPoint::new(
                    self.pie.center.x + label_radius * angle.cos(),
                    self.pie.center.y + label_radius * angle.sin(),
                );
                surface.draw_text(&format!("{:.2}%", slice.percentage), at, &style);
            }
        }
        draw_legend(surface, &self.pie.legend, FONT, self.text_color);
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<Tooltip> {
        if self.pie.is_empty() {
            return None;
        }
        let dx = x - self.pie.center.x;
        let dy = y - self.pie.center.y;
        if dx.hypot(dy) > self.pie.radius {
            return None;
        }
        let angle = dy.atan2(dx).rem_euclid(TAU);
        let last = self.pie.slices.iter().rposition(|s| s.sweep() > 0.0)?;
        self.pie
            .slices
            .iter()
            .enumerate()
            .find(|(i, s)| {
                s.sweep() > 0.0
                    && angle >= s.start_angle
                    && (angle < s.end_angle || (*i == last && angle <= s.end_angle))
            })
            .map(|(_, s)| Tooltip::at_cursor(format!("{}: {:.2}%", s.label, s.percentage), x, y))
    }
}
