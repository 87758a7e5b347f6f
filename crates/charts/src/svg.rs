//! Vector backend
//!
//! `SvgDocument` implements `DrawingSurface` by writing SVG elements.
//! Clip regions become `<clipPath>` definitions with sequential ids, so the
//! same drawing calls always yield the same bytes.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use crate::layout::{LayoutPoint, LayoutRect};
use crate::model::Color;
use crate::surface::{DrawingSurface, Stroke, TextAlign, TextBaseline, TextStyle, FONT_FAMILY};

#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    next_clip_id: usize,
    open_groups: usize,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
            next_clip_id: 0,
            open_groups: 0,
        }
    }

    /// Close any open clip groups and produce the document text
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.pop_clip();
        }
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height),
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>\n");
            svg.push_str(&self.defs);
            svg.push_str("</defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn fill_attrs(color: Color) -> String {
        if color.a == 255 {
            format!(r#"fill="{}""#, color.to_hex())
        } else {
            format!(
                r#"fill="{}" fill-opacity="{}""#,
                Color::rgb(color.r, color.g, color.b).to_hex(),
                num(color.opacity())
            )
        }
    }

    fn stroke_attrs(stroke: &Stroke) -> String {
        let color = stroke.color;
        let mut attrs = format!(
            r#"stroke="{}" stroke-width="{}""#,
            Color::rgb(color.r, color.g, color.b).to_hex(),
            num(stroke.width)
        );
        if color.a != 255 {
            let _ = write!(attrs, r#" stroke-opacity="{}""#, num(color.opacity()));
        }
        if !stroke.dash.is_empty() {
            let dash: Vec<String> = stroke.dash.iter().map(|d| num(*d)).collect();
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, dash.join(" "));
        }
        attrs
    }
}

/// Shortest round-trip number text, without negative zero
fn num(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wedge path from the center out along `start_angle`, clockwise to `end_angle`
fn wedge_path(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let large_arc = if end_angle - start_angle > PI { 1 } else { 0 };
    let (sx, sy) = (cx + radius * start_angle.cos(), cy + radius * start_angle.sin());
    let (ex, ey) = (cx + radius * end_angle.cos(), cy + radius * end_angle.sin());
    format!(
        "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
        num(cx),
        num(cy),
        num(sx),
        num(sy),
        num(radius),
        num(radius),
        large_arc,
        num(ex),
        num(ey)
    )
}

impl DrawingSurface for SvgDocument {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    /// A document starts blank; a full clear restarts it
    fn clear(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.next_clip_id = 0;
        self.open_groups = 0;
    }

    fn clear_rect(&mut self, _rect: LayoutRect) {}

    fn draw_line(&mut self, from: LayoutPoint, to: LayoutPoint, stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            Self::stroke_attrs(stroke)
        );
    }

    fn draw_polyline(&mut self, points: &[LayoutPoint], stroke: &Stroke) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut d = format!("M {},{}", num(first.x), num(first.y));
        for p in rest {
            let _ = write!(d, " L {},{}", num(p.x), num(p.y));
        }
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" {} stroke-linejoin="round"/>"#,
            d,
            Self::stroke_attrs(stroke)
        );
    }

    fn fill_rect(&mut self, rect: LayoutRect, fill: Color) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            Self::fill_attrs(fill)
        );
    }

    fn fill_polygon(&mut self, points: &[LayoutPoint], fill: Color) {
        if points.len() < 3 {
            return;
        }
        let pts: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect();
        let _ = writeln!(
            self.body,
            r#"<polygon points="{}" {}/>"#,
            pts.join(" "),
            Self::fill_attrs(fill)
        );
    }

    fn fill_arc(&mut self, center: LayoutPoint, radius: f64, start_angle: f64, end_angle: f64, fill: Color) {
        let sweep = end_angle - start_angle;
        if !(sweep > 0.0) || !(radius > 0.0) {
            return;
        }
        if sweep >= TAU - 1e-9 {
            self.fill_circle(center, radius, fill);
            return;
        }
        let _ = writeln!(
            self.body,
            r#"<path d="{}" {}/>"#,
            wedge_path(center.x, center.y, radius, start_angle, end_angle),
            Self::fill_attrs(fill)
        );
    }

    fn fill_circle(&mut self, center: LayoutPoint, radius: f64, fill: Color) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            num(center.x),
            num(center.y),
            num(radius),
            Self::fill_attrs(fill)
        );
    }

    fn draw_text(&mut self, text: &str, position: LayoutPoint, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match style.baseline {
            TextBaseline::Top => "hanging",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
        };
        let weight = if style.font.bold { r#" font-weight="bold""# } else { "" };
        let transform = if style.rotation != 0.0 {
            format!(
                r#" transform="rotate({} {} {})""#,
                num((style.rotation.to_degrees() * 1e6).round() / 1e6),
                num(position.x),
                num(position.y)
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}"{} {} text-anchor="{}" dominant-baseline="{}"{}>{}</text>"#,
            num(position.x),
            num(position.y),
            FONT_FAMILY,
            num(style.font.size),
            weight,
            Self::fill_attrs(style.color),
            anchor,
            baseline,
            transform,
            escape_xml(text)
        );
    }

    fn push_clip(&mut self, rect: LayoutRect) {
        let id = self.next_clip_id;
        self.next_clip_id += 1;
        let _ = writeln!(
            self.defs,
            r#"<clipPath id="clip-{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            id,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        );
        let _ = writeln!(self.body, r#"<g clip-path="url(#clip-{})">"#, id);
        self.open_groups += 1;
    }

    fn pop_clip(&mut self) {
        if self.open_groups == 0 {
            return;
        }
        self.open_groups -= 1;
        self.body.push_str("</g>\n");
    }
}
