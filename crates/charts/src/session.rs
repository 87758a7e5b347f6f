//! Chart session: the state behind one on-screen chart
//!
//! A session owns the active renderer, its animation and its pan/zoom view.
//! Each `render` starts a new generation; frame tokens from older
//! generations are dropped without drawing.

use serde::Serialize;

use crate::animation::{AnimationPhase, AnimationSession, FrameScheduler, FrameToken, ManualScheduler};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PointerEvent, Tooltip};
use crate::layout::LayoutResult;
use crate::model::{ChartKind, RenderRequest};
use crate::render::{build_renderer, ChartRenderer};
use crate::surface::DrawingSurface;
use crate::svg::SvgDocument;

/// What a render decided beyond the drawing itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub generation: u64,
    pub kind: ChartKind,
    /// Bar thickness the host control should be reset to
    pub corrected_thickness: Option<f64>,
    pub layout: Option<LayoutResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FrameOutcome {
    /// Token from a superseded render or a finished animation; nothing drawn
    Stale,
    Continued { progress: f64 },
    Settled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointerOutcome {
    pub tooltip: Option<Tooltip>,
    /// Whether the view changed and the surface was repainted
    pub redrawn: bool,
}

struct ActiveChart {
    renderer: Box<dyn ChartRenderer>,
    animation: AnimationSession,
    width: f64,
    height: f64,
}

pub struct ChartSession<S: FrameScheduler> {
    scheduler: S,
    generation: u64,
    active: Option<ActiveChart>,
}

impl<S: FrameScheduler> ChartSession<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            generation: 0,
            active: None,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> AnimationPhase {
        self.active
            .as_ref()
            .map_or(AnimationPhase::Idle, |a| a.animation.phase())
    }

    /// Lay out `request` for the surface's current size and start animating.
    ///
    /// A rejected request leaves the previous chart untouched.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        request: &RenderRequest<'_>,
    ) -> ChartResult<RenderReport> {
        let width = surface.width();
        let height = surface.height();
        let renderer = build_renderer(request, &*surface)?;

        self.generation += 1;
        let animation = AnimationSession::new(self.generation, renderer.animation_steps());

        surface.clear();
        renderer.draw_static(surface);
        self.scheduler.request_frame(animation.token());

        let report = RenderReport {
            generation: self.generation,
            kind: renderer.kind(),
            corrected_thickness: renderer.corrected_thickness(),
            layout: renderer.layout().copied(),
        };
        tracing::debug!(
            generation = self.generation,
            kind = renderer.kind().name(),
            width,
            height,
            steps = renderer.animation_steps(),
            "render started"
        );

        self.active = Some(ActiveChart {
            renderer,
            animation,
            width,
            height,
        });
        Ok(report)
    }

    /// Draw the frame `token` was issued for, if it is still current
    pub fn on_frame(&mut self, surface: &mut dyn DrawingSurface, token: FrameToken) -> FrameOutcome {
        let Some(active) = self.active.as_mut() else {
            return FrameOutcome::Stale;
        };
        if !active.animation.accepts(token) {
            tracing::trace!(
                token = token.generation(),
                current = active.animation.generation(),
                "dropping stale frame"
            );
            return FrameOutcome::Stale;
        }

        let progress = active.animation.advance();
        active.renderer.draw_frame(surface, progress);
        if active.animation.is_settled() {
            active.renderer.draw_settled(surface);
            tracing::debug!(generation = active.animation.generation(), "animation settled");
            FrameOutcome::Settled
        } else {
            self.scheduler.request_frame(token);
            FrameOutcome::Continued { progress }
        }
    }

    /// Route pointer input; pan and zoom apply only to a settled line chart
    pub fn pointer(&mut self, surface: &mut dyn DrawingSurface, event: PointerEvent) -> PointerOutcome {
        let Some(active) = self.active.as_mut() else {
            return PointerOutcome::default();
        };
        let settled = active.animation.is_settled();
        let renderer = &mut active.renderer;

        let (changed, cursor) = match event {
            PointerEvent::Down { x, y } => {
                if settled {
                    if let Some(view) = renderer.pan_zoom_mut() {
                        view.begin_drag(x);
                    }
                }
                (false, Some((x, y)))
            }
            PointerEvent::Move { x, y } => {
                let changed = settled
                    && renderer
                        .pan_zoom_mut()
                        .map_or(false, |view| view.drag_to(x));
                (changed, Some((x, y)))
            }
            PointerEvent::Up => {
                if let Some(view) = renderer.pan_zoom_mut() {
                    view.end_drag();
                }
                (false, None)
            }
            PointerEvent::Leave => {
                if let Some(view) = renderer.pan_zoom_mut() {
                    view.end_drag();
                }
                (false, None)
            }
            PointerEvent::Wheel { x, y, delta_y } => {
                let changed = settled
                    && renderer
                        .pan_zoom_mut()
                        .map_or(false, |view| view.zoom_wheel(delta_y));
                (changed, Some((x, y)))
            }
        };

        if changed {
            renderer.redraw(surface);
        }
        PointerOutcome {
            tooltip: cursor.and_then(|(x, y)| renderer.hit_test(x, y)),
            redrawn: changed,
        }
    }

    /// SVG of the active chart's settled frame at its current view
    pub fn export_vector(&self) -> ChartResult<String> {
        let active = self.active.as_ref().ok_or(ChartError::NothingRendered)?;
        let mut document = SvgDocument::new(active.width, active.height);
        active.renderer.redraw(&mut document);
        Ok(document.finish())
    }

    /// Current pan offset and zoom level of a line chart
    pub fn view(&self) -> Option<(f64, f64)> {
        let view = self.active.as_ref()?.renderer.pan_zoom()?;
        Some((view.pan_offset(), view.zoom_level()))
    }
}

impl ChartSession<ManualScheduler> {
    /// Deliver queued frames until none remain; returns how many drew
    pub fn run_until_idle(&mut self, surface: &mut dyn DrawingSurface) -> usize {
        let mut drawn = 0;
        while let Some(token) = self.scheduler.next() {
            if self.on_frame(surface, token) != FrameOutcome::Stale {
                drawn += 1;
            }
        }
        drawn
    }
}
