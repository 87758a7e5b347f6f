//! One-shot rendering and vector export

use crate::error::ChartResult;
use crate::model::RenderRequest;
use crate::render::build_renderer;
use crate::session::RenderReport;
use crate::surface::DrawingSurface;
use crate::svg::SvgDocument;

/// Draw the settled frame of `request` onto `surface` without animating
pub fn render(surface: &mut dyn DrawingSurface, request: &RenderRequest<'_>) -> ChartResult<RenderReport> {
    let renderer = build_renderer(request, &*surface)?;
    renderer.redraw(surface);
    Ok(RenderReport {
        generation: 0,
        kind: renderer.kind(),
        corrected_thickness: renderer.corrected_thickness(),
        layout: renderer.layout().copied(),
    })
}

/// SVG document of the settled frame at the default view
pub fn export_vector(request: &RenderRequest<'_>, width: f64, height: f64) -> ChartResult<String> {
    let mut document = SvgDocument::new(width, height);
    render(&mut document, request)?;
    tracing::debug!(kind = request.kind.name(), width, height, "exported vector chart");
    Ok(document.finish())
}
