//! End-to-end rendering properties across both backends

use charts::{
    export_vector, render, CanvasSurface, ChartKind, ChartLabels, ChartOptions, ChartSession, DrawCommand,
    FrameOutcome, LayoutResult, ManualScheduler, Palette, PointerEvent, RenderRequest, SeriesConfig, Table,
};

fn table(rows: &[&[&str]]) -> Table {
    Table::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
    .unwrap()
}

fn sales() -> Table {
    table(&[
        &["Month", "Revenue", "Costs", "Margin"],
        &["Jan", "120", "80", "40"],
        &["Feb", "150", "95", "55"],
        &["Mar", "90", "70", "20"],
        &["Apr", "180", "100", "80"],
        &["May", "160", "110", "50"],
    ])
}

struct Inputs {
    table: Table,
    labels: ChartLabels,
    series: SeriesConfig,
    options: ChartOptions,
}

impl Inputs {
    fn new(table: Table) -> Self {
        let series = SeriesConfig::for_table(&table);
        Self {
            table,
            labels: ChartLabels::new("Quarterly", "Month", "USD"),
            series,
            options: ChartOptions::default(),
        }
    }

    fn request(&self, kind: ChartKind) -> RenderRequest<'_> {
        RenderRequest {
            kind,
            table: &self.table,
            labels: &self.labels,
            series: &self.series,
            options: &self.options,
        }
    }
}

fn animate(inputs: &Inputs, kind: ChartKind, width: f64, height: f64) -> (CanvasSurface, Option<LayoutResult>) {
    let mut session = ChartSession::new(ManualScheduler::new());
    let mut canvas = CanvasSurface::new(width, height, 2.0);
    let report = session.render(&mut canvas, &inputs.request(kind)).unwrap();
    let mut last = FrameOutcome::Stale;
    while let Some(token) = session.scheduler_mut().next() {
        last = session.on_frame(&mut canvas, token);
        assert_eq!(canvas.clip_depth(), 0);
    }
    assert_eq!(last, FrameOutcome::Settled);
    (canvas, report.layout)
}

fn circles(canvas: &CanvasSurface) -> Vec<(f64, f64)> {
    canvas
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Circle { cx, cy, .. } => Some((*cx, *cy)),
            _ => None,
        })
        .collect()
}

fn polylines(canvas: &CanvasSurface) -> Vec<Vec<(f64, f64)>> {
    canvas
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Polyline { points, .. } => Some(points.clone()),
            _ => None,
        })
        .collect()
}

/// Point lists of every `<path d="M x,y L x,y ...">` in an SVG document
fn svg_polylines(svg: &str) -> Vec<Vec<(f64, f64)>> {
    svg.lines()
        .filter(|line| line.starts_with("<path d=\"M ") && line.contains("fill=\"none\""))
        .map(|line| {
            let start = line.find("d=\"").unwrap() + 3;
            let end = start + line[start..].find('"').unwrap();
            line[start..end]
                .split(|c| c == 'M' || c == 'L')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|pair| {
                    let (x, y) = pair.split_once(',').unwrap();
                    (x.parse().unwrap(), y.parse().unwrap())
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_settled_points_match_layout_formulas() {
    let inputs = Inputs::new(sales());
    let (canvas, layout) = animate(&inputs, ChartKind::Line, 900.0, 600.0);
    let layout = layout.unwrap();

    let mut expected = Vec::new();
    for series in 0..inputs.table.series_count() {
        for (i, value) in inputs.table.series_values(series).iter().enumerate() {
            let x = layout.plot.x + i as f64 * layout.category_step;
            let y = layout.plot.bottom()
                - (value - layout.value_scale.min) / (layout.value_scale.max - layout.value_scale.min)
                    * layout.plot.height;
            expected.push((x, y));
        }
    }

    let drawn = circles(&canvas);
    assert_eq!(drawn.len(), expected.len());
    for ((dx, dy), (ex, ey)) in drawn.iter().zip(&expected) {
        assert!((dx - ex).abs() < 1e-9 && (dy - ey).abs() < 1e-9, "{dx},{dy} vs {ex},{ey}");
    }

    // no animation residue: each polyline reaches the last category
    for line in polylines(&canvas) {
        assert_eq!(line.len(), inputs.table.category_count());
    }
}

#[test]
fn test_vector_export_is_idempotent() {
    let inputs = Inputs::new(sales());
    for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Bar3d, ChartKind::Pie] {
        let first = export_vector(&inputs.request(kind), 800.0, 600.0).unwrap();
        let second = export_vector(&inputs.request(kind), 800.0, 600.0).unwrap();
        assert_eq!(first, second, "{kind:?} export differs between runs");
        assert!(first.starts_with("<svg "));
    }
}

#[test]
fn test_canvas_and_vector_lines_agree() {
    let inputs = Inputs::new(sales());
    let (canvas, _) = animate(&inputs, ChartKind::Line, 800.0, 600.0);
    let svg = export_vector(&inputs.request(ChartKind::Line), 800.0, 600.0).unwrap();

    let raster = polylines(&canvas);
    let vector = svg_polylines(&svg);
    assert_eq!(raster.len(), 3);
    assert_eq!(raster.len(), vector.len());
    for (r, v) in raster.iter().zip(&vector) {
        assert_eq!(r.len(), v.len());
        for ((rx, ry), (vx, vy)) in r.iter().zip(v) {
            assert!((rx - vx).abs() < 1e-9 && (ry - vy).abs() < 1e-9);
        }
    }
}

#[test]
fn test_session_export_follows_current_view() {
    let inputs = Inputs::new(sales());
    let mut session = ChartSession::new(ManualScheduler::new());
    let mut canvas = CanvasSurface::new(800.0, 600.0, 1.0);
    session.render(&mut canvas, &inputs.request(ChartKind::Line)).unwrap();
    session.run_until_idle(&mut canvas);

    let default_view = session.export_vector().unwrap();
    assert_eq!(default_view, export_vector(&inputs.request(ChartKind::Line), 800.0, 600.0).unwrap());

    for _ in 0..5 {
        session.pointer(&mut canvas, PointerEvent::Wheel { x: 400.0, y: 300.0, delta_y: -100.0 });
    }
    session.pointer(&mut canvas, PointerEvent::Down { x: 400.0, y: 300.0 });
    session.pointer(&mut canvas, PointerEvent::Move { x: 300.0, y: 300.0 });
    session.pointer(&mut canvas, PointerEvent::Up);

    let zoomed = session.export_vector().unwrap();
    assert_ne!(zoomed, default_view);
    assert_eq!(svg_polylines(&zoomed), polylines(&canvas));
}

#[test]
fn test_bar_scenario_four_bars() {
    let inputs = Inputs::new(table(&[&["Month", "A", "B"], &["Jan", "10", "20"], &["Feb", "30", "5"]]));
    let (canvas, layout) = animate(&inputs, ChartKind::Bar, 800.0, 600.0);
    let layout = layout.unwrap();

    // commands after the last plot clear belong to the final frame
    let commands = canvas.commands();
    let last_clear = commands
        .iter()
        .rposition(|cmd| matches!(cmd, DrawCommand::ClearRect { .. }))
        .unwrap();
    let bars: Vec<(f64, f64, f64)> = commands[last_clear..]
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Rect { x, y, height, .. } => Some((*x, *y, *height)),
            _ => None,
        })
        .collect();

    assert_eq!(bars.len(), 4);
    let plot = layout.plot;
    for (x, _, _) in &bars {
        assert!(*x >= plot.x && *x <= plot.right());
    }
    let tallest = bars.iter().map(|b| b.2).fold(0.0, f64::max);
    assert!((tallest - plot.height).abs() < 1e-9);
    assert_eq!(layout.value_scale.max, 30.0);
}

#[test]
fn test_bar_groups_do_not_overlap() {
    let mut inputs = Inputs::new(sales());
    inputs.options.bar_thickness = Some(10_000.0);
    let report = render(&mut CanvasSurface::new(640.0, 480.0, 1.0), &inputs.request(ChartKind::Bar)).unwrap();
    let layout = report.layout.unwrap();
    let thickness = report.corrected_thickness.unwrap();
    assert!(thickness * 3.0 <= layout.category_step);
}

#[test]
fn test_pie_scenario_angles_and_percentages() {
    let inputs = Inputs::new(table(&[&["Cat", "Val"], &["X", "1"], &["Y", "1"], &["Z", "2"]]));
    let (canvas, _) = animate(&inputs, ChartKind::Pie, 800.0, 600.0);

    let wedges: Vec<f64> = canvas
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Wedge { start_angle, end_angle, .. } => Some(end_angle - start_angle),
            _ => None,
        })
        .collect();
    let settled = &wedges[wedges.len() - 3..];
    let quarter = std::f64::consts::FRAC_PI_2;
    assert!((settled[0] - quarter).abs() < 1e-9);
    assert!((settled[1] - quarter).abs() < 1e-9);
    assert!((settled[2] - 2.0 * quarter).abs() < 1e-9);

    let labels: Vec<&str> = canvas
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } if text.ends_with('%') => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["25.00%", "25.00%", "50.00%"]);
}

#[test]
fn test_single_category_line() {
    let inputs = Inputs::new(table(&[&["Cat", "S1"], &["only", "5"]]));
    let (canvas, layout) = animate(&inputs, ChartKind::Line, 600.0, 400.0);
    let layout = layout.unwrap();

    assert!(polylines(&canvas).is_empty());
    let points = circles(&canvas);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].0, layout.plot.center_x());
    assert!(points[0].1.is_finite());
}

#[test]
fn test_zero_pie_has_no_nan() {
    let inputs = Inputs::new(table(&[&["Cat", "Val"], &["X", "0"], &["Y", "0"]]));
    let svg = export_vector(&inputs.request(ChartKind::Pie), 600.0, 400.0).unwrap();
    assert!(!svg.contains("NaN"));
    assert!(svg.contains("No data"));
    assert!(svg.contains("<circle"));
}

#[test]
fn test_disable_and_reenable_series() {
    let mut inputs = Inputs::new(sales());
    let palette = Palette::default();
    let legend_colors = |canvas: &CanvasSurface| -> Vec<String> {
        canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { width, height, fill, .. } if *width == 20.0 && *height == 20.0 => {
                    Some(fill.clone())
                }
                _ => None,
            })
            .collect()
    };

    inputs.series.set_enabled(0, false).unwrap();
    let mut canvas = CanvasSurface::new(800.0, 600.0, 1.0);
    render(&mut canvas, &inputs.request(ChartKind::Line)).unwrap();
    assert_eq!(polylines(&canvas).len(), 2);
    assert_eq!(
        legend_colors(&canvas),
        vec![palette.color_at(1).to_css(), palette.color_at(2).to_css()]
    );

    inputs.series.set_enabled(0, true).unwrap();
    render(&mut canvas, &inputs.request(ChartKind::Line)).unwrap();
    assert_eq!(legend_colors(&canvas)[0], palette.color_at(0).to_css());
}

#[test]
fn test_stale_config_rejected() {
    let inputs = Inputs::new(sales());
    let narrower = table(&[&["Month", "Only"], &["Jan", "1"]]);
    let request = RenderRequest {
        table: &narrower,
        ..inputs.request(ChartKind::Bar)
    };
    assert!(matches!(
        export_vector(&request, 800.0, 600.0),
        Err(charts::ChartError::SeriesMismatch { expected: 1, found: 3 })
    ));
}

#[test]
fn test_extreme_values_stay_finite() {
    let inputs = Inputs::new(table(&[&["Cat", "S"], &["a", "-1e308"], &["b", "1e308"]]));
    for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Bar3d] {
        let svg = export_vector(&inputs.request(kind), 800.0, 600.0).unwrap();
        assert!(!svg.contains("NaN"), "{kind:?} export contains NaN");
        assert!(!svg.contains("inf"), "{kind:?} export contains inf");
    }

    let pie = Inputs::new(table(&[&["Cat", "S"], &["a", "1e308"], &["b", "1e308"]]));
    let svg = export_vector(&pie.request(ChartKind::Pie), 800.0, 600.0).unwrap();
    assert!(!svg.contains("NaN"));
    assert!(!svg.contains("No data"));
    assert_eq!(svg.matches("50.00%").count(), 2);
}

#[test]
fn test_tooltip_follows_pan_and_zoom() {
    let inputs = Inputs::new(table(&[&["Cat", "S"], &["a", "0"], &["b", "10"], &["c", "5"]]));
    let mut session = ChartSession::new(ManualScheduler::new());
    let mut canvas = CanvasSurface::new(800.0, 600.0, 1.0);
    let report = session.render(&mut canvas, &inputs.request(ChartKind::Line)).unwrap();
    session.run_until_idle(&mut canvas);
    let layout = report.layout.unwrap();

    for _ in 0..5 {
        session.pointer(&mut canvas, PointerEvent::Wheel { x: 400.0, y: 300.0, delta_y: -1.0 });
    }
    session.pointer(&mut canvas, PointerEvent::Down { x: 400.0, y: 300.0 });
    session.pointer(&mut canvas, PointerEvent::Move { x: 300.0, y: 300.0 });
    session.pointer(&mut canvas, PointerEvent::Up);

    let (pan, zoom) = session.view().unwrap();
    assert!((pan + 100.0).abs() < 1e-9);
    assert!((zoom - 1.5).abs() < 1e-9);

    let y = layout.value_scale.to_pixel(10.0);
    let drawn_x = layout.plot.x + layout.category_step;
    let viewed_x = layout.plot.x + layout.category_step * zoom + pan;

    let hit = session.pointer(&mut canvas, PointerEvent::Move { x: viewed_x, y });
    assert_eq!(hit.tooltip.map(|t| t.text), Some("S: 10".to_string()));
    assert!(!hit.redrawn);

    let miss = session.pointer(&mut canvas, PointerEvent::Move { x: drawn_x, y });
    assert!(miss.tooltip.is_none());
}
