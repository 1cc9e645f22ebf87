//! Chart Component
//!
//! Draws a [`ChartSpec`] (pie or line) on an HTML5 canvas.

use aftersales::views::{ChartKind, ChartSpec};
use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const AXIS_TEXT: &str = "#9ca3af"; // gray-400

/// Canvas chart with an HTML legend
#[component]
pub fn ChartCanvas(spec: ChartSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    let spec_for_draw = spec.clone();
    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw(&canvas, &spec_for_draw);
        }
    });

    let legend = if spec.kind == ChartKind::Pie {
        spec.points
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let color = spec.color_for(idx);
                view! {
                    <div class="flex items-center space-x-2">
                        <div
                            class="w-3 h-3 rounded-full"
                            style=format!("background-color: {}", color)
                        />
                        <span class="text-sm text-gray-300">
                            {format!("{} ({})", point.label, point.value)}
                        </span>
                    </div>
                }
            })
            .collect_view()
    } else {
        ().into_view()
    };

    view! {
        <div class="relative">
            <h3 class="text-lg font-semibold mb-2">{spec.title.clone()}</h3>
            <canvas
                node_ref=canvas_ref
                width="600"
                height="300"
                class="w-full h-64 rounded-lg"
            />
            <div class="flex justify-center flex-wrap gap-4 mt-4">{legend}</div>
        </div>
    }
}

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn draw(canvas: &HtmlCanvasElement, spec: &ChartSpec) {
    let Some(ctx) = context(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if spec.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 30.0, height / 2.0);
        return;
    }

    match spec.kind {
        ChartKind::Pie => draw_pie(&ctx, spec, width, height),
        ChartKind::Line => draw_line(&ctx, spec, width, height),
    }
}

fn draw_pie(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64) {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let radius = cx.min(cy) - 20.0;

    let mut start = -PI / 2.0;
    for (idx, share) in spec.shares().into_iter().enumerate() {
        let end = start + share * 2.0 * PI;
        ctx.set_fill_style(&spec.color_for(idx).into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
        start = end;
    }

    // Doughnut hole
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, radius * 0.55, 0.0, 2.0 * PI);
    ctx.fill();

    ctx.set_fill_style(&"#ffffff".into());
    ctx.set_font("bold 20px sans-serif");
    let _ = ctx.fill_text(&spec.total().to_string(), cx - 12.0, cy + 7.0);
}

fn draw_line(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64) {
    let margin_left = 40.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let max = spec.max_value().max(1) as f64;
    let steps = (spec.points.len().max(2) - 1) as f64;

    // Horizontal grid lines with y labels
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=4 {
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = max - (i as f64 / 4.0) * max;
        ctx.set_fill_style(&AXIS_TEXT.into());
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    let position = |idx: usize, value: u64| {
        let x = margin_left + (idx as f64 / steps) * chart_width;
        let y = margin_top + (1.0 - value as f64 / max) * chart_height;
        (x, y)
    };

    let color = spec.color_for(0);
    ctx.set_stroke_style(&color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (idx, point) in spec.points.iter().enumerate() {
        let (x, y) = position(idx, point.value);
        if idx == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&color.into());
    for (idx, point) in spec.points.iter().enumerate() {
        let (x, y) = position(idx, point.value);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 3.0, 0.0, 2.0 * PI);
        ctx.fill();
    }

    // Every fifth day label, plus the last one
    ctx.set_fill_style(&AXIS_TEXT.into());
    let last = spec.points.len() - 1;
    for (idx, point) in spec.points.iter().enumerate() {
        if idx % 5 == 0 || idx == last {
            let (x, _) = position(idx, 0);
            let _ = ctx.fill_text(&point.label, x - 15.0, height - 10.0);
        }
    }
}
