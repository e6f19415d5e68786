//! Gantt charts rendered with `plotters`.
//!
//! One row per machine (M0 on top), one bar per operation coloured by job
//! and labelled `J{job}-{op}`.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::ExportError;
use crate::models::Schedule;

const WIDTH: u32 = 1000;
const ROW_HEIGHT: u32 = 50;
const CHROME_HEIGHT: u32 = 120;
const BAR_INSET: f64 = 0.1;

fn chart_size(rows: usize) -> (u32, u32) {
    (WIDTH, CHROME_HEIGHT + ROW_HEIGHT * rows as u32)
}

fn machine_rows(schedule: &Schedule) -> usize {
    schedule
        .by_machine()
        .keys()
        .next_back()
        .map(|&m| m + 1)
        .unwrap_or(1)
}

fn draw_gantt<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    schedule: &Schedule,
    title: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let rows = machine_rows(schedule);
    let horizon = schedule.max_end().max(1) as f64;
    // Row of machine `m` spans [rows - m - 1, rows - m] so M0 ends up on top.
    let row_top = |m: usize| (rows - m) as f64;

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .margin_left(50)
        .x_label_area_size(35)
        .build_cartesian_2d(0f64..horizon, 0f64..rows as f64)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("time")
        .draw()?;

    chart.draw_series(schedule.ops().iter().map(|op| {
        let top = row_top(op.machine_id) - BAR_INSET;
        let bottom = row_top(op.machine_id) - 1.0 + BAR_INSET;
        Rectangle::new(
            [(op.start as f64, bottom), (op.end as f64, top)],
            Palette99::pick(op.job_id).filled(),
        )
    }))?;

    chart.draw_series(schedule.ops().iter().map(|op| {
        let top = row_top(op.machine_id) - BAR_INSET;
        let bottom = row_top(op.machine_id) - 1.0 + BAR_INSET;
        Rectangle::new([(op.start as f64, bottom), (op.end as f64, top)], BLACK.stroke_width(1))
    }))?;

    let bar_label = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(schedule.ops().iter().map(|op| {
        let middle = (op.start + op.end) as f64 / 2.0;
        Text::new(
            format!("J{}-{}", op.job_id, op.op_index),
            (middle, row_top(op.machine_id) - 0.5),
            bar_label.clone(),
        )
    }))?;

    let row_label = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for m in 0..rows {
        let (x, y) = chart.backend_coord(&(0.0, row_top(m) - 0.5));
        root.draw(&Text::new(format!("M{m}"), (x - 8, y), row_label.clone()))?;
    }

    root.present()?;
    Ok(())
}

fn chart_error<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Chart(err.to_string())
}

/// Writes the Gantt chart of `schedule` to an SVG file.
pub fn save_gantt(schedule: &Schedule, title: &str, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let size = chart_size(machine_rows(schedule));
    let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    draw_gantt(root, schedule, title).map_err(chart_error)
}

/// Renders the Gantt chart of `schedule` as an SVG document.
pub fn gantt_svg(schedule: &Schedule, title: &str) -> Result<String, ExportError> {
    let size = chart_size(machine_rows(schedule));
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_gantt(root, schedule, title).map_err(chart_error)?;
    }
    Ok(svg)
}
