//! Scope widget: X/Y figure or triggered sweep

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use phosphor_dsp::scope::StereoFrame;

use super::DisplayMode;

/// Headroom above full scale so resonant peaks stay on screen.
const RANGE: f64 = 1.25;

pub fn render_scope(
    frame: &mut Frame,
    area: Rect,
    mode: DisplayMode,
    frames: &[StereoFrame],
    triggered: bool,
) {
    match mode {
        DisplayMode::Xy => render_xy(frame, area, frames),
        DisplayMode::Sweep => render_sweep(frame, area, frames, triggered),
    }
}

fn render_xy(frame: &mut Frame, area: Rect, frames: &[StereoFrame]) {
    let block = Block::default().title(" X/Y ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = frames
        .iter()
        .map(|f| (f.left as f64, f.right as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Green))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([-RANGE, RANGE])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-RANGE, RANGE])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

fn render_sweep(frame: &mut Frame, area: Rect, frames: &[StereoFrame], triggered: bool) {
    let title = if triggered {
        " Sweep (triggered) "
    } else {
        " Sweep (free-run) "
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let len = frames.len().max(1) as f64;
    let left: Vec<(f64, f64)> = frames
        .iter()
        .enumerate()
        .map(|(i, f)| (i as f64 / len, f.left as f64))
        .collect();
    let right: Vec<(f64, f64)> = frames
        .iter()
        .enumerate()
        .map(|(i, f)| (i as f64 / len, f.right as f64))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("X")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&left),
        Dataset::default()
            .name("Y")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&right),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-RANGE, RANGE])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
