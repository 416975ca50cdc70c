//! Status bar - filter, split, trigger and output state

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use phosphor_dsp::dsp::Poles;
use phosphor_dsp::engine::ScopeRouting;
use phosphor_dsp::scope::TriggerEdge;
use phosphor_dsp::ScopeController;

pub fn render_status(frame: &mut Frame, area: Rect, controller: &ScopeController, source: &str) {
    let block = Block::default()
        .title(format!(" phosphor · {source} "))
        .borders(Borders::ALL);

    let params = controller.params();
    let paused = params.paused();
    let (mx, my) = params.morph_position();

    let play_symbol = if paused { "⏸" } else { "▶" };
    let poles = match params.poles() {
        Poles::Two => "12dB",
        Poles::Four => "24dB",
    };
    let routing = match params.routing() {
        ScopeRouting::Morph => "morph".to_string(),
        ScopeRouting::Router => format!(
            "{} ({}/{})",
            controller.router().split_mode().name(),
            controller.router().x_output().name(),
            controller.router().y_output().name()
        ),
    };
    let edge = match params.trigger_edge() {
        TriggerEdge::Rising => "↑",
        TriggerEdge::Falling => "↓",
    };

    let filter = if params.filter_enabled() {
        format!(
            "{:>6.1} Hz  res {:.2}  {}  ",
            params.cutoff(),
            params.resonance(),
            poles
        )
    } else {
        "filter off  ".to_string()
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {play_symbol}  "),
            Style::default().fg(if paused { Color::Yellow } else { Color::Green }),
        ),
        Span::styled(filter, Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("morph ({mx:+.2},{my:+.2})  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "split {:+.0}° / {:.2}  ",
                params.split_angle(),
                params.split_depth()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{routing}  "), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!(
                "trig {edge}{:+.2} #{}  ",
                params.threshold(),
                controller.marker().count()
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "gain {:.2}  {:.1}kHz",
                controller.current_gain(),
                controller.sample_rate() / 1000.0
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
