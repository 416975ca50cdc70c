//! TUI module for phosphor
//!
//! Draws the scope and maps keys onto the engine's parameter setters.

mod scope_view;
mod status;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use std::time::Duration;

use phosphor_dsp::engine::ScopeRouting;
use phosphor_dsp::dsp::Poles;
use phosphor_dsp::scope::StereoFrame;
use phosphor_dsp::ScopeController;

use scope_view::render_scope;
use status::render_status;

/// Frames drawn in X/Y mode.
const XY_POINTS: usize = 2048;
/// Samples one arrow-key scrub moves while paused.
const SCRUB_SAMPLES: i64 = 480;
const CUTOFF_STEP: f32 = 1.06;
const MORPH_STEP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Left against right.
    Xy,
    /// Both channels against time, aligned to the trigger.
    Sweep,
}

impl DisplayMode {
    fn toggled(self) -> Self {
        match self {
            DisplayMode::Xy => DisplayMode::Sweep,
            DisplayMode::Sweep => DisplayMode::Xy,
        }
    }
}

pub struct UiApp<'a> {
    controller: &'a mut ScopeController,
    source_label: String,
    mode: DisplayMode,
    xy: Vec<StereoFrame>,
    sweep: Vec<StereoFrame>,
    triggered: bool,
    should_quit: bool,
}

impl<'a> UiApp<'a> {
    pub fn new(controller: &'a mut ScopeController, source_label: String) -> Self {
        let sweep_len = controller.sweep_len();
        Self {
            controller,
            source_label,
            mode: DisplayMode::Xy,
            xy: vec![StereoFrame::SILENT; XY_POINTS],
            sweep: vec![StereoFrame::SILENT; sweep_len],
            triggered: false,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            // ~30fps
            if event::poll(Duration::from_millis(33))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        self.controller.collect_retired();
        match self.mode {
            DisplayMode::Xy => self.controller.latest(&mut self.xy),
            DisplayMode::Sweep => {
                self.triggered = self.controller.triggered_sweep(&mut self.sweep);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let params = self.controller.params();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => params.set_paused(!params.paused()),
            KeyCode::Tab => self.mode = self.mode.toggled(),

            KeyCode::Up => params.set_cutoff(params.cutoff() * CUTOFF_STEP),
            KeyCode::Down => params.set_cutoff(params.cutoff() / CUTOFF_STEP),
            KeyCode::Right => params.set_resonance(params.resonance() + 0.02),
            KeyCode::Left => params.set_resonance(params.resonance() - 0.02),
            KeyCode::Char('9') => params.set_volume(params.volume() - 0.05),
            KeyCode::Char('0') => params.set_volume(params.volume() + 0.05),

            KeyCode::Char('[') => params.set_split_angle(params.split_angle() - 5.0),
            KeyCode::Char(']') => params.set_split_angle(params.split_angle() + 5.0),
            KeyCode::Char('-') => params.set_split_depth(params.split_depth() - 0.05),
            KeyCode::Char('=') => params.set_split_depth(params.split_depth() + 0.05),

            KeyCode::Char('i') => nudge_morph(&*self.controller, 0.0, MORPH_STEP),
            KeyCode::Char('k') => nudge_morph(&*self.controller, 0.0, -MORPH_STEP),
            KeyCode::Char('j') => nudge_morph(&*self.controller, -MORPH_STEP, 0.0),
            KeyCode::Char('l') => nudge_morph(&*self.controller, MORPH_STEP, 0.0),

            KeyCode::Char('f') => params.set_filter_enabled(!params.filter_enabled()),
            KeyCode::Char('p') => params.set_poles(match params.poles() {
                Poles::Two => Poles::Four,
                Poles::Four => Poles::Two,
            }),
            KeyCode::Char('e') => params.set_trigger_edge(params.trigger_edge().toggled()),
            KeyCode::Char('t') => params.set_threshold(params.threshold() + 0.05),
            KeyCode::Char('g') => params.set_threshold(params.threshold() - 0.05),
            KeyCode::Char('r') => params.set_routing(match params.routing() {
                ScopeRouting::Morph => ScopeRouting::Router,
                ScopeRouting::Router => ScopeRouting::Morph,
            }),
            KeyCode::Char('m') => {
                let result = self.controller.cycle_split_mode();
                report(result);
            }
            KeyCode::Char(',') => {
                let result = self.controller.step(-SCRUB_SAMPLES);
                report(result);
            }
            KeyCode::Char('.') => {
                let result = self.controller.step(SCRUB_SAMPLES);
                report(result);
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(10),   // Scope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_status(frame, chunks[0], &*self.controller, &self.source_label);

        match self.mode {
            DisplayMode::Xy => render_scope(frame, chunks[1], self.mode, &self.xy, true),
            DisplayMode::Sweep => {
                render_scope(frame, chunks[1], self.mode, &self.sweep, self.triggered)
            }
        }

        let help = Paragraph::new(
            " [Q] Quit  [Space] Pause  [Tab] X/Y|Sweep  [↑↓] Cutoff  [←→] Res  [ijkl] Morph  \
             [[ ]] Split  [-=] Depth  [M] Mode  [R] Routing  [F] Filter  [P] Poles  [E] Edge  [,.] Scrub",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}

fn nudge_morph(controller: &ScopeController, dx: f32, dy: f32) {
    let (x, y) = controller.params().morph_position();
    controller.params().set_morph_position(x + dx, y + dy);
}

fn report(result: EyreResult<()>) {
    if let Err(err) = result {
        log::warn!("request dropped: {err}");
    }
}
