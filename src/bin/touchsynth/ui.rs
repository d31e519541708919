//! Terminal front-end: keyboard stands in for the touch surface

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use touch_synth::{patch::Patch, synth::VoiceHandle, EnvelopeState};

/// Semitone ratio for pitch keys
const SEMITONE: f32 = 1.059_463_1;
/// Increment for attack/release/lag keys
const TIME_STEP: f32 = 0.05;
/// Vibrato settings switched on with `v`
const VIBRATO_RATE: i32 = 6;
const VIBRATO_DEPTH: i32 = 30;

/// Control-side mirror of the parameters we have sent.
///
/// The handle is write-only, so the UI remembers what it asked for.
pub struct Controls {
    pub frequency: f32,
    pub attack: f32,
    pub release: f32,
    pub lag: f32,
    pub vibrato: bool,
    pub envelope_enabled: bool,
}

impl Controls {
    pub fn from_patch(patch: &Patch, frequency: f32) -> Self {
        Self {
            frequency,
            attack: patch.envelope.attack,
            release: patch.envelope.release,
            lag: patch.effects.lag,
            vibrato: patch.effects.mod_rate > 0 && patch.effects.mod_depth != 0,
            envelope_enabled: patch.envelope.enabled,
        }
    }
}

pub struct UiApp {
    handle: VoiceHandle,
    meter_rx: Consumer<f32>,
    controls: Controls,
    sample_rate: f32,
    peak: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: VoiceHandle,
        meter_rx: Consumer<f32>,
        controls: Controls,
        sample_rate: f32,
    ) -> Self {
        Self {
            handle,
            meter_rx,
            controls,
            sample_rate,
            peak: 0.0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_meter();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_meter(&mut self) {
        // Hold the loudest recent block, decaying between frames
        self.peak *= 0.85;
        while let Ok(peak) = self.meter_rx.pop() {
            self.peak = self.peak.max(peak);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let c = &mut self.controls;
        let sent = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => self.handle.toggle_playback(),
            KeyCode::Up | KeyCode::Down => {
                c.frequency = if key == KeyCode::Up {
                    c.frequency * SEMITONE
                } else {
                    c.frequency / SEMITONE
                };
                self.handle.set_frequency(c.frequency)
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                c.attack = nudge(c.attack, key == KeyCode::Char('A'));
                self.handle.set_attack(c.attack)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                c.release = nudge(c.release, key == KeyCode::Char('R'));
                self.handle.set_release(c.release)
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                c.lag = nudge(c.lag, key == KeyCode::Char('L'));
                self.handle.set_lag(c.lag)
            }
            KeyCode::Char('v') => {
                c.vibrato = !c.vibrato;
                let (rate, depth) = if c.vibrato {
                    (VIBRATO_RATE, VIBRATO_DEPTH)
                } else {
                    (0, 0)
                };
                self.handle
                    .set_mod_rate(rate)
                    .and_then(|_| self.handle.set_mod_depth(depth))
            }
            KeyCode::Char('e') => {
                c.envelope_enabled = !c.envelope_enabled;
                self.handle.set_envelope_enabled(c.envelope_enabled)
            }
            KeyCode::Char('x') => {
                c.vibrato = false;
                c.lag = 0.0;
                c.envelope_enabled = false;
                self.handle.reset_effects()
            }
            _ => Ok(()),
        };

        if let Err(err) = sent {
            log::warn!("{err}");
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let status = self.handle.latest_status();
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(3), // Envelope gauge
                Constraint::Length(3), // Output meter
                Constraint::Length(4), // Parameters
                Constraint::Min(0),
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let (label, color) = match status.state {
            EnvelopeState::Idle => ("Idle", Color::DarkGray),
            EnvelopeState::Attacking => ("Attacking", Color::Yellow),
            EnvelopeState::Sustained => ("Sustained", Color::Green),
            EnvelopeState::Releasing => ("Releasing", Color::Magenta),
        };
        let line = Line::from(vec![
            Span::styled(format!(" {label}  "), Style::default().fg(color)),
            Span::styled(
                format!("{:.1} Hz  ", self.controls.frequency),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{:.1}kHz", self.sample_rate / 1000.0),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Block::default().title(" touchsynth ").borders(Borders::ALL)),
            chunks[0],
        );

        render_gauge(frame, chunks[1], " Envelope ", status.level, color);
        render_gauge(frame, chunks[2], " Output ", self.peak, Color::Blue);

        let c = &self.controls;
        let params = vec![
            Line::from(format!(
                " attack {:.2}   release {:.2}   envelope {}",
                c.attack,
                c.release,
                if c.envelope_enabled { "on" } else { "bypassed" }
            )),
            Line::from(format!(
                " lag {:.2}   vibrato {}",
                c.lag,
                if c.vibrato { "on" } else { "off" }
            )),
        ];
        frame.render_widget(
            Paragraph::new(params).block(Block::default().title(" Parameters ").borders(Borders::ALL)),
            chunks[3],
        );

        let help = Paragraph::new(
            " [Space] Play/Stop  [↑↓] Pitch  [a/A] Attack  [r/R] Release  [l/L] Lag  [v] Vibrato  [e] Envelope  [x] Reset  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[5]);
    }
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, value: f32, color: Color) {
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(value.clamp(0.0, 1.0) as f64)
        .label(format!("{value:.2}"));
    frame.render_widget(gauge, area);
}

/// Step a normalized parameter up or down, staying within 0.0..=1.0.
fn nudge(value: f32, up: bool) -> f32 {
    let next = if up { value + TIME_STEP } else { value - TIME_STEP };
    next.clamp(0.0, 1.0)
}
