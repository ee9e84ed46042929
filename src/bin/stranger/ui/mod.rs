//! TUI module for stranger
//!
//! Drives the synth controller from the keyboard and shows what it is doing:
//! transport, the filter controls, an oscilloscope and a spectrum.

mod controls;
mod spectrum;
mod transport;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use stranger_synth::synth::{AudioHost, SynthController};

use controls::render_controls;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Capacity of the audio tap ring, enough for a few slow frames
pub const AUDIO_TAP_CAPACITY: usize = VIS_BUFFER_SIZE * 16;

/// Redraw interval when nothing else is due
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const CUTOFF_STEP_HZ: f32 = 10.0;
const CUTOFF_COARSE_STEP_HZ: f32 = 100.0;
const RESONANCE_STEP: f32 = 0.5;

/// UI application state
pub struct UiApp<H: AudioHost> {
    synth: SynthController<H>,
    /// Most recent rendered samples, oldest first
    audio_buffer: Vec<f32>,
    /// Built for the sample rate of the current session
    spectrum: Option<SpectrumAnalyzer>,
    /// Blocking notice; the next key press dismisses it
    notice: Option<String>,
    should_quit: bool,
}

impl<H: AudioHost> UiApp<H> {
    pub fn new(synth: SynthController<H>) -> Self {
        Self {
            synth,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: None,
            notice: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop until the user quits. Stops the synth on exit.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.synth.poll(Instant::now());
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(self.poll_timeout(Instant::now()))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        self.synth.stop();
        Ok(())
    }

    /// Wake for the next frame or the next sweep tick, whichever is sooner.
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.synth.next_deadline() {
            Some(due) => due.saturating_duration_since(now).min(FRAME_INTERVAL),
            None => FRAME_INTERVAL,
        }
    }

    /// Pull tapped audio, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let sample_rate = self.synth.output_info().map(|info| info.sample_rate);
        let Some(tap) = self.synth.audio_tap() else {
            return;
        };

        let mut received = false;
        while let Ok(sample) = tap.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if !received {
            return;
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }

        let Some(sample_rate) = sample_rate else {
            return;
        };
        if self.spectrum.as_ref().map(SpectrumAnalyzer::sample_rate) != Some(sample_rate) {
            self.spectrum = Some(SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate));
        }
        if let Some(analyzer) = &mut self.spectrum {
            analyzer.update(&self.audio_buffer);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.notice.take().is_some() {
            return;
        }

        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let cutoff_step = if coarse {
            CUTOFF_COARSE_STEP_HZ
        } else {
            CUTOFF_STEP_HZ
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => self.start(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.synth.stop();
                self.audio_buffer.fill(0.0);
            }
            KeyCode::Left => self.synth.nudge_cutoff(-cutoff_step),
            KeyCode::Right => self.synth.nudge_cutoff(cutoff_step),
            KeyCode::Down => self.synth.nudge_resonance(-RESONANCE_STEP),
            KeyCode::Up => self.synth.nudge_resonance(RESONANCE_STEP),
            KeyCode::Char('l') | KeyCode::Char('L') => self.synth.toggle_sweep(),
            _ => {}
        }
    }

    fn start(&mut self) {
        if let Err(err) = self.synth.start() {
            log::error!("{err}");
            self.notice = Some(err.to_string());
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(5), // Filter controls
                Constraint::Min(8),    // Scope and spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &self.synth, &stats);
        render_controls(frame, chunks[1], self.synth.panel());

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        let cutoff = self.synth.live_filter().map(|f| f.cutoff_hz);
        let spectrum = self.spectrum.as_ref().map(|s| s.data()).unwrap_or_default();
        render_spectrum(frame, scopes[1], spectrum, cutoff);

        let help = Paragraph::new(
            " [P/Space] Play  [S] Stop  [←/→] Cutoff (Shift ×10)  [↓/↑] Q  [L] LFO  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);

        if let Some(message) = &self.notice {
            render_notice(frame, message);
        }
    }
}

fn render_notice(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 50, 6);
    let block = Block::default()
        .title(" Audio unavailable ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let text = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::styled("press any key", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
