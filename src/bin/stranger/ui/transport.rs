//! Transport bar widget - play state, current note pair, output and levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use stranger_synth::synth::{AudioHost, SynthController};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport<H: AudioHost>(
    frame: &mut Frame,
    area: Rect,
    synth: &SynthController<H>,
    audio_stats: &AudioStats,
) {
    let block = Block::default().title(" stranger ").borders(Borders::ALL);

    let playing = synth.is_playing();
    let mut spans = vec![Span::styled(
        if playing { " ▶ Playing  " } else { " ■ Stopped  " },
        Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
    )];

    if let Some(step) = synth.current_step() {
        spans.push(Span::styled(
            format!("Step {} [{}]  ", step.step, step.index),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            format!("{:.2} / {:.2} Hz  ", step.notes.voice1, step.notes.voice2),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(info) = synth.output_info() {
        spans.push(Span::styled(
            format!(
                "{} {:.1}kHz {}ch  ",
                info.device_name,
                info.sample_rate / 1000.0,
                info.channels
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if synth.is_sweeping() {
        spans.push(Span::styled("LFO  ", Style::default().fg(Color::LightRed)));
    }

    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
