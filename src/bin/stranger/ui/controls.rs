//! Filter controls - cutoff and resonance gauges plus the LFO checkbox
//!
//! Disabled controls are drawn dimmed; while the sweep runs the cutoff gauge
//! follows it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use stranger_synth::synth::controller::{Checkbox, ControlPanel, Slider};

pub fn render_controls(frame: &mut Frame, area: Rect, panel: &ControlPanel) {
    let block = Block::default().title(" Filter ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_slider(
        frame,
        rows[0],
        "Cutoff",
        &panel.cutoff,
        format!("{:.0} Hz", panel.cutoff.value()),
        Color::Cyan,
    );
    render_slider(
        frame,
        rows[1],
        "Q",
        &panel.resonance,
        format!("{:.1}", panel.resonance.value()),
        Color::Magenta,
    );
    render_checkbox(frame, rows[2], "LFO sweep", panel.sweep);
}

fn render_slider(
    frame: &mut Frame,
    area: Rect,
    name: &str,
    slider: &Slider,
    label: String,
    color: Color,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(9), Constraint::Min(10)])
        .split(area);

    let style = enabled_style(slider.is_enabled(), color);
    frame.render_widget(Paragraph::new(format!(" {name}")).style(style), cols[0]);

    let range = slider.range();
    let gauge = Gauge::default()
        .gauge_style(style)
        .ratio(slider.ratio())
        .label(format!("{label}  ({}..{})", range.start(), range.end()))
        .use_unicode(true);
    frame.render_widget(gauge, cols[1]);
}

fn render_checkbox(frame: &mut Frame, area: Rect, name: &str, checkbox: Checkbox) {
    let mark = if checkbox.checked { "[x]" } else { "[ ]" };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{mark} {name}"),
            enabled_style(checkbox.enabled, Color::LightRed),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn enabled_style(enabled: bool, color: Color) -> Style {
    if enabled {
        Style::default().fg(color)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    }
}
