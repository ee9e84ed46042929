//! Spectrum analyzer widget
//!
//! Log-spaced FFT magnitudes of the tapped output. The current filter cutoff
//! is drawn as a vertical marker so the sweep is visible against the
//! harmonics it lets through.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 64;

/// Lowest frequency shown (Hz)
const MIN_FREQ: f32 = 40.0;
/// Highest frequency shown; the sawtooths have little energy above this
const MAX_FREQ: f32 = 8_000.0;

const FLOOR_DB: f64 = -100.0;

/// Exponential smoothing applied between updates
const SMOOTHING: f64 = 0.6;

pub struct SpectrumAnalyzer {
    sample_rate: f32,
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index per displayed bin
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB) per displayed bin
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to
    /// [`update`](Self::update).
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let max_freq = MAX_FREQ.min(sample_rate / 2.0).max(MIN_FREQ + 1.0);
        let ratio = (max_freq / MIN_FREQ) as f64;
        let half = (buffer_len / 2).max(1);

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ as f64 * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            sample_rate,
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Analyse a new buffer. Buffers of the wrong length are ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((_, magnitude_db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let power = self.scratch[index].norm_sqr().max(1e-12) as f64;
            let db = (10.0 * power.log10()).max(FLOOR_DB);
            *magnitude_db = SMOOTHING * *magnitude_db + (1.0 - SMOOTHING) * db;
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum with an optional cutoff marker (Hz)
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)], cutoff: Option<f32>) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let x_min = (MIN_FREQ as f64).log10();
    let x_max = (MAX_FREQ as f64).log10();
    let max_db = spectrum
        .iter()
        .map(|(_, db)| *db)
        .fold(FLOOR_DB, f64::max);
    let y_max = max_db.max(0.0) + 10.0;

    let marker: Vec<(f64, f64)> = cutoff
        .map(|hz| (hz.max(MIN_FREQ) as f64).log10().min(x_max))
        .map(|x| vec![(x, FLOOR_DB), (x, y_max)])
        .unwrap_or_default();

    let mut datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum)];
    if !marker.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::LightRed))
                .data(&marker),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec!["40", "400", "8k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, y_max])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_lands_near_the_tone() {
        let sample_rate = 48_000.0;
        let len = 1024;
        let tone = 1_000.0;
        let buffer: Vec<f32> = (0..len)
            .map(|n| (2.0 * std::f32::consts::PI * tone * n as f32 / sample_rate).sin())
            .collect();

        let mut analyzer = SpectrumAnalyzer::new(len, sample_rate);
        for _ in 0..10 {
            analyzer.update(&buffer);
        }

        let (peak_log_freq, _) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, bin| if bin.1 > best.1 { bin } else { best });
        let peak_hz = 10f64.powf(peak_log_freq);
        assert!((800.0..1_250.0).contains(&peak_hz), "peak at {peak_hz} Hz");
    }

    #[test]
    fn wrong_length_is_ignored() {
        let mut analyzer = SpectrumAnalyzer::new(256, 48_000.0);
        analyzer.update(&[1.0; 100]);
        assert!(analyzer.data().iter().all(|(_, db)| *db == FLOOR_DB));
    }
}
