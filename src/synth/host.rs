use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{synth::engine::GraphBuilder, SynthError};

/// Details of the opened output, for logging and display.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputInfo {
    pub device_name: String,
    pub sample_rate: f32,
    pub channels: usize,
}

/// A live audio context plus what it was opened with.
pub struct OpenContext<C> {
    /// Dropping the context releases the output and every node in the graph.
    pub context: C,
    pub info: OutputInfo,
}

/// Where audio contexts come from.
pub trait AudioHost {
    type Context;

    /// Acquire an output, finish the graph at its sample rate and start pulling
    /// audio from it.
    fn open(&self, graph: GraphBuilder) -> Result<OpenContext<Self::Context>, SynthError>;
}

/// The host's default output device through cpal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalHost;

impl AudioHost for CpalHost {
    type Context = cpal::Stream;

    fn open(&self, graph: GraphBuilder) -> Result<OpenContext<cpal::Stream>, SynthError> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());

        let device = host
            .default_output_device()
            .ok_or_else(|| SynthError::backend_unavailable("no default output device available"))?;
        let device_name = device.name().unwrap_or_else(|_| "(no name)".to_string());

        let config = device.default_output_config().map_err(|err| {
            SynthError::backend_unavailable(format!("failed to fetch default output config: {err}"))
        })?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut graph = graph.build(sample_rate);
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| graph.render_interleaved(data, channels),
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|err| {
                SynthError::backend_unavailable(format!("failed to build output stream: {err}"))
            })?;

        stream.play().map_err(|err| {
            SynthError::backend_unavailable(format!("failed to start output stream: {err}"))
        })?;

        let info = OutputInfo {
            device_name,
            sample_rate,
            channels,
        };
        log::info!(
            "audio started on {} ({} Hz, {} channels)",
            info.device_name,
            info.sample_rate,
            info.channels
        );

        Ok(OpenContext {
            context: stream,
            info,
        })
    }
}
