//! Audio stream setup and the control loop

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use touch_synth::{patch::Patch, synth::SharedVoice, Voice, MAX_BLOCK_SIZE};

use super::config::Args;
use super::ui::{Controls, UiApp};

/// Peak meter ring capacity (one entry per audio callback)
const METER_QUEUE_SIZE: usize = 256;

pub fn run(patch: Patch, args: &Args) -> EyreResult<()> {
    // Set up audio
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut voice = patch
        .build(sample_rate)
        .wrap_err_with(|| format!("failed to build patch `{}`", patch.name))?;
    let frequency = args.frequency.unwrap_or(patch.frequency);
    voice.set_frequency(frequency);

    log::info!(
        "output: {} Hz, {} channels, patch `{}`",
        sample_rate,
        channels,
        patch.name
    );

    let controls = Controls::from_patch(&patch, frequency);
    let (mut shared, handle) = SharedVoice::new(voice, args.queue_size);
    let (mut meter_tx, meter_rx) = RingBuffer::<f32>::new(METER_QUEUE_SIZE);

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;
            let mut peak = 0.0f32;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                let block = &mut render_buf[..frames_to_render];
                block.fill(0.0);
                shared.render(block);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    peak = peak.max(s.abs());
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = s;
                    }
                }

                frames_written += frames_to_render;
            }

            let _ = meter_tx.push(peak);
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(handle, meter_rx, controls, sample_rate).run(&mut terminal);
    ratatui::restore();

    drop(stream);
    result
}
