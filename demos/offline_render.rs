//! Render the built-in patch without an audio device and print block peaks.
//!
//! Run with: cargo run --example offline_render

use touch_synth::{patch::Patch, Voice};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZE: usize = 512;

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut voice = Patch::default().build(SAMPLE_RATE)?;
    voice.set_frequency(220.0);
    let mut buffer = vec![0.0f32; BLOCK_SIZE];

    voice.toggle_playback();
    for block in 0..16 {
        buffer.fill(0.0);
        voice.render(&mut buffer);
        println!(
            "block {block:2}  {:?}  level {:.2}  peak {:.3}",
            voice.state(),
            voice.envelope_level(),
            peak(&buffer)
        );
    }

    voice.toggle_playback();
    let mut block = 16;
    while voice.is_playing() {
        buffer.fill(0.0);
        voice.render(&mut buffer);
        println!(
            "block {block:2}  {:?}  level {:.2}  peak {:.3}",
            voice.state(),
            voice.envelope_level(),
            peak(&buffer)
        );
        block += 1;
    }

    println!("Rendered {} samples", block * BLOCK_SIZE);
    Ok(())
}
