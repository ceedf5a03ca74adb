//! File-based filter processing command.

use crate::effects::{FilterArgs, build_filter};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ondula_io::FilterRunner;
use std::path::PathBuf;

/// Process a WAV file through a filter.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Zero frames appended after the input so feedback tails ring out
    #[arg(long, default_value = "0")]
    tail: u64,

    /// Output bit depth (8, 16, 24, or 32); defaults to the input's
    #[arg(long)]
    bit_depth: Option<u16>,
}

/// Run the process command.
pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let mut filter = build_filter(&args.filter)?;
    tracing::info!(filter = %args.filter.describe(), nodes = filter.node_count(), "filter ready");

    let mut runner = FilterRunner::new().with_tail(args.tail);
    if let Some(bits) = args.bit_depth {
        runner = runner.with_bit_depth(bits);
    }

    println!("Processing {}...", args.input.display());
    let pb = ProgressBar::new(runner.planned_frames(&args.input)?);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let bar = pb.clone();
    let mut runner = runner.with_progress(move |frames| bar.set_position(frames));

    let stats = runner.run(&mut filter, &args.input, &args.output)?;
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Frames: {} ({} tail), {:.2}s at {} Hz",
        stats.frames,
        stats.tail_frames,
        stats.duration_secs(),
        stats.sample_rate
    );
    println!(
        "  Peak:   in {:.1} dB, out {:.1} dB",
        linear_to_db(stats.input_peak),
        linear_to_db(stats.output_peak)
    );
    println!("  Speed:  {:.1}x realtime", stats.realtime_factor());
    println!("\nWrote {}", args.output.display());

    Ok(())
}

fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-10).log10()
}
