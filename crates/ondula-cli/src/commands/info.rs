//! Describe a WAV file as filter input.

use crate::effects::EFFECT_NAMES;
use clap::Args;
use ondula_config::Patch;
use ondula_io::{WavFormat, WavInfo, read_wav_info};
use std::path::PathBuf;

/// Show a WAV file's format and which filters can process it.
#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to inspect
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Also check whether this patch (TOML) accepts the file
    #[arg(short, long)]
    patch: Option<PathBuf>,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)?;

    println!("{}", args.input.display());
    println!("  {}", describe_format(&info));
    println!(
        "  {} step(s) of {} sample(s) each, {:.3}s",
        info.num_frames, info.channels, info.duration_secs
    );

    println!("\nBuilt-in effects:");
    if info.channels == 1 {
        println!("  all apply ({})", EFFECT_NAMES.join(", "));
    } else {
        println!(
            "  none apply; they take 1 input, this file has {} channels",
            info.channels
        );
    }

    if let Some(path) = &args.patch {
        let patch = Patch::load(path)?;
        println!("\nPatch '{}':", patch.name);
        if patch.inputs == usize::from(info.channels) {
            println!("  fits ({} in, {} out)", patch.inputs, patch.outputs);
        } else {
            println!(
                "  does not fit: expects {} input(s), file has {}",
                patch.inputs, info.channels
            );
        }
    }

    Ok(())
}

fn describe_format(info: &WavInfo) -> String {
    let encoding = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "float",
    };
    format!(
        "{} Hz, {}-bit {encoding}, {} channel(s)",
        info.sample_rate, info.bits_per_sample, info.channels
    )
}
