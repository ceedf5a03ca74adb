//! Filter selection shared by the commands that run a filter.

use anyhow::{Context, bail};
use clap::Args;
use ondula_config::{BlockKind, Patch};
use ondula_core::{CascadeBuilder, CompositeFilter};
use std::path::PathBuf;

/// Effects selectable with `--effect`.
pub const EFFECT_NAMES: &[&str] = &[
    "gain",
    "delay",
    "echo",
    "alt_echo",
    "all_pass",
    "low_pass",
    "reverberator",
];

/// Either a built-in effect with its parameters, or a patch file.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Built-in effect (gain, delay, echo, alt_echo, all_pass, low_pass, reverberator)
    #[arg(short, long, required_unless_present = "patch", conflicts_with = "patch")]
    effect: Option<String>,

    /// Gain or feedback coefficient for the effect
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    gain: f32,

    /// Delay length in samples for the effect
    #[arg(long, default_value_t = 4410)]
    delay: usize,

    /// Patch file (TOML)
    #[arg(short, long)]
    patch: Option<PathBuf>,
}

impl FilterArgs {
    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match (&self.patch, &self.effect) {
            (Some(path), _) => format!("patch {}", path.display()),
            (None, Some(name)) => format!("{name} (gain={}, delay={})", self.gain, self.delay),
            (None, None) => "nothing".to_string(),
        }
    }
}

/// Maps an effect name to its block description.
pub fn effect_kind(name: &str, gain: f32, delay: usize) -> anyhow::Result<BlockKind> {
    let kind = match name {
        "gain" => BlockKind::Gain { gain },
        "delay" => BlockKind::Delay { samples: delay },
        "echo" => BlockKind::Echo { gain, delay },
        "alt_echo" => BlockKind::AltEcho { gain, delay },
        "all_pass" => BlockKind::AllPass { gain, delay },
        "low_pass" => BlockKind::LowPass { gain, delay },
        "reverberator" => BlockKind::Reverberator,
        other => bail!(
            "unknown effect '{other}' (available: {})",
            EFFECT_NAMES.join(", ")
        ),
    };
    Ok(kind)
}

/// Builds the selected filter and checks that it is fully wired.
pub fn build_filter(args: &FilterArgs) -> anyhow::Result<CompositeFilter> {
    let filter = if let Some(path) = &args.patch {
        let patch = Patch::load(path)?;
        tracing::info!(name = %patch.name, blocks = patch.len(), "loaded patch");
        patch
            .build()
            .with_context(|| format!("building patch '{}'", patch.name))?
    } else if let Some(name) = &args.effect {
        let block = effect_kind(name, args.gain, args.delay)?.build(name)?;
        CascadeBuilder::new().push(block).build()?
    } else {
        bail!("No filter specified. Use --effect or --patch");
    };

    filter.validate().context("filter graph is incomplete")?;
    Ok(filter)
}
