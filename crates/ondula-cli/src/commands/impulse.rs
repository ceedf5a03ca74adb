//! Print a filter's impulse response.

use crate::effects::{FilterArgs, build_filter};
use anyhow::bail;
use clap::Args;
use ondula_core::Filter;

/// Feed a unit impulse on input 0 and print every output per step.
#[derive(Args)]
pub struct ImpulseArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Number of steps to run
    #[arg(short = 'n', long, default_value = "16")]
    steps: usize,

    /// Print steps whose outputs are all zero too
    #[arg(long)]
    all: bool,
}

/// Run the impulse command.
pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    let mut filter = build_filter(&args.filter)?;
    if filter.input_count() == 0 {
        bail!("filter has no inputs to drive");
    }

    let mut input = vec![0.0; filter.input_count()];
    for step in 0..args.steps {
        input[0] = if step == 0 { 1.0 } else { 0.0 };
        let output = filter.compute_one_step(&input)?;
        if args.all || output.iter().any(|&s| s != 0.0) {
            let values: Vec<String> = output.iter().map(|s| format!("{s:+.6}")).collect();
            println!("{step:>8}  {}", values.join("  "));
        }
    }

    Ok(())
}
