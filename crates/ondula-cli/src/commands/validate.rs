//! Check a patch file.

use clap::Args;
use ondula_config::Patch;
use std::path::PathBuf;

/// Build a patch and report its size and completeness.
#[derive(Args)]
pub struct ValidateArgs {
    /// Patch file (TOML)
    #[arg(value_name = "PATCH")]
    patch: PathBuf,
}

/// Run the validate command. Fails if the patch does not build or is
/// incompletely wired.
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let patch = Patch::load(&args.patch)?;
    let filter = patch.build()?;

    println!("Patch:       {}", patch.name);
    if let Some(description) = &patch.description {
        println!("Description: {description}");
    }
    println!("Ports:       {} in, {} out", patch.inputs, patch.outputs);
    println!("Nodes:       {}", filter.node_count());
    println!("Connections: {}", filter.connection_count());

    match filter.validate() {
        Ok(()) => {
            println!("Status:      valid");
            Ok(())
        }
        Err(err) => {
            println!("Status:      incomplete");
            Err(anyhow::Error::new(err).context(format!("patch '{}' is incomplete", patch.name)))
        }
    }
}
