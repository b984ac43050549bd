//! Ghost command - assemble a stand-in formation from an inventory

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cardclash_core::{assemble_ghost, Unit};

use crate::battle_cmd::ModeArgs;

#[derive(Args)]
pub struct GhostArgs {
    /// Inventory JSON file (array of cards)
    #[arg(long, value_name = "FILE")]
    pub inventory: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Name for the ghost formation
    #[arg(long, default_value = "ghost")]
    pub name: String,

    /// Write the formation here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: GhostArgs, seed: Option<u64>) -> Result<()> {
    let content = std::fs::read_to_string(&args.inventory)
        .with_context(|| format!("Failed to read inventory: {}", args.inventory.display()))?;
    let inventory: Vec<Unit> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse inventory: {}", args.inventory.display()))?;
    let config = args.mode.resolve()?;

    let mut rng = create_rng(seed);
    let formation = assemble_ghost(&args.name, &inventory, &config, &mut rng)?;

    tracing::info!(
        "Assembled ghost {} from {} cards ({})",
        formation.name,
        inventory.len(),
        config.name
    );

    match &args.output {
        Some(path) => formation.save(path)?,
        None => println!("{}", serde_json::to_string_pretty(&formation)?),
    }
    Ok(())
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
