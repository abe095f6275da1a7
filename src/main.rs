use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use scene_import::cli::Cli;
use scene_import::{ImportConfig, Scene, SceneSummary};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => ImportConfig::from_json_file(path)?,
        None => ImportConfig::default(),
    };
    cli.apply(&mut config)?;

    let mut scene = Scene::new();
    scene_import::import(&cli.path, &config, &mut scene)
        .with_context(|| format!("Failed to import {:?}", cli.path))?;

    // Optimizing renumbers vertices, so quads are rebuilt afterwards
    if config.optimize {
        scene.optimize_meshes().context("Mesh optimization failed")?;
    }
    if config.reconstruct_quads {
        scene.calculate_quads();
        let quads: usize = scene.meshes().map(|(_, m)| m.quads.len()).sum();
        info!("Reconstructed {} quads", quads);
    }

    let summary = SceneSummary::new(&scene);
    if cli.json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{}", summary);
    }

    Ok(())
}
