/// stl-preview - fixed-pose preview of STL files
///
/// Renders each file tipped towards the viewer, fitted into 100x100 cells
/// with perspective. Without a file a cube is shown.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;
use stltext_core::{stl, Mesh, RenderConfig, Scene};
use stltext_terminal::{compositor, preview_pose};

#[derive(Parser, Debug)]
#[command(name = "stl-preview", version)]
#[command(about = "Preview STL files from a fixed viewpoint")]
struct PreviewCli {
    /// STL files to preview
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = PreviewCli::parse();

    let mut meshes = Vec::with_capacity(cli.files.len().max(1));
    if cli.files.is_empty() {
        info!("no STL file provided, previewing a cube");
        meshes.push(Mesh::cube(2.0));
    }
    for path in &cli.files {
        let mesh = stl::load_stl(path).with_context(|| format!("failed to load {}", path.display()))?;
        meshes.push(mesh);
    }

    for mesh in &mut meshes {
        preview_pose(mesh)?;
    }

    let mut scene = Scene::new(&meshes, RenderConfig::default());
    let stats = scene.render();
    info!(
        "{} triangles, {} skipped, {} pixel writes",
        stats.triangles, stats.skipped, stats.pixels_written
    );

    compositor::draw(&scene, &mut io::stdout().lock())?;
    Ok(())
}
