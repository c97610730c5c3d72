/// Terminal front ends for rendering STL meshes as shaded text
use anyhow::Context;
use crossterm::terminal;
use log::{info, warn};
use std::io::Write;
use stltext_core::{stl, Mesh, Projection, RenderConfig, RenderStats, Scene, CHAR_RATIO};

pub mod args;
pub mod cli;
pub mod compositor;

pub use args::{parse_objects, ArgsError, Invocation, ObjectSpec};
pub use cli::Cli;

/// Size used when the terminal cannot be queried
pub const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 100,
    height: 100,
};

/// Character grid the output has to fit into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Explicit sizes win; anything missing comes from the terminal
    pub fn detect(width: Option<u16>, height: Option<u16>) -> Self {
        if let (Some(width), Some(height)) = (width, height) {
            return Self { width, height };
        }

        let terminal = match terminal::size() {
            Ok((w, h)) if w > 0 && h > 0 => Viewport { width: w, height: h },
            Ok(_) => {
                warn!("terminal reported an empty size; defaulting to 100x100");
                FALLBACK_VIEWPORT
            }
            Err(e) => {
                warn!("failed to get terminal size ({}); defaulting to 100x100", e);
                FALLBACK_VIEWPORT
            }
        };

        Self {
            width: width.unwrap_or(terminal.width),
            height: height.unwrap_or(terminal.height),
        }
    }
}

/// Load every object, center it, fit it to the viewport and replay its flags
pub fn load_objects(objects: &[ObjectSpec], viewport: Viewport) -> anyhow::Result<Vec<Mesh>> {
    let mut meshes = Vec::with_capacity(objects.len());
    for object in objects {
        let mut mesh = stl::load_stl(&object.path)
            .with_context(|| format!("failed to load {}", object.path.display()))?;
        info!("{}: {} triangles", object.path.display(), mesh.len());

        mesh.center();
        if let Err(e) = mesh.scale_to_fit(viewport.width as f64, viewport.height as f64) {
            warn!("{}: {}; leaving unscaled", object.path.display(), e);
        }
        for transform in &object.transforms {
            mesh.apply(transform);
        }
        meshes.push(mesh);
    }
    Ok(meshes)
}

/// Project the meshes into the viewport, rasterize and print them
pub fn render_meshes<W: Write>(
    meshes: &mut [Mesh],
    viewport: Viewport,
    projection: &Projection,
    config: RenderConfig,
    writer: &mut W,
) -> anyhow::Result<RenderStats> {
    // One column is kept free so full-width lines don't wrap
    let width = viewport.width.saturating_sub(1) as f64;
    if let Err(e) = projection.prepare(meshes, width, viewport.height as f64) {
        warn!("{}; nothing to fit", e);
    }

    let mut scene = Scene::new(meshes, config);
    let stats = scene.render();
    compositor::draw(&scene, writer).context("failed to write output")?;
    Ok(stats)
}

/// Fixed pose used by the preview front end.
///
/// Centers the mesh, tips it towards the viewer, squashes it for the cell
/// aspect, fits it into 100x100 cells and applies perspective from three
/// times its nearest depth.
pub fn preview_pose(mesh: &mut Mesh) -> anyhow::Result<()> {
    mesh.center();
    mesh.rotate_x(-1.0);
    mesh.scale(1.0, CHAR_RATIO, 1.0);
    if let Err(e) = mesh.scale_to_fit(100.0, 100.0) {
        warn!("{}; leaving unscaled", e);
    }

    let nearest = mesh.z_max();
    if nearest > 0.0 {
        mesh.perspective(3.0 * nearest);
    } else {
        warn!("mesh has no depth in front of the origin; skipping perspective");
    }
    Ok(())
}
