/// stl-to-text - render STL files as shaded text
///
/// Each FILE may be followed by transform flags that apply, in order, to
/// that file. The result is fitted to the terminal and printed to stdout.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::debug;
use std::io;
use stltext_core::{Projection, ProjectionMode, RenderConfig};
use stltext_terminal::{load_objects, parse_objects, render_meshes, Cli, Invocation, Viewport};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let objects = match parse_objects(&cli.objects)? {
        Invocation::Help => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Invocation::Render(objects) => objects,
    };

    let viewport = Viewport::detect(cli.width, cli.height);
    debug!("viewport {}x{}", viewport.width, viewport.height);

    let projection = Projection {
        mode: if cli.orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        },
        ..Projection::default()
    };

    let mut meshes = load_objects(&objects, viewport)?;
    let stats = render_meshes(
        &mut meshes,
        viewport,
        &projection,
        RenderConfig::default(),
        &mut io::stdout().lock(),
    )?;
    debug!("{:?}", stats);

    Ok(())
}
