use std::fs;
use std::path::PathBuf;

use stltext_core::stl::HEADER_LEN;
use stltext_core::{Mesh, Projection, ProjectionMode, RenderConfig};
use stltext_terminal::{load_objects, parse_objects, render_meshes, Invocation, ObjectSpec, Viewport};

fn encode(mesh: &Mesh) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_LEN];
    data.extend_from_slice(&(mesh.len() as u32).to_le_bytes());
    for (triangle, normal) in mesh.faces() {
        for value in normal.iter() {
            data.extend_from_slice(&(*value as f32).to_le_bytes());
        }
        for vertex in &triangle.vertices {
            for value in vertex.coords.iter() {
                data.extend_from_slice(&(*value as f32).to_le_bytes());
            }
        }
        data.extend_from_slice(&[0, 0]);
    }
    data
}

fn cube_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("stltext-terminal-{}-{}", std::process::id(), name));
    fs::write(&path, encode(&Mesh::cube(4.0))).unwrap();
    path
}

fn objects(args: &[String]) -> Vec<ObjectSpec> {
    match parse_objects(args).unwrap() {
        Invocation::Render(objects) => objects,
        Invocation::Help => panic!("unexpected help"),
    }
}

#[test]
fn test_flags_are_replayed_after_fitting() {
    let path = cube_file("shift.stl");
    let viewport = Viewport {
        width: 40,
        height: 20,
    };
    let plain = load_objects(&objects(&[path.display().to_string()]), viewport).unwrap();
    let shifted = load_objects(
        &objects(&[path.display().to_string(), "-x=7".to_string(), "-s=0.5".to_string()]),
        viewport,
    )
    .unwrap();
    fs::remove_file(&path).ok();

    // Fitted to the 20-row limit, then shifted, then halved
    assert!((plain[0].y_max() - 10.0).abs() < 1e-6);
    assert!((shifted[0].x_min() - (plain[0].x_min() + 7.0) * 0.5).abs() < 1e-6);
}

#[test]
fn test_two_objects_render_within_viewport() {
    let path = cube_file("pair.stl");
    let viewport = Viewport {
        width: 61,
        height: 24,
    };
    let args = [
        path.display().to_string(),
        "-rx=0.5".to_string(),
        "-ry=0.5".to_string(),
        path.display().to_string(),
        "-x=40".to_string(),
        "-rz=0.3".to_string(),
    ];
    let mut meshes = load_objects(&objects(&args), viewport).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(meshes.len(), 2);

    let mut out = Vec::new();
    let stats = render_meshes(
        &mut meshes,
        viewport,
        &Projection::default(),
        RenderConfig::default(),
        &mut out,
    )
    .unwrap();
    assert_eq!(stats.triangles, 24);
    assert!(stats.pixels_written > 0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.lines().count() <= 24 + 2);
    assert!(text.lines().all(|line| line.chars().count() <= 60 + 2));
    assert!(text
        .chars()
        .all(|c| matches!(c, ' ' | '\n' | '\u{2591}' | '\u{2592}' | '\u{2593}')));
}

#[test]
fn test_orthographic_keeps_faces_parallel() {
    let path = cube_file("ortho.stl");
    let viewport = Viewport {
        width: 41,
        height: 40,
    };
    let mut meshes = load_objects(&objects(&[path.display().to_string()]), viewport).unwrap();
    fs::remove_file(&path).ok();

    let projection = Projection {
        mode: ProjectionMode::Orthographic,
        ..Projection::default()
    };
    let mut out = Vec::new();
    render_meshes(&mut meshes, viewport, &projection, RenderConfig::default(), &mut out).unwrap();

    // Head-on, only the front face covers any cells
    let text = String::from_utf8(out).unwrap();
    let glyphs: std::collections::HashSet<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(glyphs.len(), 1);
}

#[test]
fn test_missing_file_is_an_error() {
    let specs = objects(&["/nonexistent/cube.stl".to_string()]);
    let err = load_objects(
        &specs,
        Viewport {
            width: 10,
            height: 10,
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to load"));
}
