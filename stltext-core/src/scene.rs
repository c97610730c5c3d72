/// Character-buffer rasterizer with pairwise depth resolution
use log::debug;

use crate::config::RenderConfig;
use crate::geometry::{Bounds, Mesh, Triangle};

/// Position of a triangle inside the scene's mesh list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleRef {
    pub mesh: usize,
    pub triangle: usize,
}

/// One character of the screen buffer and the triangle that drew it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub owner: Option<TriangleRef>,
    pub glyph: char,
}

/// Lifecycle of the buffer.
///
/// A scene is never empty: `Scene::new` sizes it straight away. Printing
/// happens in the front end's compositor and reads the buffer without
/// changing it, so there is no printed state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Sized,
    Rendered,
}

/// Counters collected during one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub skipped: usize,
    pub pixels_written: usize,
}

/// A fixed-size character buffer covering the union bounds of a set of meshes
pub struct Scene<'a> {
    meshes: &'a [Mesh],
    config: RenderConfig,
    min_x: i64,
    min_y: i64,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    state: SceneState,
}

impl<'a> Scene<'a> {
    /// Size a blank buffer to `floor(min)..ceil(max)` of every mesh in X and Y
    pub fn new(meshes: &'a [Mesh], config: RenderConfig) -> Self {
        let bounds = meshes
            .iter()
            .fold(Bounds::empty(), |acc, mesh| acc.union(&mesh.bounds()));

        let (min_x, min_y, width, height) = if bounds.is_empty() {
            (0, 0, 0, 0)
        } else {
            let min_x = bounds.min.x.floor() as i64;
            let min_y = bounds.min.y.floor() as i64;
            let max_x = bounds.max.x.ceil() as i64;
            let max_y = bounds.max.y.ceil() as i64;
            (min_x, min_y, (max_x - min_x) as usize, (max_y - min_y) as usize)
        };
        debug!("scene buffer {}x{} at ({}, {})", width, height, min_x, min_y);

        Self {
            meshes,
            config,
            min_x,
            min_y,
            width,
            height,
            cells: vec![blank(&config); width * height],
            state: SceneState::Sized,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World coordinates of the bottom-left cell
    pub fn origin(&self) -> (i64, i64) {
        (self.min_x, self.min_y)
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Cell at `row` (top to bottom) and `col` (left to right)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        let width = self.width;
        (0..self.height).map(move |row| &self.cells[row * width..(row + 1) * width])
    }

    /// Triangle a cell reference points at
    pub fn triangle(&self, tri: TriangleRef) -> Option<&'a Triangle> {
        self.meshes.get(tri.mesh)?.triangles().get(tri.triangle)
    }

    pub fn clear(&mut self) {
        let blank = blank(&self.config);
        self.cells.fill(blank);
        self.state = SceneState::Sized;
    }

    /// Rasterize every triangle of every mesh, in mesh then triangle order
    pub fn render(&mut self) -> RenderStats {
        if self.state == SceneState::Rendered {
            self.clear();
        }

        let meshes = self.meshes;
        let mut stats = RenderStats::default();
        for (mesh_index, mesh) in meshes.iter().enumerate() {
            for (triangle_index, (triangle, normal)) in mesh.faces().enumerate() {
                stats.triangles += 1;
                if triangle.is_degenerate() {
                    stats.skipped += 1;
                    continue;
                }
                let glyph = self.config.shade(normal);
                let tri = TriangleRef {
                    mesh: mesh_index,
                    triangle: triangle_index,
                };
                stats.pixels_written += self.rasterize_triangle(triangle, tri, glyph);
            }
        }

        if stats.skipped > 0 {
            debug!("skipped {} degenerate triangles", stats.skipped);
        }
        debug!(
            "rendered {} triangles, {} pixel writes",
            stats.triangles, stats.pixels_written
        );
        self.state = SceneState::Rendered;
        stats
    }

    fn rasterize_triangle(&mut self, triangle: &'a Triangle, tri: TriangleRef, glyph: char) -> usize {
        let [v0, v1, v2] = triangle.vertices;

        // Bounding box, clipped to the buffer
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(self.min_x as f64) as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min((self.min_x + self.width as i64) as f64) as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(self.min_y as f64) as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min((self.min_y + self.height as i64) as f64) as i64;

        let mut written = 0;
        for y in min_y..max_y {
            for x in min_x..max_x {
                let (px, py) = (x as f64, y as f64);
                if !triangle.contains(px, py) {
                    continue;
                }
                let Some(idx) = self.index_of(x, y) else {
                    continue;
                };

                let wins = match self.cells[idx].owner.and_then(|owner| self.triangle(owner)) {
                    None => true,
                    Some(occupant) => nearer_at(triangle, occupant, px, py),
                };
                if wins {
                    self.cells[idx] = Cell {
                        owner: Some(tri),
                        glyph,
                    };
                    written += 1;
                }
            }
        }
        written
    }

    /// Buffer index of world pixel (x, y); screen Y grows downward
    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        let col = x - self.min_x;
        let from_bottom = y - self.min_y;
        if col < 0 || from_bottom < 0 || col >= self.width as i64 || from_bottom >= self.height as i64 {
            return None;
        }
        let row = self.height - 1 - from_bottom as usize;
        Some(row * self.width + col as usize)
    }

    /// The buffer as text, one `\n`-terminated line per row
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height * 3);
        for row in self.rows() {
            text.extend(row.iter().map(|cell| cell.glyph));
            text.push('\n');
        }
        text
    }
}

fn blank(config: &RenderConfig) -> Cell {
    Cell {
        owner: None,
        glyph: config.ramp.blank,
    }
}

/// Whether `incoming` is in front of `occupant` at (x, y).
///
/// Disjoint Z ranges decide without interpolation; otherwise both planes are
/// evaluated at the pixel and the larger Z wins. Ties keep the occupant.
pub fn nearer_at(incoming: &Triangle, occupant: &Triangle, x: f64, y: f64) -> bool {
    let (in_min, in_max) = incoming.z_range();
    let (occ_min, occ_max) = occupant.z_range();

    if in_max < occ_min {
        false
    } else if occ_max <= in_min {
        true
    } else {
        match (incoming.interpolate_z(x, y), occupant.interpolate_z(x, y)) {
            (Some(z_in), Some(z_occ)) => z_in > z_occ,
            _ => false,
        }
    }
}
