/// Viewing pipeline that turns positioned meshes into screen-space meshes
use log::{debug, warn};

use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::transform::fit_all;

/// Width-to-height ratio of a terminal character cell
pub const CHAR_RATIO: f64 = 58.0 / 113.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for terminal rendering.
///
/// The viewer sits on the +Z axis looking towards -Z; larger Z is nearer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical squash applied so cells taller than they are wide keep proportions
    pub char_ratio: f64,
    /// Projection plane distance as a multiple of the nearest Z in the scene
    pub depth_factor: f64,
    pub mode: ProjectionMode,
}

impl Projection {
    /// Distance of the projection plane for this set of meshes, if usable.
    ///
    /// The plane must lie beyond every vertex, which only holds when the
    /// nearest Z is positive.
    pub fn depth_for(&self, meshes: &[Mesh]) -> Option<f64> {
        let closest = meshes
            .iter()
            .map(Mesh::z_max)
            .fold(f64::NEG_INFINITY, f64::max);
        (closest.is_finite() && closest > 0.0).then(|| self.depth_factor * closest)
    }

    /// Squash for the cell aspect, apply perspective and fit everything into
    /// `width` x `height` cells with one common scale factor
    pub fn prepare(&self, meshes: &mut [Mesh], width: f64, height: f64) -> Result<(), GeometryError> {
        if meshes.is_empty() {
            return Ok(());
        }

        let depth = match self.mode {
            ProjectionMode::Perspective => {
                let depth = self.depth_for(meshes);
                if depth.is_none() {
                    warn!("nearest vertex is not in front of the origin; skipping perspective");
                }
                depth
            }
            ProjectionMode::Orthographic => None,
        };

        for mesh in meshes.iter_mut() {
            mesh.scale(1.0, self.char_ratio, 1.0);
            if let Some(depth) = depth {
                mesh.perspective(depth);
            }
        }
        debug!("projected {} meshes (depth {:?})", meshes.len(), depth);

        fit_all(meshes, width, height)?;
        Ok(())
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            char_ratio: CHAR_RATIO,
            depth_factor: 3.0,
            mode: ProjectionMode::Perspective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_projection_defaults() {
        let projection = Projection::default();
        assert_eq!(projection.mode, ProjectionMode::Perspective);
        assert!((projection.char_ratio - 58.0 / 113.0).abs() < 1e-12);
    }

    #[test]
    fn test_depth_requires_positive_z() {
        let projection = Projection::default();
        let mut cube = Mesh::cube(2.0);
        assert_relative_eq!(projection.depth_for(std::slice::from_ref(&cube)).unwrap(), 3.0);

        cube.translate(0.0, 0.0, -5.0);
        assert!(projection.depth_for(&[cube]).is_none());
        assert!(projection.depth_for(&[]).is_none());
    }

    #[test]
    fn test_prepare_fits_viewport() {
        let projection = Projection {
            mode: ProjectionMode::Orthographic,
            ..Projection::default()
        };
        let mut meshes = vec![Mesh::cube(2.0)];
        projection.prepare(&mut meshes, 40.0, 40.0).unwrap();
        let bounds = meshes[0].bounds();
        // Width is binding once the height has been squashed
        assert!(bounds.extent().x <= 40.0 + 1e-9);
        assert!(bounds.extent().y < bounds.extent().x);
    }

    #[test]
    fn test_prepare_perspective_enlarges_near_face() {
        let projection = Projection::default();
        let mut meshes = vec![Mesh::cube(2.0)];
        projection.prepare(&mut meshes, 100.0, 100.0).unwrap();
        let mesh = &meshes[0];
        let width_at = |z: f64| {
            let xs: Vec<f64> = mesh
                .vertices()
                .filter(|v| (v.z - z).abs() < 1e-6)
                .map(|v| v.x)
                .collect();
            xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                - xs.iter().cloned().fold(f64::INFINITY, f64::min)
        };
        let near = mesh.z_max();
        let far = mesh.z_min();
        assert!(width_at(near) > width_at(far));
    }
}
