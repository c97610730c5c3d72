/// In-place transformations of mesh vertices and normals
use log::{debug, warn};
use nalgebra::{Rotation3, Vector3};

use crate::error::GeometryError;
use crate::geometry::{Bounds, Mesh};

/// Distance from the projection plane below which perspective division blows up
const PERSPECTIVE_EPSILON: f64 = 1e-12;

/// Coordinate axis to rotate about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A single recorded transformation.
///
/// Front ends collect these per object in command-line order and replay them
/// with [`Mesh::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate(Vector3<f64>),
    Scale(Vector3<f64>),
    Rotate(Axis, f64),
    Perspective(f64),
}

impl Transform {
    /// Create a rotation about one coordinate axis (radians, right-handed)
    pub fn rotation_matrix(axis: Axis, angle: f64) -> Rotation3<f64> {
        let axis = match axis {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        Rotation3::from_axis_angle(&axis, angle)
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Transform::Translate(Vector3::new(x, y, z))
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Transform::Scale(Vector3::new(sx, sy, sz))
    }

    pub fn uniform_scale(factor: f64) -> Self {
        Transform::Scale(Vector3::repeat(factor))
    }
}

impl Mesh {
    pub fn apply(&mut self, transform: &Transform) {
        match *transform {
            Transform::Translate(offset) => self.translate(offset.x, offset.y, offset.z),
            Transform::Scale(factors) => self.scale(factors.x, factors.y, factors.z),
            Transform::Rotate(axis, angle) => self.rotate(axis, angle),
            Transform::Perspective(depth) => {
                self.perspective(depth);
            }
        }
    }

    /// Add an offset to every vertex; normals are unchanged
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        let offset = Vector3::new(dx, dy, dz);
        let (triangles, _) = self.parts_mut();
        for vertex in triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            *vertex += offset;
        }
    }

    /// Scale every vertex per axis.
    ///
    /// Normals are left untouched, so a non-uniform scale shades the mesh as if
    /// it had not been stretched.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        let factors = Vector3::new(sx, sy, sz);
        let (triangles, _) = self.parts_mut();
        for vertex in triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            vertex.coords.component_mul_assign(&factors);
        }
    }

    /// Rotate vertices and normals about a coordinate axis
    pub fn rotate(&mut self, axis: Axis, angle: f64) {
        let rotation = Transform::rotation_matrix(axis, angle);
        let (triangles, normals) = self.parts_mut();
        for (triangle, normal) in triangles.iter_mut().zip(normals.iter_mut()) {
            *normal = rotation * *normal;
            for vertex in &mut triangle.vertices {
                *vertex = rotation * *vertex;
            }
        }
    }

    pub fn rotate_x(&mut self, angle: f64) {
        self.rotate(Axis::X, angle);
    }

    pub fn rotate_y(&mut self, angle: f64) {
        self.rotate(Axis::Y, angle);
    }

    pub fn rotate_z(&mut self, angle: f64) {
        self.rotate(Axis::Z, angle);
    }

    /// Scale X and Y of every vertex by `depth / (depth - z)`, keeping Z.
    ///
    /// Vertices lying on the projection plane end up with non-finite X and Y;
    /// bounds ignore them and the rasterizer skips their triangles. Returns the
    /// number of such vertices.
    pub fn perspective(&mut self, depth: f64) -> usize {
        let mut degenerate = 0;
        let (triangles, _) = self.parts_mut();
        for vertex in triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            let distance = depth - vertex.z;
            if distance.abs() < PERSPECTIVE_EPSILON {
                degenerate += 1;
                vertex.x = f64::NAN;
                vertex.y = f64::NAN;
                continue;
            }
            let factor = depth / distance;
            vertex.x *= factor;
            vertex.y *= factor;
        }
        if degenerate > 0 {
            warn!(
                "perspective depth {} coincides with {} vertices; their triangles will be skipped",
                depth, degenerate
            );
        }
        degenerate
    }

    /// Uniformly scale so the XY extent fits inside `width` x `height`.
    ///
    /// The factor is the smaller of `width / extent_x` and `height / extent_y`;
    /// an axis with no extent places no constraint.
    pub fn scale_to_fit(&mut self, width: f64, height: f64) -> Result<f64, GeometryError> {
        let extent = self.bounds().extent();
        let factor = fit_factor(extent.x, extent.y, width, height)?;
        self.scale(factor, factor, factor);
        debug!("scaled mesh by {} to fit {}x{}", factor, width, height);
        Ok(factor)
    }

    /// Move the bounding-box midpoint to the origin
    pub fn center(&mut self) {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return;
        }
        let mid = bounds.center();
        self.translate(-mid.x, -mid.y, -mid.z);
    }

    /// Move the bounding-box minimum corner to the origin
    pub fn to_origin(&mut self) {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return;
        }
        self.translate(-bounds.min.x, -bounds.min.y, -bounds.min.z);
    }
}

fn fit_factor(extent_x: f64, extent_y: f64, width: f64, height: f64) -> Result<f64, GeometryError> {
    let x_fac = (extent_x > 0.0).then(|| width / extent_x);
    let y_fac = (extent_y > 0.0).then(|| height / extent_y);
    match (x_fac, y_fac) {
        (Some(x), Some(y)) => Ok(x.min(y)),
        (Some(f), None) | (None, Some(f)) => Ok(f),
        (None, None) => Err(GeometryError::DegenerateGeometry(
            "mesh has no extent in X or Y",
        )),
    }
}

/// Scale every mesh by one common factor so their combined footprint,
/// measured in whole cells, fits inside `width` x `height`
pub fn fit_all(meshes: &mut [Mesh], width: f64, height: f64) -> Result<f64, GeometryError> {
    let bounds = meshes
        .iter()
        .fold(Bounds::empty(), |acc, mesh| acc.union(&mesh.bounds()));
    if bounds.is_empty() {
        return Err(GeometryError::DegenerateGeometry("no finite vertices to fit"));
    }
    let cells_x = bounds.max.x.ceil() - bounds.min.x.floor();
    let cells_y = bounds.max.y.ceil() - bounds.min.y.floor();
    let factor = fit_factor(cells_x, cells_y, width, height)?;
    for mesh in meshes.iter_mut() {
        mesh.scale(factor, factor, factor);
    }
    debug!("scaled {} meshes by {} to fit {}x{}", meshes.len(), factor, width, height);
    Ok(factor)
}
