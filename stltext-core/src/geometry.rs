/// Geometry primitives for mesh rasterization
use nalgebra::{Point3, Vector3};

/// Below this magnitude a triangle's doubled 2D area counts as zero
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// A triangle face defined by three vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f64> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    /// Smallest and largest Z over the three vertices
    pub fn z_range(&self) -> (f64, f64) {
        let [a, b, c] = self.vertices;
        (a.z.min(b.z).min(c.z), a.z.max(b.z).max(c.z))
    }

    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }

    /// Twice the signed area of the XY projection, positive when counter-clockwise
    pub fn doubled_area_2d(&self) -> f64 {
        let [a, b, c] = self.vertices;
        edge_function(&a, &b, c.x, c.y)
    }

    /// True when the triangle cannot cover any pixel or be interpolated
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.doubled_area_2d().abs() < DEGENERATE_EPSILON
    }

    /// Strict interior test on the XY projection.
    ///
    /// The point must lie strictly left of all three directed edges, so points
    /// on an edge are excluded and clockwise triangles never contain anything.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let [a, b, c] = self.vertices;
        edge_function(&a, &b, x, y) > 0.0
            && edge_function(&b, &c, x, y) > 0.0
            && edge_function(&c, &a, x, y) > 0.0
    }

    /// Depth of the triangle's plane at (x, y), or `None` if degenerate
    pub fn interpolate_z(&self, x: f64, y: f64) -> Option<f64> {
        let [a, b, c] = self.vertices;
        let (w0, w1, w2) = barycentric((a.x, a.y), (b.x, b.y), (c.x, c.y), (x, y))?;
        Some(w0 * a.z + w1 * b.z + w2 * c.z)
    }
}

/// Z component of `(a - b) x (a - p)` on the XY plane.
///
/// Positive when `p` lies to the left of the directed edge `a -> b`.
pub fn edge_function(a: &Point3<f64>, b: &Point3<f64>, px: f64, py: f64) -> f64 {
    (a.x - b.x) * (a.y - py) - (a.y - b.y) * (a.x - px)
}

/// Calculate barycentric coordinates for a point in a triangle
pub fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < DEGENERATE_EPSILON {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

/// Axis-aligned bounding box.
///
/// The empty box has `min = +inf` and `max = -inf` so it is the identity for
/// [`Bounds::union`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow to include `point`; non-finite points are ignored
    pub fn include(&mut self, point: &Point3<f64>) {
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return;
        }
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Size along each axis; zero for an empty box
    pub fn extent(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// Midpoint of each axis
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// A triangle mesh with one face normal per triangle.
///
/// Normals are stored in parallel with the triangles and share their index.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    normals: Vec<Vector3<f64>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            normals: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle, normal: Vector3<f64>) {
        self.triangles.push(triangle);
        self.normals.push(normal);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles paired with their face normals, in file order
    pub fn faces(&self) -> impl Iterator<Item = (&Triangle, &Vector3<f64>)> {
        self.triangles.iter().zip(self.normals.iter())
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Triangle], &mut [Vector3<f64>]) {
        (&mut self.triangles, &mut self.normals)
    }

    /// Bounding box over every finite vertex
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for vertex in self.vertices() {
            bounds.include(vertex);
        }
        bounds
    }

    pub fn x_min(&self) -> f64 {
        self.bounds().min.x
    }

    pub fn x_max(&self) -> f64 {
        self.bounds().max.x
    }

    pub fn y_min(&self) -> f64 {
        self.bounds().min.y
    }

    pub fn y_max(&self) -> f64 {
        self.bounds().max.y
    }

    pub fn z_min(&self) -> f64 {
        self.bounds().min.z
    }

    pub fn z_max(&self) -> f64 {
        self.bounds().max.z
    }

    /// Create a cube centered on the origin with outward normals and
    /// counter-clockwise winding seen from outside
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let corner = |x: f64, y: f64, z: f64| Point3::new(x * h, y * h, z * h);

        // Each face as four corners, counter-clockwise seen from outside
        let faces = [
            // Front (+z)
            [(-1.0, -1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)],
            // Back (-z)
            [(1.0, -1.0, -1.0), (-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0), (1.0, 1.0, -1.0)],
            // Top (+y)
            [(-1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, -1.0), (-1.0, 1.0, -1.0)],
            // Bottom (-y)
            [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)],
            // Right (+x)
            [(1.0, -1.0, 1.0), (1.0, -1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0)],
            // Left (-x)
            [(-1.0, -1.0, -1.0), (-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0), (-1.0, 1.0, -1.0)],
        ];

        let mut mesh = Self::with_capacity(faces.len() * 2);
        for [a, b, c, d] in faces {
            let (a, b, c, d) = (
                corner(a.0, a.1, a.2),
                corner(b.0, b.1, b.2),
                corner(c.0, c.1, c.2),
                corner(d.0, d.1, d.2),
            );
            for triangle in [Triangle::new(a, b, c), Triangle::new(a, c, d)] {
                let normal = triangle.calculate_normal();
                mesh.add_triangle(triangle, normal);
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 1.0),
            Point3::new(0.0, 4.0, 2.0),
        )
    }

    #[test]
    fn test_contains_is_strict() {
        let tri = unit_triangle();
        assert!(tri.contains(1.0, 1.0));
        // On an edge
        assert!(!tri.contains(2.0, 0.0));
        assert!(!tri.contains(0.0, 2.0));
        assert!(!tri.contains(2.0, 2.0));
        // Vertex and outside
        assert!(!tri.contains(0.0, 0.0));
        assert!(!tri.contains(3.0, 3.0));
    }

    #[test]
    fn test_clockwise_triangle_contains_nothing() {
        let [a, b, c] = unit_triangle().vertices;
        let clockwise = Triangle::new(a, c, b);
        assert!(!clockwise.contains(1.0, 1.0));
    }

    #[test]
    fn test_barycentric_weights_sum_to_one() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert_relative_eq!(w0 + w1 + w2, 1.0);
        assert_relative_eq!(w0, 0.5);
        assert_relative_eq!(w1, 0.25);
        assert_relative_eq!(w2, 0.25);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_interpolate_z() {
        let tri = unit_triangle();
        assert_relative_eq!(tri.interpolate_z(0.0, 0.0).unwrap(), 0.0);
        assert_relative_eq!(tri.interpolate_z(1.0, 1.0).unwrap(), 0.75);
    }

    #[test]
    fn test_degenerate_detection() {
        let collinear = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        );
        assert!(collinear.is_degenerate());
        assert!(!unit_triangle().is_degenerate());

        let mut infinite = unit_triangle();
        infinite.vertices[1].x = f64::INFINITY;
        assert!(infinite.is_degenerate());
    }

    #[test]
    fn test_bounds_skip_non_finite() {
        let mut bounds = Bounds::empty();
        assert!(bounds.is_empty());
        bounds.include(&Point3::new(1.0, -2.0, 3.0));
        bounds.include(&Point3::new(f64::NAN, 100.0, 0.0));
        bounds.include(&Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.union(&Bounds::empty()), bounds);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);
        assert_eq!(cube.normals().len(), cube.triangles().len());
        for (tri, normal) in cube.faces() {
            let centroid = (tri.vertices[0].coords + tri.vertices[1].coords + tri.vertices[2].coords) / 3.0;
            assert!(centroid.dot(normal) > 0.0);
        }
        assert_relative_eq!(cube.x_min(), -1.0);
        assert_relative_eq!(cube.z_max(), 1.0);
    }
}
