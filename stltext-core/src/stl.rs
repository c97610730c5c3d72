/// STL file parser for binary and ASCII formats
use std::fs;
use std::path::Path;

use log::debug;
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::geometry::{Mesh, Triangle};

/// Bytes of free-form header preceding the triangle count
pub const HEADER_LEN: usize = 80;
/// Normal, three vertices and the attribute byte count
pub const RECORD_LEN: usize = 12 + 36 + 2;

/// Total size of a binary STL holding `triangles` records
pub fn binary_len(triangles: u32) -> usize {
    (triangles as usize)
        .checked_mul(RECORD_LEN)
        .and_then(|records| records.checked_add(HEADER_LEN + 4))
        .unwrap_or(usize::MAX)
}

/// Parse a binary STL file.
///
/// The header is not inspected. Exactly `80 + 4 + 50 * N` bytes are consumed;
/// anything after the last record is ignored.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    let truncated = |expected| StlError::TruncatedInput {
        expected,
        actual: data.len(),
    };

    let (records, triangle_count) = header(data).map_err(|_| truncated(HEADER_LEN + 4))?;
    let expected = binary_len(triangle_count);
    if data.len() < expected {
        return Err(truncated(expected));
    }

    let (_, facets) = count(facet, triangle_count as usize)(records).map_err(|_| truncated(expected))?;

    let mut mesh = Mesh::with_capacity(facets.len());
    for (triangle, normal) in facets {
        mesh.add_triangle(triangle, normal);
    }
    Ok(mesh)
}

fn header(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, _) = take(HEADER_LEN)(input)?;
    le_u32(input)
}

fn le_vector(input: &[u8]) -> IResult<&[u8], Vector3<f64>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x as f64, y as f64, z as f64)))
}

fn facet(input: &[u8]) -> IResult<&[u8], (Triangle, Vector3<f64>)> {
    let (input, normal) = le_vector(input)?;
    let (input, (v0, v1, v2)) = tuple((le_vector, le_vector, le_vector))(input)?;
    // Attribute byte count
    let (input, _) = take(2usize)(input)?;

    let triangle = Triangle::new(Point3::from(v0), Point3::from(v1), Point3::from(v2));
    Ok((input, (triangle, normal)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(StlError::InvalidAscii(format!(
            "unexpected input at byte {}",
            input.len() - e.input.len()
        ))),
        Err(nom::Err::Incomplete(_)) => Err(StlError::InvalidAscii("incomplete input".to_string())),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(facets.len());
    for (triangle, normal) in facets {
        mesh.add_triangle(triangle, normal);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, (Triangle, Vector3<f64>)> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, (Triangle::new(v1, v2, v3), normal)))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, position) = parse_vector3(input)?;
    Ok((input, Point3::from(position)))
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3<f64>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x as f64, y as f64, z as f64)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary headers may also start with "solid"
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and decode an STL file from disk
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Mesh, StlError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| StlError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_stl(&data)?;
    debug!("loaded {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}
