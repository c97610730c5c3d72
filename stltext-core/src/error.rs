/// Error types for decoding and geometry operations
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a file or byte slice into a [`Mesh`](crate::Mesh)
#[derive(Error, Debug)]
pub enum StlError {
    #[error("can't open file {}: {source}", path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("truncated STL: expected {expected} bytes, found {actual}")]
    TruncatedInput { expected: usize, actual: usize },
    #[error("invalid ASCII STL: {0}")]
    InvalidAscii(String),
}

/// Whole-mesh operations that cannot be carried out on the current geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
}
