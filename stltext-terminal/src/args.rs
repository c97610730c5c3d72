/// Order-sensitive per-object transform flags
use std::path::PathBuf;

use stltext_core::{Axis, Transform};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    #[error("a file must be entered before any options (found '{0}')")]
    OptionBeforeFile(String),
    #[error("a valid float must be passed to {flag}: '{value}'")]
    InvalidFlagValue { flag: String, value: String },
    #[error("flag not recognized: {0}")]
    UnrecognizedFlag(String),
}

/// A file to load and the transforms that follow it on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub path: PathBuf,
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Help,
    Render(Vec<ObjectSpec>),
}

/// Split raw arguments into files and the flags attached to each.
///
/// Every flag applies to the most recently named file. `--help` anywhere
/// short-circuits to [`Invocation::Help`].
pub fn parse_objects<I, S>(args: I) -> Result<Invocation, ArgsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut objects: Vec<ObjectSpec> = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if arg == "--help" {
            return Ok(Invocation::Help);
        }

        if !arg.starts_with('-') {
            objects.push(ObjectSpec {
                path: PathBuf::from(arg),
                transforms: Vec::new(),
            });
            continue;
        }

        let transform = parse_flag(arg)?;
        match objects.last_mut() {
            Some(object) => object.transforms.push(transform),
            None => return Err(ArgsError::OptionBeforeFile(arg.to_string())),
        }
    }

    if objects.is_empty() {
        return Ok(Invocation::Help);
    }
    Ok(Invocation::Render(objects))
}

/// Parse one `-name=value` transform flag
pub fn parse_flag(arg: &str) -> Result<Transform, ArgsError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| ArgsError::UnrecognizedFlag(arg.to_string()))?;

    let make: fn(f64) -> Transform = match name {
        "-x" => |v| Transform::translation(v, 0.0, 0.0),
        "-y" => |v| Transform::translation(0.0, v, 0.0),
        "-z" => |v| Transform::translation(0.0, 0.0, v),
        "-rx" => |v| Transform::Rotate(Axis::X, v),
        "-ry" => |v| Transform::Rotate(Axis::Y, v),
        "-rz" => |v| Transform::Rotate(Axis::Z, v),
        "-s" => Transform::uniform_scale,
        "-sx" => |v| Transform::scale(v, 1.0, 1.0),
        "-sy" => |v| Transform::scale(1.0, v, 1.0),
        "-sz" => |v| Transform::scale(1.0, 1.0, v),
        _ => return Err(ArgsError::UnrecognizedFlag(arg.to_string())),
    };

    let amount = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ArgsError::InvalidFlagValue {
            flag: name.to_string(),
            value: value.to_string(),
        })?;

    Ok(make(amount))
}
