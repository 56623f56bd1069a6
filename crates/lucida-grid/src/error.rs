use std::fmt;

use crate::model::PointId;

/// A rejected grid operation. State is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// No vanishing point with this id exists.
    UnknownPoint(PointId),
    /// A NaN or infinite value was passed for the named quantity.
    NonFinite(&'static str),
    /// A custom aspect ratio with a non-positive or non-finite side.
    InvalidAspectRatio { width: f32, height: f32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnknownPoint(id) => write!(f, "unknown vanishing point {id}"),
            GridError::NonFinite(what) => write!(f, "{what} must be finite"),
            GridError::InvalidAspectRatio { width, height } => {
                write!(f, "invalid aspect ratio {width}:{height}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(GridError::UnknownPoint(PointId(7)).to_string(), "unknown vanishing point #7");
        assert_eq!(GridError::NonFinite("rotation").to_string(), "rotation must be finite");
        assert_eq!(
            GridError::InvalidAspectRatio { width: 0.0, height: 9.0 }.to_string(),
            "invalid aspect ratio 0:9"
        );
    }
}
