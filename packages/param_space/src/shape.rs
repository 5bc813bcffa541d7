use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Error;

/// Which subset of a [`Space`][crate::Space] to traverse.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "the three traversal shapes are a closed set that callers match on"
)]
pub enum Shape {
    /// Every combination of the extreme values of each axis.
    Corners,

    /// Every line of the hypercube along which exactly one axis varies through its interior
    /// values while all other axes sit on one of their extreme values.
    ///
    /// Corners themselves are not part of an edge. Axes with two or fewer values have no
    /// interior and contribute no edges.
    Edges,

    /// Every combination of every value of each axis.
    Cube,
}

impl Shape {
    /// All shapes, from the smallest subset to the largest.
    pub const ALL: [Self; 3] = [Self::Corners, Self::Edges, Self::Cube];

    fn as_str(self) -> &'static str {
        match self {
            Self::Corners => "corners",
            Self::Edges => "edges",
            Self::Cube => "cube",
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownShape {
                value: s.to_string(),
            })
    }
}
