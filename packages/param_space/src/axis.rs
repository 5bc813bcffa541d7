use crate::{Assignment, Error, OutsideIn, Result, Shape};

/// One named parameter together with the ordered list of values a sweep should try for it.
///
/// An axis always has a non-empty name and at least one value. It is immutable once
/// constructed.
///
/// # Examples
///
/// ```
/// use param_space::{Assignment, Axis};
///
/// let axis = Axis::new("level", [1, 2, 3, 4, 5])?;
///
/// let cube: Vec<_> = axis.cube().collect();
/// assert_eq!(cube.first(), Some(&Assignment::single("level", 1)));
/// assert_eq!(cube.get(1), Some(&Assignment::single("level", 5)));
/// # Ok::<(), param_space::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Axis<V> {
    name: String,
    values: Vec<V>,
}

impl<V> Axis<V> {
    /// Creates an axis from a parameter name and its candidate values, in the order the
    /// caller considers them (typically ascending).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is empty and [`Error::EmptyValues`] if
    /// `values` yields nothing.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Result<Self> {
        let name = name.into();
        let values: Vec<V> = values.into_iter().collect();

        if name.is_empty() {
            return Err(Error::InvalidName);
        }

        if values.is_empty() {
            return Err(Error::EmptyValues { name });
        }

        Ok(Self { name, values })
    }

    /// The parameter name, used as the key in generated assignments.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The candidate values in their original order.
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// The values at the ends of the axis: only the value itself for a single-valued axis,
    /// otherwise the first and then the last value.
    fn corner_values(&self) -> AxisValues<'_, V> {
        let first = self.values.first();
        let last = match self.values.as_slice() {
            [_, .., last] => Some(last),
            _ => None,
        };

        AxisValues::Corners { first, last }
    }

    /// The values between the first and the last one.
    fn interior_values(&self) -> &[V] {
        self.values
            .get(1..self.values.len().saturating_sub(1))
            .unwrap_or_default()
    }
}

impl<V: Clone> Axis<V> {
    /// Generates the extreme values of the axis: the first and the last value, or the only
    /// value if there is just one.
    pub fn corners(&self) -> AxisAssignments<'_, V> {
        AxisAssignments {
            name: &self.name,
            values: self.corner_values(),
        }
    }

    /// Generates the interior values of the axis (everything except the first and last
    /// value) in outside-in order. Yields nothing for axes with two or fewer values.
    pub fn edge(&self) -> AxisAssignments<'_, V> {
        AxisAssignments {
            name: &self.name,
            values: AxisValues::OutsideIn(OutsideIn::new(self.interior_values())),
        }
    }

    /// Generates all values of the axis in outside-in order.
    pub fn cube(&self) -> AxisAssignments<'_, V> {
        AxisAssignments {
            name: &self.name,
            values: AxisValues::OutsideIn(OutsideIn::new(&self.values)),
        }
    }

    /// Generates the values of the axis that belong to the given traversal shape when this
    /// axis is considered on its own.
    pub fn values_for(&self, shape: Shape) -> AxisAssignments<'_, V> {
        match shape {
            Shape::Corners => self.corners(),
            Shape::Edges => self.edge(),
            Shape::Cube => self.cube(),
        }
    }
}

impl<N, V> TryFrom<(N, Vec<V>)> for Axis<V>
where
    N: Into<String>,
{
    type Error = Error;

    fn try_from((name, values): (N, Vec<V>)) -> Result<Self> {
        Self::new(name, values)
    }
}

#[derive(Clone, Debug)]
enum AxisValues<'a, V> {
    Corners {
        first: Option<&'a V>,
        last: Option<&'a V>,
    },
    OutsideIn(OutsideIn<'a, V>),
}

impl<'a, V> Iterator for AxisValues<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Corners { first, last } => first.take().or_else(|| last.take()),
            Self::OutsideIn(inner) => inner.next(),
        }
    }
}

/// Lazily generates single-entry assignments for the values of one [`Axis`].
///
/// Created by [`Axis::corners()`], [`Axis::edge()`], [`Axis::cube()`] and
/// [`Axis::values_for()`].
#[derive(Clone, Debug)]
pub struct AxisAssignments<'a, V> {
    name: &'a str,
    values: AxisValues<'a, V>,
}

impl<V: Clone> Iterator for AxisAssignments<'_, V> {
    type Item = Assignment<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.values
            .next()
            .map(|value| Assignment::single(self.name, value.clone()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn values<V: Clone>(generator: AxisAssignments<'_, V>) -> Vec<V> {
        generator
            .map(|assignment| {
                assert_eq!(assignment.len(), 1);
                assignment.values().next().cloned().unwrap()
            })
            .collect()
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(Axis::new("", [1]), Err(Error::InvalidName)));
    }

    #[test]
    fn empty_values_are_rejected() {
        let result = Axis::<u32>::new("p1", []);
        assert!(matches!(result, Err(Error::EmptyValues { name }) if name == "p1"));
    }

    #[test]
    fn single_value() {
        let axis = Axis::new("p1", [1]).unwrap();

        assert_eq!(values(axis.corners()), [1]);
        assert!(values(axis.edge()).is_empty());
        assert_eq!(values(axis.cube()), [1]);
    }

    #[test]
    fn two_values() {
        let axis = Axis::new("p1", [1, 2]).unwrap();

        assert_eq!(values(axis.corners()), [1, 2]);
        assert!(values(axis.edge()).is_empty());
        assert_eq!(values(axis.cube()), [1, 2]);
    }

    #[test]
    fn four_values() {
        let axis = Axis::new("p1", [1, 2, 3, 4]).unwrap();

        assert_eq!(values(axis.corners()), [1, 4]);
        assert_eq!(values(axis.edge()), [2, 3]);
        assert_eq!(values(axis.cube()), [1, 4, 2, 3]);
    }

    #[test]
    fn five_values() {
        let axis = Axis::new("p1", [1, 2, 3, 4, 5]).unwrap();

        assert_eq!(values(axis.edge()), [2, 4, 3]);
        assert_eq!(values(axis.cube()), [1, 5, 2, 4, 3]);
    }

    #[test]
    fn values_for_dispatches_by_shape() {
        let axis = Axis::new("p1", [1, 2, 3, 4]).unwrap();

        for shape in Shape::ALL {
            let expected = match shape {
                Shape::Corners => values(axis.corners()),
                Shape::Edges => values(axis.edge()),
                Shape::Cube => values(axis.cube()),
            };

            assert_eq!(values(axis.values_for(shape)), expected);
        }
    }

    #[test]
    fn generators_are_keyed_by_name() {
        let axis = Axis::new("level", ['a', 'b']).unwrap();

        for assignment in axis.cube() {
            assert!(assignment.contains("level"));
        }
    }

    #[test]
    fn converts_from_pair() {
        let axis = Axis::try_from(("x", vec![1, 2])).unwrap();
        assert_eq!(axis.name(), "x");
        assert_eq!(axis.values(), [1, 2]);

        assert!(Axis::<i32>::try_from(("x", vec![])).is_err());
    }
}
