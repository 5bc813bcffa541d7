use std::fmt::{self, Display};
use std::iter::FusedIterator;

use itertools::Itertools;
use itertools::structs::MultiProduct;

use crate::{Assignment, Axis, AxisAssignments, Error, Result, Shape};

/// The Cartesian combination of several [`Axis`] instances.
///
/// The order of the axes determines the order of generated assignments: the first axis
/// varies slowest, like the outermost loop of nested `for` loops. It does not affect which
/// assignments are generated.
///
/// # Examples
///
/// ```
/// use param_space::{Assignment, Shape, Space};
///
/// let space = Space::from_pairs([("x", vec![1]), ("y", vec![1, 2, 3])])?;
///
/// let edges: Vec<_> = space.assignments(Shape::Edges).collect();
/// assert_eq!(edges, [Assignment::from_iter([("x", 1), ("y", 2)])]);
/// # Ok::<(), param_space::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Space<V> {
    axes: Vec<Axis<V>>,
}

impl<V> Space<V> {
    /// Creates a space from already validated axes.
    ///
    /// A space without any axes is valid. It contains exactly one, empty, assignment.
    #[must_use]
    pub fn new(axes: impl IntoIterator<Item = Axis<V>>) -> Self {
        Self {
            axes: axes.into_iter().collect(),
        }
    }

    /// Creates a space from `(name, values)` pairs, one axis per pair, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by [`Axis::new()`] for any of the pairs.
    pub fn from_pairs<N, I>(pairs: impl IntoIterator<Item = (N, I)>) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
    {
        pairs
            .into_iter()
            .map(|(name, values)| Axis::new(name, values))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Creates a space from elements that may or may not describe an axis.
    ///
    /// This is meant for callers that assemble the parameter list from loosely typed input,
    /// where each element is converted into an [`Axis`] via [`TryInto`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAxisType`] for the first element that does not convert into an
    /// axis.
    pub fn try_from_elements<T>(elements: impl IntoIterator<Item = T>) -> Result<Self>
    where
        T: TryInto<Axis<V>>,
        T::Error: Display,
    {
        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                element
                    .try_into()
                    .map_err(|error| Error::InvalidAxisType {
                        index,
                        reason: error.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// The axes of the space, in order.
    #[must_use]
    pub fn axes(&self) -> &[Axis<V>] {
        &self.axes
    }

    /// Number of axes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Whether the space has no axes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Number of assignments that [`assignments(shape)`](Self::assignments) generates,
    /// computed without generating them. Saturates at `usize::MAX`.
    #[must_use]
    pub fn count(&self, shape: Shape) -> usize {
        match shape {
            Shape::Corners => self.product_excluding(None),
            Shape::Edges => (0..self.axes.len())
                .map(|varying| {
                    let interior = self
                        .axes
                        .get(varying)
                        .map_or(0, |axis| axis.values().len().saturating_sub(2));

                    interior.saturating_mul(self.product_excluding(Some(varying)))
                })
                .fold(0, usize::saturating_add),
            Shape::Cube => self
                .axes
                .iter()
                .map(|axis| axis.values().len())
                .fold(1, usize::saturating_mul),
        }
    }

    /// Product of the corner counts of all axes except `skip`.
    fn product_excluding(&self, skip: Option<usize>) -> usize {
        self.axes
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .map(|(_, axis)| axis.values().len().min(2))
            .fold(1, usize::saturating_mul)
    }
}

impl<V: Clone> Space<V> {
    /// Lazily generates the assignments that make up the given shape of the space.
    ///
    /// Each call returns a fresh, single-pass generator.
    pub fn assignments(&self, shape: Shape) -> Assignments<'_, V> {
        Assignments::new(self, shape)
    }

    /// Shorthand for `assignments(Shape::Corners)`.
    pub fn corners(&self) -> Assignments<'_, V> {
        self.assignments(Shape::Corners)
    }

    /// Shorthand for `assignments(Shape::Edges)`.
    pub fn edges(&self) -> Assignments<'_, V> {
        self.assignments(Shape::Edges)
    }

    /// Shorthand for `assignments(Shape::Cube)`.
    pub fn cube(&self) -> Assignments<'_, V> {
        self.assignments(Shape::Cube)
    }
}

/// Lazily generates the assignments of one [`Shape`] of a [`Space`].
///
/// Created by [`Space::assignments()`].
pub struct Assignments<'a, V: Clone> {
    space: &'a Space<V>,
    shape: Shape,

    // Edges are a chain of products, one per varying axis. This is the next axis to vary.
    next_varying: usize,

    current: Option<MultiProduct<AxisAssignments<'a, V>>>,

    // The product of zero axes is a single empty assignment, which we emit by hand.
    pending_empty: bool,
}

impl<'a, V: Clone> Assignments<'a, V> {
    fn new(space: &'a Space<V>, shape: Shape) -> Self {
        let mut result = Self {
            space,
            shape,
            next_varying: 0,
            current: None,
            pending_empty: false,
        };

        match shape {
            Shape::Corners | Shape::Cube if space.is_empty() => {
                result.pending_empty = true;
            }
            Shape::Corners | Shape::Cube => {
                result.current = Some(
                    space
                        .axes
                        .iter()
                        .map(|axis| axis.values_for(shape))
                        .multi_cartesian_product(),
                );
            }
            Shape::Edges => {}
        }

        result
    }

    /// Starts the product for the next varying axis, if any axis is left.
    fn advance_edge(&mut self) -> bool {
        if self.shape != Shape::Edges || self.next_varying >= self.space.axes.len() {
            return false;
        }

        let varying = self.next_varying;
        self.next_varying = varying.saturating_add(1);

        self.current = Some(
            self.space
                .axes
                .iter()
                .enumerate()
                .map(|(index, axis)| {
                    if index == varying {
                        axis.edge()
                    } else {
                        axis.corners()
                    }
                })
                .multi_cartesian_product(),
        );

        true
    }
}

impl<V: Clone> Iterator for Assignments<'_, V> {
    type Item = Assignment<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending_empty {
            self.pending_empty = false;
            return Some(Assignment::new());
        }

        loop {
            if let Some(parts) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Assignment::combine(parts));
            }

            self.current = None;

            if !self.advance_edge() {
                return None;
            }
        }
    }
}

impl<V: Clone> FusedIterator for Assignments<'_, V> {}

impl<V: Clone> fmt::Debug for Assignments<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignments")
            .field("shape", &self.shape)
            .field("axes", &self.space.axes.len())
            .field("next_varying", &self.next_varying)
            .finish_non_exhaustive()
    }
}
