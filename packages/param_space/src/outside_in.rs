use std::iter::FusedIterator;

/// Iterates over a slice from both ends towards the middle.
///
/// The iterator alternately takes the first and then the last remaining element until the
/// slice is exhausted. For `[1, 2, 3, 4, 5]` it yields `1, 5, 2, 4, 3`.
///
/// # Examples
///
/// ```
/// use param_space::OutsideIn;
///
/// let order: Vec<_> = OutsideIn::new(&['a', 'b', 'c', 'd']).copied().collect();
/// assert_eq!(order, ['a', 'd', 'b', 'c']);
/// ```
#[derive(Clone, Debug)]
pub struct OutsideIn<'a, T> {
    remaining: &'a [T],
    take_front: bool,
}

impl<'a, T> OutsideIn<'a, T> {
    /// Creates an iterator that drains `items` in outside-in order.
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        Self {
            remaining: items,
            take_front: true,
        }
    }
}

impl<'a, T> Iterator for OutsideIn<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (item, rest) = if self.take_front {
            self.remaining.split_first()?
        } else {
            self.remaining.split_last()?
        };

        self.remaining = rest;
        self.take_front = !self.take_front;

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining.len(), Some(self.remaining.len()))
    }
}

impl<T> ExactSizeIterator for OutsideIn<'_, T> {}

impl<T> FusedIterator for OutsideIn<'_, T> {}
