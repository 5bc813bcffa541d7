//! End-to-end traversal of multi-axis spaces, exercising the public API the way a sweep
//! driver consumes it.

use std::collections::HashSet;
use std::fmt;

use param_space::{Assignment, Axis, Error, Shape, Space};

fn rows<V: Clone>(space: &Space<V>, shape: Shape) -> Vec<Vec<(String, V)>> {
    space
        .assignments(shape)
        .map(|assignment| assignment.into_iter().collect())
        .collect()
}

fn row<V>(pairs: &[(&str, V)]) -> Vec<(String, V)>
where
    V: Clone,
{
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

#[test]
fn one_by_three_space() {
    let space = Space::from_pairs([("x", vec![1]), ("y", vec![1, 2, 3])]).unwrap();

    assert_eq!(
        rows(&space, Shape::Corners),
        [row(&[("x", 1), ("y", 1)]), row(&[("x", 1), ("y", 3)])]
    );
    assert_eq!(rows(&space, Shape::Edges), [row(&[("x", 1), ("y", 2)])]);
    assert_eq!(
        rows(&space, Shape::Cube),
        [
            row(&[("x", 1), ("y", 1)]),
            row(&[("x", 1), ("y", 3)]),
            row(&[("x", 1), ("y", 2)]),
        ]
    );
}

#[test]
fn two_by_two_space_has_no_edges() {
    let space = Space::from_pairs([("x", vec!["1", "2"]), ("y", vec!["i", "j"])]).unwrap();

    let expected = [
        row(&[("x", "1"), ("y", "i")]),
        row(&[("x", "1"), ("y", "j")]),
        row(&[("x", "2"), ("y", "i")]),
        row(&[("x", "2"), ("y", "j")]),
    ];

    assert_eq!(rows(&space, Shape::Corners), expected);
    assert!(rows(&space, Shape::Edges).is_empty());
    assert_eq!(rows(&space, Shape::Cube), expected);
}

#[test]
fn three_by_three_by_three_space() {
    let space = Space::from_pairs([
        ("p1", vec!["1", "2", "3"]),
        ("p2", vec!["a", "b", "c"]),
        ("p3", vec!["x", "y", "z"]),
    ])
    .unwrap();

    let corners = rows(&space, Shape::Corners);
    assert_eq!(corners.len(), 8);
    assert_eq!(corners.first(), Some(&row(&[("p1", "1"), ("p2", "a"), ("p3", "x")])));
    assert_eq!(corners.get(1), Some(&row(&[("p1", "1"), ("p2", "a"), ("p3", "z")])));
    assert_eq!(corners.last(), Some(&row(&[("p1", "3"), ("p2", "c"), ("p3", "z")])));

    let edges = rows(&space, Shape::Edges);
    assert_eq!(edges.len(), 12);
    assert_eq!(
        edges.first(),
        Some(&row(&[("p1", "2"), ("p2", "a"), ("p3", "x")]))
    );
    assert_eq!(
        edges.last(),
        Some(&row(&[("p1", "3"), ("p2", "c"), ("p3", "y")]))
    );

    // Exactly one coordinate of every edge point sits in the interior.
    for edge in &edges {
        let interior = edge
            .iter()
            .filter(|(_, value)| ["2", "b", "y"].contains(value))
            .count();
        assert_eq!(interior, 1, "{edge:?}");
    }

    let cube = rows(&space, Shape::Cube);
    assert_eq!(cube.len(), 27);

    let unique: HashSet<_> = cube.iter().collect();
    assert_eq!(unique.len(), 27);

    // Outside-in order of the last axis is visible in the first three rows.
    let last_axis: Vec<_> = cube
        .iter()
        .take(3)
        .filter_map(|r| r.last().map(|(_, v)| *v))
        .collect();
    assert_eq!(last_axis, ["x", "z", "y"]);
}

#[test]
fn every_assignment_names_every_axis_once() {
    let space = Space::from_pairs([
        ("a", vec![1, 2, 3, 4]),
        ("b", vec![1, 2, 3]),
        ("c", vec![9]),
    ])
    .unwrap();

    for shape in Shape::ALL {
        for assignment in space.assignments(shape) {
            let names: Vec<_> = assignment.names().collect();
            assert_eq!(names, ["a", "b", "c"], "{shape}");
        }
    }
}

#[test]
fn combining_axis_generators_reproduces_assignment() {
    let space = Space::from_pairs([("x", vec![1, 2]), ("y", vec![3, 4])]).unwrap();

    let manual: Vec<Assignment<i32>> = space
        .axes()
        .first()
        .unwrap()
        .corners()
        .flat_map(|x| {
            space
                .axes()
                .get(1)
                .unwrap()
                .corners()
                .map(move |y| Assignment::combine([x.clone(), y]))
        })
        .collect();

    assert_eq!(manual, space.corners().collect::<Vec<_>>());
}

#[derive(Debug)]
enum Element {
    Axis(&'static str, Vec<u32>),
    Scalar(u32),
}

#[derive(Debug)]
struct NotAnAxis(u32);

impl fmt::Display for NotAnAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scalar value {}", self.0)
    }
}

impl TryFrom<Element> for Axis<u32> {
    type Error = NotAnAxis;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        match element {
            Element::Axis(name, values) => Self::new(name, values).map_err(|_| NotAnAxis(0)),
            Element::Scalar(value) => Err(NotAnAxis(value)),
        }
    }
}

#[test]
fn non_axis_element_is_rejected() {
    let result = Space::<u32>::try_from_elements([
        Element::Axis("x", vec![1, 2]),
        Element::Scalar(7),
        Element::Axis("y", vec![3]),
    ]);

    match result {
        Err(Error::InvalidAxisType { index, reason }) => {
            assert_eq!(index, 1);
            assert!(reason.contains('7'));
        }
        other => panic!("expected InvalidAxisType, got {other:?}"),
    }
}

#[test]
fn axis_elements_are_accepted() {
    let space = Space::<u32>::try_from_elements([Element::Axis("x", vec![1, 2])]).unwrap();

    assert_eq!(space.len(), 1);
    assert_eq!(space.count(Shape::Cube), 2);
}

#[test]
fn invalid_axes_are_rejected() {
    assert!(matches!(Axis::new("", [1]), Err(Error::InvalidName)));
    assert!(matches!(
        Axis::<i32>::new("p1", []),
        Err(Error::EmptyValues { .. })
    ));
}
