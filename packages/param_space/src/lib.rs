#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Multi-dimensional parameter grids for benchmark sweeps.
//!
//! A benchmark sweep exercises a program with many combinations of command-line parameters.
//! This package models one named list of candidate values as an [`Axis`] and the combination
//! of several axes as a [`Space`]. A space can be traversed in three [`Shape`]s:
//!
//! * [`Shape::Corners`] - only the extreme (first and last) value of every axis.
//! * [`Shape::Edges`] - lines of the hypercube where exactly one axis walks through its
//!   interior values while every other axis sits on an extreme value.
//! * [`Shape::Cube`] - every combination.
//!
//! Values of each axis are visited in outside-in order: first, last, second, second-to-last
//! and so on towards the middle. A sweep that is interrupted early has therefore already
//! covered the extremes of every axis.
//!
//! # Example
//!
//! ```
//! use param_space::{Axis, Shape, Space};
//!
//! let space = Space::new([
//!     Axis::new("preset", ["-0", "-3", "-6", "-9"])?,
//!     Axis::new("extreme", ["", "-e"])?,
//! ]);
//!
//! assert_eq!(space.count(Shape::Corners), 4);
//! assert_eq!(space.count(Shape::Cube), 8);
//!
//! for assignment in space.assignments(Shape::Cube) {
//!     println!("{assignment}");
//! }
//! # Ok::<(), param_space::Error>(())
//! ```
//!
//! Generators are lazy and single-pass. Call [`Space::assignments()`] again to start over.

mod assignment;
mod axis;
mod error;
mod outside_in;
mod shape;
mod space;

pub use assignment::*;
pub use axis::*;
pub use error::*;
pub use outside_in::*;
pub use shape::*;
pub use space::*;
