//! Fundamental geometric types for grillage modelling.

use std::cmp::Ordering;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Position in three dimensional space measured in metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
    /// Distance along the global Z axis.
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Straight-line distance between two points.
    ///
    /// # Examples
    /// ```
    /// use grillagex::point;
    ///
    /// let length = point(0.0, 0.0, 0.0).distance_to(point(3.0, 4.0, 0.0));
    /// assert_eq!(length, 5.0);
    /// ```
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Linear interpolation from `self` towards `other`.
    ///
    /// A `fraction` of zero returns `self` and one returns `other`.
    #[must_use]
    pub fn lerp(self, other: Point, fraction: f64) -> Point {
        let start = self.to_vector();
        Point::from(start + (other.to_vector() - start) * fraction)
    }

    /// Move the point along a global axis.
    #[must_use]
    pub fn offset_along(self, axis: Axis, distance: f64) -> Point {
        Point::from(self.to_vector() + axis.unit() * distance)
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Global axis used to extrude diagram ordinates in 3D views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Global X axis.
    X,
    /// Global Y axis, vertical in the usual grillage convention.
    #[default]
    Y,
    /// Global Z axis.
    Z,
}

impl Axis {
    /// Unit vector pointing along the axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Total order on positions: lower X first, then lower Y, then lower Z.
///
/// Coordinates compare numerically, so `-0.0` and `0.0` tie and the next
/// axis decides. NaN coordinates fall back to [`f64::total_cmp`].
///
/// Chain traversal starts from whichever endpoint sorts first, so this single
/// comparator decides the direction every girder is read in.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use grillagex::{compare_positions, point};
///
/// let west = point(0.0, 5.0, 0.0);
/// let east = point(10.0, 0.0, 0.0);
/// assert_eq!(compare_positions(&west, &east), Ordering::Less);
/// ```
#[must_use]
pub fn compare_positions(a: &Point, b: &Point) -> Ordering {
    compare_coordinate(a.x, b.x)
        .then_with(|| compare_coordinate(a.y, b.y))
        .then_with(|| compare_coordinate(a.z, b.z))
}

/// Numeric comparison of one coordinate, total even when NaN is involved.
fn compare_coordinate(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use grillagex::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}
