use std::fmt;

use serde::{Deserialize, Serialize};

/// A position on the grid.
///
/// `x` increases rightward and `y` increases downward. `y` may be negative,
/// which means the position is above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 2D affine transform stored as the 2×3 matrix `[[a, c, e], [b, d, f]]`.
///
/// A point is mapped as `x' = a·x + c·y + e` and `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation about the origin.
    ///
    /// With `y` pointing down, a positive angle turns clockwise on screen.
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation about `pivot`: `translate(pivot) ∘ rotation(angle) ∘ translate(-pivot)`.
    #[must_use]
    pub fn rotation_about(angle: f64, pivot: Point) -> Self {
        let px = f64::from(pivot.x);
        let py = f64::from(pivot.y);
        Self::compose([
            Self::translation(-px, -py),
            Self::rotation(angle),
            Self::translation(px, py),
        ])
    }

    /// Returns the transform that applies `self` first and `next` second.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        // next × self
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Folds the matrices left to right.
    ///
    /// Applying the result is the same as applying each matrix in iteration order.
    #[must_use]
    pub fn compose<I>(matrices: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        matrices.into_iter().fold(Self::IDENTITY, Self::then)
    }

    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Applies the transform and snaps the result back onto the grid.
    ///
    /// Coordinates are rounded half away from zero.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn apply_to_point(&self, point: Point) -> Point {
        let (x, y) = self.apply(f64::from(point.x), f64::from(point.y));
        Point::new(x.round() as i32, y.round() as i32)
    }
}

/// Moves `point` by `(tx, ty)`.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Point, translate_point};
///
/// assert_eq!(translate_point(Point::new(25, 40), -1, 0), Point::new(24, 40));
/// ```
#[must_use]
pub fn translate_point(point: Point, tx: i32, ty: i32) -> Point {
    AffineMatrix::translation(f64::from(tx), f64::from(ty)).apply_to_point(point)
}

/// Rotates `point` around `pivot` by `angle` radians and rounds to the grid.
///
/// # Example
///
/// ```
/// use std::f64::consts::FRAC_PI_2;
///
/// use blockfall_engine::{Point, rotate_point};
///
/// let rotated = rotate_point(Point::new(1, 0), Point::new(0, 0), FRAC_PI_2);
/// assert_eq!(rotated, Point::new(0, 1));
/// ```
#[must_use]
pub fn rotate_point(point: Point, pivot: Point, angle: f64) -> Point {
    AffineMatrix::rotation_about(angle, pivot).apply_to_point(point)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const ORIGIN: Point = Point::new(0, 0);
    const UNIT_X: Point = Point::new(1, 0);

    #[test]
    fn test_translate_point() {
        let point = Point::new(25, 40);
        assert_eq!(translate_point(point, 1, 0), Point::new(26, 40));
        assert_eq!(translate_point(point, -1, 0), Point::new(24, 40));
        assert_eq!(translate_point(point, 0, 1), Point::new(25, 41));
    }

    #[test]
    fn test_translate_negative_coordinates() {
        assert_eq!(translate_point(Point::new(3, -3), 0, 1), Point::new(3, -2));
        assert_eq!(translate_point(Point::new(0, -1), -1, 0), Point::new(-1, -1));
    }

    #[test]
    fn test_rotate_about_itself_is_identity() {
        let point = Point::new(25, 40);
        for angle in [1.0, FRAC_PI_2, PI, -FRAC_PI_2, 12.345] {
            assert_eq!(rotate_point(point, point, angle), point, "angle {angle}");
        }
    }

    #[test]
    fn test_rotate_right_angles() {
        assert_eq!(rotate_point(UNIT_X, ORIGIN, FRAC_PI_2), Point::new(0, 1));
        assert_eq!(rotate_point(UNIT_X, ORIGIN, PI), Point::new(-1, 0));
        assert_eq!(rotate_point(UNIT_X, ORIGIN, -FRAC_PI_2), Point::new(0, -1));
        assert_eq!(rotate_point(UNIT_X, ORIGIN, 0.0), UNIT_X);
    }

    #[test]
    fn test_rotate_is_periodic() {
        assert_eq!(
            rotate_point(UNIT_X, ORIGIN, 65.0 * FRAC_PI_2),
            Point::new(0, 1)
        );
        assert_eq!(rotate_point(UNIT_X, ORIGIN, 65.0 * PI), Point::new(-1, 0));
        assert_eq!(
            rotate_point(UNIT_X, ORIGIN, -65.0 * FRAC_PI_2),
            Point::new(0, -1)
        );
    }

    #[test]
    fn test_rotate_about_offset_pivot() {
        let pivot = Point::new(6, -3);
        // (4, -3) is two cells left of the pivot; a quarter turn puts it two cells above.
        assert_eq!(
            rotate_point(Point::new(4, -3), pivot, FRAC_PI_2),
            Point::new(6, -5)
        );
        assert_eq!(rotate_point(Point::new(4, -3), pivot, PI), Point::new(8, -3));
    }

    #[test]
    fn test_four_quarter_turns_return_to_start() {
        let pivot = Point::new(5, 5);
        let start = Point::new(7, 4);
        let mut point = start;
        for _ in 0..4 {
            point = rotate_point(point, pivot, FRAC_PI_2);
        }
        assert_eq!(point, start);
    }

    #[test]
    fn test_compose_applies_in_order() {
        let rotate_then_shift = AffineMatrix::compose([
            AffineMatrix::rotation(PI),
            AffineMatrix::translation(10.0, 0.0),
        ]);
        // Rotate (1, 0) to (-1, 0), then shift right by 10.
        assert_eq!(rotate_then_shift.apply_to_point(UNIT_X), Point::new(9, 0));

        let shift_then_rotate = AffineMatrix::compose([
            AffineMatrix::translation(10.0, 0.0),
            AffineMatrix::rotation(PI),
        ]);
        assert_eq!(shift_then_rotate.apply_to_point(UNIT_X), Point::new(-11, 0));
    }

    #[test]
    fn test_compose_empty_is_identity() {
        let matrix = AffineMatrix::compose([]);
        assert_eq!(matrix, AffineMatrix::IDENTITY);
        assert_eq!(matrix.apply_to_point(Point::new(-4, 9)), Point::new(-4, 9));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let matrix = AffineMatrix::translation(0.5, -0.5);
        assert_eq!(matrix.apply_to_point(Point::new(0, 0)), Point::new(1, -1));
    }
}
