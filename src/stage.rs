use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Squared stage distance under which one foot can cover two arrows.
const BRACKET_DISTANCE_SQ: f32 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A position on the stage diagram, in arrow-panel units.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline(always)]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagePoint {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
}

impl StagePoint {
    const fn new(x: f32, y: f32, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    #[inline(always)]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Geometry of one pad style. Index into `points` is the chart column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub name: String,
    pub points: Vec<StagePoint>,
    pub up_arrows: Vec<usize>,
    pub down_arrows: Vec<usize>,
    pub side_arrows: Vec<usize>,
    pub starting_left: usize,
    pub starting_right: usize,
}

impl StageLayout {
    pub fn column_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, column: usize) -> Option<&StagePoint> {
        self.points.get(column)
    }

    pub fn is_up_arrow(&self, column: usize) -> bool {
        self.up_arrows.contains(&column)
    }

    pub fn is_down_arrow(&self, column: usize) -> bool {
        self.down_arrows.contains(&column)
    }

    pub fn is_side_arrow(&self, column: usize) -> bool {
        self.side_arrows.contains(&column)
    }

    /// Where the left and right feet stand before the first row.
    pub fn starting_points(&self) -> (Point, Point) {
        let left = self
            .point(self.starting_left)
            .map(StagePoint::point)
            .unwrap_or_default();
        let right = self
            .point(self.starting_right)
            .map(StagePoint::point)
            .unwrap_or_default();
        (left, right)
    }

    /// Midpoint of two columns. A missing column yields the other one's
    /// point; `None` when neither column is present.
    pub fn average_point(&self, a: Option<usize>, b: Option<usize>) -> Option<Point> {
        let pa = a.and_then(|c| self.point(c));
        let pb = b.and_then(|c| self.point(c));
        match (pa, pb) {
            (Some(p1), Some(p2)) => {
                Some(Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0))
            }
            (Some(p), None) | (None, Some(p)) => Some(p.point()),
            (None, None) => None,
        }
    }

    /// Squared distance between two columns, `None` if either is off the pad.
    pub fn distance_sq(&self, a: usize, b: usize) -> Option<f32> {
        let p1 = self.point(a)?;
        let p2 = self.point(b)?;
        Some((p1.y - p2.y) * (p1.y - p2.y) + (p1.x - p2.x) * (p1.x - p2.x))
    }

    pub fn bracket_check(&self, a: usize, b: usize) -> bool {
        self.distance_sq(a, b).is_some_and(|d| d <= BRACKET_DISTANCE_SQ)
    }
}

/// Angle of the vector `p2 - p1` in degrees, `[0, 360)`, with 0° pointing up
/// the stage. Coincident points resolve to 0°.
pub fn calculate_angle(p1: Point, p2: Point) -> f64 {
    let dx = f64::from(p2.x) - f64::from(p1.x);
    let dy = f64::from(p2.y) - f64::from(p1.y);
    if (dx == 0.0 && dy == 0.0) || !dx.is_finite() || !dy.is_finite() {
        return 0.0;
    }

    // atan2(dx, dy) rather than (dy, dx): rotates the frame so +y is 0°.
    let mut angle = dx.atan2(dy).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle >= 360.0 {
        angle -= 360.0;
    }
    angle
}

#[inline(always)]
pub fn are_points_equal(p1: Point, p2: Point) -> bool {
    p1.x == p2.x && p1.y == p2.y
}

/// Cosine of the angle the left→right foot line makes with the x-axis.
/// Tells how far the player is turned, not which way.
pub fn facing_direction_cos(left: Point, right: Point) -> f32 {
    if are_points_equal(left, right) {
        return 0.0;
    }
    let dx = right.x - left.x;
    let dy = right.y - left.y;
    dx / (dx * dx + dy * dy).sqrt()
}

pub fn facing_direction_sin(left: Point, right: Point) -> f32 {
    if are_points_equal(left, right) {
        return 0.0;
    }
    let dx = right.x - left.x;
    let dy = right.y - left.y;
    dy / (dx * dx + dy * dy).sqrt()
}

// Left, Down, Up, Right around a 3x3 grid with the center panel empty.
const SINGLE_PAD: [StagePoint; 4] = [
    StagePoint::new(0.0, 1.0, Direction::Left),
    StagePoint::new(1.0, 0.0, Direction::Down),
    StagePoint::new(1.0, 2.0, Direction::Up),
    StagePoint::new(2.0, 1.0, Direction::Right),
];

const DOUBLE_PAD_X_SHIFT: f32 = 3.0;

fn dance_single() -> StageLayout {
    StageLayout {
        name: "dance-single".to_string(),
        points: SINGLE_PAD.to_vec(),
        up_arrows: vec![2],
        down_arrows: vec![1],
        side_arrows: vec![0, 3],
        starting_left: 0,
        starting_right: 3,
    }
}

fn dance_double() -> StageLayout {
    let p2 = SINGLE_PAD
        .iter()
        .map(|p| StagePoint::new(p.x + DOUBLE_PAD_X_SHIFT, p.y, p.direction));
    StageLayout {
        name: "dance-double".to_string(),
        points: SINGLE_PAD.iter().copied().chain(p2).collect(),
        up_arrows: vec![2, 6],
        down_arrows: vec![1, 5],
        side_arrows: vec![0, 3, 4, 7],
        starting_left: 0,
        starting_right: 3,
    }
}

static LAYOUTS: Lazy<HashMap<&'static str, StageLayout>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("dance-single", dance_single());
    map.insert("dance-double", dance_double());
    map
});

/// Looks up one of the built-in pad layouts by steps type.
pub fn layout_by_name(name: &str) -> Option<&'static StageLayout> {
    LAYOUTS.get(name)
}

pub fn layout_names() -> Vec<&'static str> {
    let mut names: Vec<_> = LAYOUTS.keys().copied().collect();
    names.sort_unstable();
    names
}
