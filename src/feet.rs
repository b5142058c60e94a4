//! Foot placement and body orientation.
//!
//! Each chart row is folded into the previous [`BodyPosition`] to produce the
//! next one. Nothing here holds state between calls: the caller owns the
//! position and passes it back in for the following row, in chart order.
//!
//! Angles are degrees and are deliberately left unwrapped across frames.
//! A foot that keeps turning the same way accumulates past ±360° so that an
//! interpolating animator never sees a jump at the wrap boundary. Callers must
//! store `angle` as returned.

use crate::chart::Row;
use crate::stage::{
    Direction, Point, StageLayout, StagePoint, are_points_equal, calculate_angle,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Sideways nudge applied to a foot standing on a single arrow.
pub const FOOT_X_MOD: f32 = 0.3;
/// Nudge toward the pad center for up/down arrows.
pub const FOOT_Y_MOD: f32 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Which way along x this foot rests relative to the arrow it stands on.
    #[inline(always)]
    pub fn lateral_sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// The side arrow this foot would normally own.
    pub fn home_direction(self) -> Direction {
        match self {
            Side::Left => Direction::Left,
            Side::Right => Direction::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootPosition {
    pub location: Point,
    pub heel: Point,
    pub toe: Option<Point>,
    pub angle: f64,
    pub moved: bool,
}

impl FootPosition {
    /// A foot at rest on `location`, pointing straight up the stage.
    pub fn at(location: Point) -> Self {
        Self {
            location,
            heel: location,
            toe: None,
            angle: 0.0,
            moved: false,
        }
    }

    fn held(&self) -> Self {
        Self {
            moved: false,
            ..*self
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub left: FootPosition,
    pub right: FootPosition,
    pub body_angle: f64,
}

impl BodyPosition {
    /// Both feet standing still on the layout's starting columns.
    pub fn initial(layout: &StageLayout) -> Self {
        let (left, right) = layout.starting_points();
        Self {
            left: FootPosition::at(left),
            right: FootPosition::at(right),
            body_angle: 0.0,
        }
    }

    pub fn foot(&self, side: Side) -> &FootPosition {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementOptions {
    /// Fraction of the previous body angle kept each row, `0.0..=1.0`.
    /// Zero uses the freshly computed angle as is.
    pub body_angle_blend: f32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            body_angle_blend: 0.0,
        }
    }
}

/// Heel/toe columns a single foot strikes in one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
struct FootColumns {
    heel: Option<usize>,
    toe: Option<usize>,
}

impl FootColumns {
    fn from_row(row: &Row, side: Side) -> Self {
        let mut columns = Self::default();
        for note in row.notes.iter().filter(|n| n.foot_part.side() == Some(side)) {
            let slot = if note.foot_part.is_toe() {
                &mut columns.toe
            } else {
                &mut columns.heel
            };
            slot.get_or_insert(note.column);
        }
        columns
    }
}

pub fn calculate_feet_positions(
    row: &Row,
    layout: &StageLayout,
    previous: &BodyPosition,
) -> BodyPosition {
    calculate_feet_positions_with(row, layout, previous, &PlacementOptions::default())
}

pub fn calculate_feet_positions_with(
    row: &Row,
    layout: &StageLayout,
    previous: &BodyPosition,
    options: &PlacementOptions,
) -> BodyPosition {
    let left_columns = FootColumns::from_row(row, Side::Left);
    let right_columns = FootColumns::from_row(row, Side::Right);

    // Rough foot locations, only used to orient the body.
    let left_estimate = layout
        .average_point(left_columns.heel, left_columns.toe)
        .unwrap_or(previous.left.location);
    let right_estimate = layout
        .average_point(right_columns.heel, right_columns.toe)
        .unwrap_or(previous.right.location);

    let mut body_angle = calculate_angle(left_estimate, right_estimate);
    if options.body_angle_blend > 0.0 {
        body_angle = blend_body_angle(previous.body_angle, body_angle, options.body_angle_blend);
    }

    BodyPosition {
        left: next_foot_position(
            row,
            left_columns,
            body_angle,
            layout,
            &previous.left,
            Side::Left,
        ),
        right: next_foot_position(
            row,
            right_columns,
            body_angle,
            layout,
            &previous.right,
            Side::Right,
        ),
        body_angle,
    }
}

fn next_foot_position(
    row: &Row,
    columns: FootColumns,
    body_angle: f64,
    layout: &StageLayout,
    previous: &FootPosition,
    side: Side,
) -> FootPosition {
    let Some(heel_column) = columns.heel else {
        return previous.held();
    };
    let Some(heel_point) = layout.point(heel_column) else {
        return previous.held();
    };
    let heel = heel_point.point();
    let toe_column = columns.toe.filter(|&c| layout.point(c).is_some());
    let toe = toe_column.and_then(|c| layout.point(c)).map(StagePoint::point);

    // A bracket pins the foot between both arrows and along the line through
    // them; otherwise it sits slightly off-center, perpendicular to the body.
    let (location, raw_angle) = match toe {
        Some(toe) => (
            layout.average_point(Some(heel_column), toe_column).unwrap_or(heel),
            calculate_angle(heel, toe),
        ),
        None => (
            natural_location(layout, heel_column, heel_point, side),
            body_angle - 90.0,
        ),
    };

    let stationary = are_points_equal(location, previous.location);

    let holding = row
        .note_at(heel_column)
        .is_some_and(|n| n.note_type.is_hold_continuation());
    if holding && stationary {
        trace!("{:?} foot held on column {} at beat {}", side, heel_column, row.beat);
        return previous.held();
    }

    // Re-deriving the angle of a foot that stays put only adds wobble.
    let angle = if stationary {
        previous.angle
    } else {
        reconcile_angle(previous.angle, raw_angle)
    };

    FootPosition {
        location,
        heel,
        toe,
        angle,
        moved: !stationary,
    }
}

/// Arrow position nudged so the foot lands where a dancer would put it:
/// toward its own side on up/down arrows, toward the center on its home side
/// arrow.
fn natural_location(
    layout: &StageLayout,
    column: usize,
    stage_point: &StagePoint,
    side: Side,
) -> Point {
    let lateral = side.lateral_sign();
    let mut location = stage_point.point();

    if layout.is_up_arrow(column) {
        location.y -= FOOT_Y_MOD;
        location.x += FOOT_X_MOD * lateral;
    } else if layout.is_down_arrow(column) {
        location.y += FOOT_Y_MOD;
        location.x += FOOT_X_MOD * lateral;
    }

    if stage_point.direction == side.home_direction() {
        location.x -= FOOT_X_MOD * lateral;
    }

    location
}

/// Signed shortest rotation from `from` to `to`, in `[-180, 180)`.
#[inline(always)]
fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta >= 180.0 { delta - 360.0 } else { delta }
}

/// Picks the representation of `raw` (modulo 360°) closest to `previous`, so
/// the foot always turns the short way and its angle stays continuous.
pub fn reconcile_angle(previous: f64, raw: f64) -> f64 {
    previous + shortest_delta(previous, raw)
}

fn blend_body_angle(previous: f64, computed: f64, blend: f32) -> f64 {
    let keep = f64::from(blend.clamp(0.0, 1.0));
    let blended = previous + shortest_delta(previous, computed) * (1.0 - keep);
    blended.rem_euclid(360.0)
}

/// Runs the placement engine over a whole chart, returning the body position
/// after each row.
pub fn walk_chart(
    rows: &[Row],
    layout: &StageLayout,
    options: &PlacementOptions,
) -> Vec<BodyPosition> {
    let mut frames = Vec::with_capacity(rows.len());
    let mut position = BodyPosition::initial(layout);

    for row in rows {
        position = calculate_feet_positions_with(row, layout, &position, options);
        trace!(
            "beat {:.3}: body {:.1} L({:.2},{:.2} @{:.1}) R({:.2},{:.2} @{:.1})",
            row.beat,
            position.body_angle,
            position.left.location.x,
            position.left.location.y,
            position.left.angle,
            position.right.location.x,
            position.right.location.y,
            position.right.angle,
        );
        frames.push(position);
    }

    debug!("Placed feet for {} rows on '{}'.", frames.len(), layout.name);
    frames
}
