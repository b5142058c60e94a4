//! Turns placement frames into timed keyframes for a timeline player.
//!
//! Nothing here plays an animation. The output says what should move, when,
//! for how long, and with which easing; an external animator does the rest.

use crate::chart::{NoteType, Row};
use crate::config::{FOOT_LIFT_SCALE, Settings};
use crate::feet::{BodyPosition, FootPosition, PlacementOptions, Side, walk_chart};
use crate::stage::StageLayout;
use crate::timing::TimingData;
use log::info;
use serde::{Deserialize, Serialize};

/// StepMania-style easing names: `accelerate` is quad-in, `decelerate`
/// quad-out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    Accelerate,
    Decelerate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TweenOp {
    /// Move the foot sprite to pixel coordinates on the stage diagram.
    MoveTo { x: f32, y: f32 },
    /// Scale and rotate the foot sprite. Rotation is in screen degrees
    /// (clockwise), the negation of the stage angle.
    Pose { scale: f32, rotation: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub ease: Ease,
    pub start_ms: f32,
    pub duration_ms: f32,
    pub op: TweenOp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootTransition {
    pub side: Side,
    pub row: usize,
    pub delay_ms: f32,
    pub duration_ms: f32,
    pub from: FootPosition,
    pub to: FootPosition,
    pub tweens: Vec<Tween>,
}

/// The moment a chart arrow reaches the receptors and should disappear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrowCue {
    pub row: usize,
    pub column: usize,
    pub time_ms: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageTimeline {
    pub layout: String,
    pub pre_delay_ms: f32,
    pub song_duration_ms: f32,
    pub post_delay_ms: f32,
    pub total_duration_ms: f32,
    /// Total scroll distance of the chart in pixels.
    pub chart_height: f32,
    pub frames: Vec<BodyPosition>,
    pub transitions: Vec<FootTransition>,
    pub arrow_cues: Vec<ArrowCue>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineOptions {
    pub arrow_size: f32,
    pub stage_arrow_size: f32,
    pub xmod: f32,
    pub placement: PlacementOptions,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        TimelineOptions::from(&Settings::default())
    }
}

impl From<&Settings> for TimelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            arrow_size: settings.arrow_size,
            stage_arrow_size: settings.stage_arrow_size,
            xmod: settings.xmod,
            placement: PlacementOptions {
                body_angle_blend: settings.body_angle_blend,
            },
        }
    }
}

#[inline(always)]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn foot_tweens(
    from: &FootPosition,
    to: &FootPosition,
    delay_ms: f32,
    duration_ms: f32,
    stage_arrow_size: f32,
) -> Vec<Tween> {
    let half = duration_ms / 2.0;
    vec![
        Tween {
            ease: Ease::Linear,
            start_ms: delay_ms,
            duration_ms,
            op: TweenOp::MoveTo {
                x: to.location.x * stage_arrow_size,
                y: to.location.y * stage_arrow_size,
            },
        },
        // Lift while turning halfway...
        Tween {
            ease: Ease::Decelerate,
            start_ms: delay_ms,
            duration_ms: half,
            op: TweenOp::Pose {
                scale: FOOT_LIFT_SCALE,
                rotation: -lerp(from.angle, to.angle, 0.5),
            },
        },
        // ...then set down facing the new angle.
        Tween {
            ease: Ease::Accelerate,
            start_ms: delay_ms + half,
            duration_ms: half,
            op: TweenOp::Pose {
                scale: 1.0,
                rotation: -to.angle,
            },
        },
    ]
}

pub fn build_stage_timeline(
    rows: &[Row],
    layout: &StageLayout,
    timing: &TimingData,
    options: &TimelineOptions,
) -> StageTimeline {
    let pre_delay_ms = timing.pre_delay_ms();
    let final_beat = rows.last().map_or(0.0, |r| r.beat);
    let song_duration_ms = timing.seconds_for_beat(final_beat) * 1000.0;
    let post_delay_ms = timing.beat_ms_at(final_beat);

    let frames = walk_chart(rows, layout, &options.placement);
    let mut transitions = Vec::new();
    let mut arrow_cues = Vec::new();

    let mut previous = BodyPosition::initial(layout);
    let mut previous_time = pre_delay_ms;

    for (row_index, (row, next)) in rows.iter().zip(frames.iter()).enumerate() {
        let time = timing.time_ms_for_beat(row.beat);
        let duration_ms = time - previous_time;
        let delay_ms = previous_time;

        for side in Side::BOTH {
            let (from, to) = (previous.foot(side), next.foot(side));
            if !to.moved {
                continue;
            }
            transitions.push(FootTransition {
                side,
                row: row_index,
                delay_ms,
                duration_ms,
                from: *from,
                to: *to,
                tweens: foot_tweens(
                    from,
                    to,
                    delay_ms,
                    duration_ms,
                    options.stage_arrow_size,
                ),
            });
        }

        arrow_cues.extend(
            row.notes
                .iter()
                .filter(|n| matches!(n.note_type, NoteType::Tap | NoteType::Mine))
                .map(|n| ArrowCue {
                    row: row_index,
                    column: n.column,
                    time_ms: time,
                }),
        );

        previous = *next;
        previous_time = time;
    }

    info!(
        "Built stage timeline for '{}': {} rows, {} foot transitions, {} arrow cues.",
        layout.name,
        rows.len(),
        transitions.len(),
        arrow_cues.len()
    );

    StageTimeline {
        layout: layout.name.clone(),
        pre_delay_ms,
        song_duration_ms,
        post_delay_ms,
        total_duration_ms: pre_delay_ms + song_duration_ms + post_delay_ms,
        chart_height: final_beat * options.arrow_size * options.xmod,
        frames,
        transitions,
        arrow_cues,
    }
}
