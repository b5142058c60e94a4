//! Stage animation core for dance-pad stepcharts.
//!
//! Rows come in already tagged with which heel or toe strikes each arrow.
//! [`feet`] turns them, one at a time, into foot locations and angles on a
//! [`stage`] layout, and [`schedule`] converts those frames into timed
//! keyframes for whatever draws the stage.

pub mod chart;
pub mod config;
pub mod feet;
pub mod parsing;
pub mod schedule;
pub mod stage;
pub mod timing;
