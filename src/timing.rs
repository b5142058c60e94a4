use crate::parsing::ChartError;
use crate::parsing::bpm::parse_bpms;
use log::info;
use std::cmp::Ordering;
use std::sync::Arc;

const FALLBACK_BPM: f32 = 120.0;

/// Beat → playback time for the stage animation.
///
/// Times are milliseconds on the animation clock, which starts one beat
/// (at the opening BPM) before beat zero so the first step has room to play.
#[derive(Debug, Clone)]
pub struct TimingData {
    /// A pre-calculated mapping from a beat to its precise time in seconds.
    beat_to_time: Arc<Vec<BeatTimePoint>>,
    pre_delay_ms: f32,
}

#[derive(Debug, Clone, Default, Copy)]
struct BeatTimePoint {
    beat: f32,
    time_sec: f32,
    bpm: f32,
}

impl TimingData {
    pub fn constant(bpm: f32) -> Self {
        Self::from_bpms(&[(0.0, bpm)])
    }

    pub fn from_bpm_string(bpms: &str) -> Result<Self, ChartError> {
        Ok(Self::from_bpms(&parse_bpms(bpms)?))
    }

    /// Builds the timing map from `(beat, bpm)` pairs sorted by beat.
    pub fn from_bpms(bpms: &[(f32, f32)]) -> Self {
        let mut parsed_bpms: Vec<(f32, f32)> = bpms
            .iter()
            .copied()
            .filter(|&(_, bpm)| bpm.is_finite() && bpm > 0.0)
            .collect();

        if parsed_bpms.is_empty() {
            parsed_bpms.push((0.0, FALLBACK_BPM));
        }
        if parsed_bpms.first().map_or(true, |(b, _)| *b != 0.0) {
            parsed_bpms.insert(0, (0.0, parsed_bpms[0].1));
        }

        let mut beat_to_time = Vec::with_capacity(parsed_bpms.len());
        let mut current_time = 0.0;
        let mut last_beat = 0.0;
        let mut last_bpm = parsed_bpms[0].1;

        for &(beat, bpm) in &parsed_bpms {
            if beat > last_beat {
                current_time += (beat - last_beat) * (60.0 / last_bpm);
            }
            beat_to_time.push(BeatTimePoint {
                beat,
                time_sec: current_time,
                bpm,
            });
            last_beat = beat;
            last_bpm = bpm;
        }

        let pre_delay_ms = 60_000.0 / parsed_bpms[0].1;
        info!("TimingData built from {} BPM segments.", beat_to_time.len());

        Self {
            beat_to_time: Arc::new(beat_to_time),
            pre_delay_ms,
        }
    }

    fn point_for_beat(&self, target_beat: f32) -> BeatTimePoint {
        let points = &self.beat_to_time;
        let search = points.binary_search_by(|p| {
            p.beat.partial_cmp(&target_beat).unwrap_or(Ordering::Less)
        });
        let point_idx = match search {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        points.get(point_idx).copied().unwrap_or(BeatTimePoint {
            beat: 0.0,
            time_sec: 0.0,
            bpm: FALLBACK_BPM,
        })
    }

    /// Seconds from beat zero to `target_beat`, ignoring the pre-delay.
    pub fn seconds_for_beat(&self, target_beat: f32) -> f32 {
        let point = self.point_for_beat(target_beat);
        point.time_sec + (target_beat - point.beat) * (60.0 / point.bpm)
    }

    pub fn time_ms_for_beat(&self, target_beat: f32) -> f32 {
        self.pre_delay_ms + self.seconds_for_beat(target_beat) * 1000.0
    }

    pub fn bpm_for_beat(&self, target_beat: f32) -> f32 {
        self.point_for_beat(target_beat).bpm
    }

    /// Length of one beat, in milliseconds, at `target_beat`.
    pub fn beat_ms_at(&self, target_beat: f32) -> f32 {
        60_000.0 / self.bpm_for_beat(target_beat)
    }

    pub fn pre_delay_ms(&self) -> f32 {
        self.pre_delay_ms
    }
}
