//! Behavioral telemetry collection and export.
//!
//! Four append-only logs accumulate during a level and reset when a new one
//! starts:
//!
//! - dwell samples: pose plus per-target bearing angles, at most one per
//!   [`LOG_INTERVAL_MS`] of wall clock;
//! - minimap hover counts and click counts, keyed by `"col,row"`;
//! - gaze samples from the eye-tracking source, producer-paced.
//!
//! Export freezes all of it into a single [`TelemetryExport`] snapshot
//! without clearing the logs, so repeated exports differ only in their end
//! timestamp (and entry counts if the session kept running in between).
//! The snapshot's JSON shape is what the downstream analysis pipeline
//! expects: `sessionInfo`, `mapInfo`, `minimapHeatmap`, `viewportDwellTime`,
//! `eyeTracking`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::config::LOG_INTERVAL_MS;
use crate::game::player::Pose;
use crate::math::vec::Vec3;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn round2(value: f32) -> f64 {
    (f64::from(value) * 100.0).round() / 100.0
}

/// Errors writing the telemetry snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize telemetry snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write telemetry snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Camera position in a dwell sample, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One periodic snapshot of where the camera is and how far off each target
/// lies from the view direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellSample {
    pub timestamp: i64,
    pub camera_pos: CameraPosition,
    /// Degrees between the forward direction and the vector to each
    /// registered target, within `[0, 180]`.
    pub target_angles: BTreeMap<String, f64>,
}

/// One eye-tracking sample in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GazeSample {
    pub timestamp: i64,
    pub x: i32,
    pub y: i32,
}

/// Pointer interaction counts over the minimap, bucketed per grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub hovers: BTreeMap<String, u32>,
    pub clicks: BTreeMap<String, u32>,
}

fn cell_key(col: usize, row: usize) -> String {
    format!("{col},{row}")
}

/// All telemetry accumulated for the level in progress.
#[derive(Debug, Default)]
pub struct TelemetryState {
    targets: BTreeMap<String, Vec3>,
    dwell: Vec<DwellSample>,
    heatmap: Heatmap,
    gaze: Vec<GazeSample>,
    last_log_time: i64,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every log and all registered targets. Called on level
    /// (re)start.
    pub fn reset(&mut self) {
        self.targets.clear();
        self.dwell.clear();
        self.heatmap = Heatmap::default();
        self.gaze.clear();
        self.last_log_time = 0;
    }

    /// Registers a named point of interest for bearing-angle sampling.
    pub fn register_target(&mut self, name: &str, position: Vec3) {
        self.targets.insert(name.to_string(), position);
    }

    pub fn targets(&self) -> &BTreeMap<String, Vec3> {
        &self.targets
    }

    /// Records a dwell sample if at least [`LOG_INTERVAL_MS`] has passed
    /// since the previous one. Returns whether a sample was recorded.
    pub fn maybe_record_dwell(&mut self, now: i64, pose: &Pose) -> bool {
        if now - self.last_log_time <= LOG_INTERVAL_MS {
            return false;
        }

        let position = pose.position();
        let forward = pose.forward();
        let mut target_angles = BTreeMap::new();
        for (name, target) in &self.targets {
            let to_target = target.subtract(&position);
            let degrees = forward.angle_to(&to_target).to_degrees();
            target_angles.insert(name.clone(), round2(degrees));
        }

        self.dwell.push(DwellSample {
            timestamp: now,
            camera_pos: CameraPosition {
                x: round2(position.x()),
                y: round2(position.y()),
                z: round2(position.z()),
            },
            target_angles,
        });
        self.last_log_time = now;
        true
    }

    /// Counts a pointer hover over a minimap cell.
    pub fn record_hover(&mut self, col: usize, row: usize) {
        *self.heatmap.hovers.entry(cell_key(col, row)).or_insert(0) += 1;
    }

    /// Counts a pointer click on a minimap cell.
    pub fn record_click(&mut self, col: usize, row: usize) {
        *self.heatmap.clicks.entry(cell_key(col, row)).or_insert(0) += 1;
    }

    /// Appends a gaze sample. Producer-paced; never rate limited.
    pub fn record_gaze(&mut self, sample: GazeSample) {
        self.gaze.push(sample);
    }

    pub fn dwell_samples(&self) -> &[DwellSample] {
        &self.dwell
    }

    pub fn gaze_samples(&self) -> &[GazeSample] {
        &self.gaze
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    /// Freezes the logs into an export snapshot. Does not clear anything.
    ///
    /// The session start is the first dwell sample's timestamp, or `now`
    /// when no sample was ever taken.
    pub fn export(&self, map_width: usize, map_height: usize, now: i64) -> TelemetryExport {
        let start_time = self.dwell.first().map_or(now, |sample| sample.timestamp);
        TelemetryExport {
            session_info: SessionInfo {
                start_time,
                end_time: now,
                total_log_entries: self.dwell.len(),
            },
            map_info: MapInfo {
                width: map_width,
                height: map_height,
            },
            minimap_heatmap: self.heatmap.clone(),
            viewport_dwell_time: self.dwell.clone(),
            eye_tracking: self.gaze.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub start_time: i64,
    pub end_time: i64,
    pub total_log_entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapInfo {
    pub width: usize,
    pub height: usize,
}

/// The consolidated, immutable telemetry record offered for download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryExport {
    pub session_info: SessionInfo,
    pub map_info: MapInfo,
    pub minimap_heatmap: Heatmap,
    pub viewport_dwell_time: Vec<DwellSample>,
    pub eye_tracking: Vec<GazeSample>,
}

impl TelemetryExport {
    /// Serializes the snapshot as pretty-printed JSON and writes it out.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let body = serde_json::to_vec_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }

    /// Post-hoc session metrics, the same ones the analysis pipeline
    /// derives from the exported file.
    pub fn summary(&self) -> SessionSummary {
        let mut path_length = 0.0;
        let mut previous: Option<(f64, f64)> = None;
        let mut angle_change_sum = 0.0;
        let mut angle_change_count = 0usize;

        for sample in &self.viewport_dwell_time {
            let (x, z) = (sample.camera_pos.x, sample.camera_pos.z);
            if let Some((px, pz)) = previous {
                path_length += ((x - px).powi(2) + (z - pz).powi(2)).sqrt();
            }
            previous = Some((x, z));

            if let (Some(exit), Some(start)) = (
                sample.target_angles.get("Exit"),
                sample.target_angles.get("Start"),
            ) {
                angle_change_sum += (exit - start).abs();
                angle_change_count += 1;
            }
        }

        SessionSummary {
            duration_ms: self.session_info.end_time - self.session_info.start_time,
            samples: self.viewport_dwell_time.len(),
            path_length,
            mean_angle_change: (angle_change_count > 0)
                .then(|| angle_change_sum / angle_change_count as f64),
        }
    }
}

/// Headline metrics for one session, logged at game over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub duration_ms: i64,
    pub samples: usize,
    pub path_length: f64,
    pub mean_angle_change: Option<f64>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} dwell samples over {:.1}s, {:.0} units walked",
            self.samples,
            self.duration_ms as f64 / 1000.0,
            self.path_length
        )?;
        if let Some(mean) = self.mean_angle_change {
            write!(f, ", mean |Exit-Start| bearing {:.1} deg", mean)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EYE_HEIGHT;

    #[test]
    fn test_dwell_sampling_rate() {
        let mut telemetry = TelemetryState::new();
        let pose = Pose::at(0.0, 0.0);

        // Ticks every 16 ms over 5 seconds of simulated wall clock.
        let duration_ms = 5000;
        let mut recorded = 0;
        let mut now = 1_000_000;
        let end = now + duration_ms;
        while now < end {
            if telemetry.maybe_record_dwell(now, &pose) {
                recorded += 1;
            }
            now += 16;
        }

        let expected = duration_ms / LOG_INTERVAL_MS;
        assert!(
            (recorded - expected).abs() <= 1,
            "recorded {recorded} samples, expected about {expected}"
        );
    }

    #[test]
    fn test_bearing_angle_ahead_and_behind() {
        let mut telemetry = TelemetryState::new();
        let pose = Pose::at(0.0, 0.0);
        // Forward at yaw 0 is -z: one target dead ahead, one dead behind.
        telemetry.register_target("Exit", Vec3::new(0.0, EYE_HEIGHT, -500.0));
        telemetry.register_target("Start", Vec3::new(0.0, EYE_HEIGHT, 500.0));

        assert!(telemetry.maybe_record_dwell(1_000, &pose));
        let sample = &telemetry.dwell_samples()[0];
        assert_eq!(sample.target_angles["Exit"], 0.0);
        assert_eq!(sample.target_angles["Start"], 180.0);
    }

    #[test]
    fn test_click_counts_accumulate_exactly() {
        let mut telemetry = TelemetryState::new();
        for _ in 0..5 {
            telemetry.record_click(2, 3);
        }
        telemetry.record_hover(2, 3);
        assert_eq!(telemetry.heatmap().clicks["2,3"], 5);
        assert_eq!(telemetry.heatmap().hovers["2,3"], 1);
        assert!(!telemetry.heatmap().clicks.contains_key("3,2"));
    }

    #[test]
    fn test_export_idempotent_except_end_time() {
        let mut telemetry = TelemetryState::new();
        let pose = Pose::at(10.0, -20.0);
        telemetry.maybe_record_dwell(1_000, &pose);
        telemetry.record_gaze(GazeSample {
            timestamp: 1_001,
            x: 640,
            y: 360,
        });

        let first = telemetry.export(9, 7, 2_000);
        let second = telemetry.export(9, 7, 3_000);

        assert_eq!(first.session_info.start_time, 1_000);
        assert_eq!(second.session_info.start_time, 1_000);
        assert_eq!(first.session_info.end_time, 2_000);
        assert_eq!(second.session_info.end_time, 3_000);
        assert_eq!(first.viewport_dwell_time, second.viewport_dwell_time);
        assert_eq!(first.eye_tracking, second.eye_tracking);
        assert_eq!(first.minimap_heatmap, second.minimap_heatmap);
        // Export must not drain the logs.
        assert_eq!(telemetry.dwell_samples().len(), 1);
        assert_eq!(telemetry.gaze_samples().len(), 1);
    }

    #[test]
    fn test_export_start_time_falls_back_to_now() {
        let telemetry = TelemetryState::new();
        let export = telemetry.export(3, 3, 42_000);
        assert_eq!(export.session_info.start_time, 42_000);
        assert_eq!(export.session_info.total_log_entries, 0);
    }

    #[test]
    fn test_export_json_shape() {
        let mut telemetry = TelemetryState::new();
        telemetry.record_click(1, 2);
        let export = telemetry.export(4, 5, 10_000);
        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("sessionInfo").is_some());
        assert_eq!(json["mapInfo"]["width"], 4);
        assert_eq!(json["mapInfo"]["height"], 5);
        assert_eq!(json["minimapHeatmap"]["clicks"]["1,2"], 1);
        assert!(json["viewportDwellTime"].is_array());
        assert!(json["eyeTracking"].is_array());
    }

    #[test]
    fn test_summary_path_length() {
        let mut telemetry = TelemetryState::new();
        telemetry.maybe_record_dwell(1_000, &Pose::at(0.0, 0.0));
        telemetry.maybe_record_dwell(2_000, &Pose::at(30.0, 40.0));
        let summary = telemetry.export(3, 3, 2_500).summary();
        assert_eq!(summary.samples, 2);
        assert!((summary.path_length - 50.0).abs() < 1e-6);
        assert_eq!(summary.duration_ms, 1_500);
    }

    #[test]
    fn test_reset_clears_all_logs() {
        let mut telemetry = TelemetryState::new();
        telemetry.register_target("Exit", Vec3::new(0.0, 0.0, 0.0));
        telemetry.maybe_record_dwell(1_000, &Pose::at(0.0, 0.0));
        telemetry.record_hover(0, 0);
        telemetry.record_gaze(GazeSample {
            timestamp: 1,
            x: 0,
            y: 0,
        });

        telemetry.reset();
        assert!(telemetry.dwell_samples().is_empty());
        assert!(telemetry.gaze_samples().is_empty());
        assert!(telemetry.heatmap().hovers.is_empty());
        assert!(telemetry.targets().is_empty());
        // The interval gate is rearmed as well.
        assert!(telemetry.maybe_record_dwell(251, &Pose::at(0.0, 0.0)));
    }
}
