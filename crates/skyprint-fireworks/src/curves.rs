//! Progress curves: monotone remaps of normalized phase time

use serde::{Deserialize, Serialize};

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A monotone mapping from normalized time in [0, 1] to progress in [0, 1].
///
/// Written in TOML as a preset name (`"ease_out"`) or as
/// `{ keyframes = [[t, v], ...] }` for a piecewise-linear curve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressCurve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    SmoothStep,
    Keyframes(Vec<[f32; 2]>),
}

impl ProgressCurve {
    /// Evaluate the curve. Input and output are clamped to [0, 1].
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let v = match self {
            ProgressCurve::Linear => t,
            ProgressCurve::EaseIn => t * t,
            ProgressCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            ProgressCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
            ProgressCurve::Keyframes(points) => sample_keyframes(points, t),
        };
        v.clamp(0.0, 1.0)
    }

    /// Sort keyframes, clamp them into the unit square, and flatten any
    /// decreasing run so the curve is monotone. Returns true if anything
    /// had to change.
    pub fn normalize(&mut self) -> bool {
        let ProgressCurve::Keyframes(points) = self else {
            return false;
        };
        let before = points.clone();
        points.retain(|p| p[0].is_finite() && p[1].is_finite());
        for p in points.iter_mut() {
            p[0] = p[0].clamp(0.0, 1.0);
            p[1] = p[1].clamp(0.0, 1.0);
        }
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        let mut floor = 0.0f32;
        for p in points.iter_mut() {
            floor = floor.max(p[1]);
            p[1] = floor;
        }
        *points != before
    }
}

fn sample_keyframes(points: &[[f32; 2]], t: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first[0] {
        return first[1];
    }
    if t >= last[0] {
        return last[1];
    }
    let idx = points.partition_point(|p| p[0] <= t);
    let prev = points[idx - 1];
    let next = points[idx];
    let span = next[0] - prev[0];
    if span <= 0.0 {
        return prev[1];
    }
    lerp_f32(prev[1], next[1], (t - prev[0]) / span)
}
