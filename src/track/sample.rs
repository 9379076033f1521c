//! Arc-length sampling over a built track.
//!
//! Placements sit one unit of arc apart, so arc `k` is placement `k - 1`
//! and arc `0` is the start frame. Samples between units interpolate
//! linearly and re-orthonormalize.

use crate::sim::Frame;

use super::error::TrackError;
use super::result::Track;

/// Upper bound on the frames one `resample` call may produce.
pub const MAX_SAMPLES: usize = 1 << 20;

impl Track {
    /// Frame at whole-unit arc index `k`: the start frame for `0`, otherwise placement `k - 1`.
    pub fn frame_at_unit(&self, k: usize) -> Frame {
        match k {
            0 => self.start_frame(),
            _ => self.placements()[k.min(self.len()) - 1].frame(),
        }
    }

    /// Interpolated frame at `arc` units from the start, clamped to the track.
    pub fn sample_at(&self, arc: f32) -> Frame {
        let total = self.arc_length();
        if !(arc > 0.0) {
            return self.start_frame();
        }
        if arc >= total {
            return self.frame_at_unit(self.len());
        }

        let lo = arc.floor() as usize;
        let t = arc - lo as f32;
        let a = self.frame_at_unit(lo);
        let b = self.frame_at_unit(lo + 1);

        Frame::new(
            a.position.lerp(b.position, t),
            a.tangent.lerp(b.tangent, t).normalize(),
            a.normal.lerp(b.normal, t).normalize(),
            a.binormal.lerp(b.binormal, t).normalize(),
        )
        .reorthonormalize()
    }

    /// Resamples into frames at approximately uniform arc `spacing`.
    ///
    /// Both ends are always included and an empty track yields just the
    /// start frame. `spacing` must be positive and finite, and fine enough
    /// spacings are rejected once they would exceed [`MAX_SAMPLES`].
    pub fn resample(&self, spacing: f32) -> Result<Vec<Frame>, TrackError> {
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(TrackError::malformed(
                "sample spacing",
                format!("expected a positive finite number, got {spacing}"),
            ));
        }

        let total = self.arc_length();
        if total <= 0.0 {
            return Ok(vec![self.start_frame()]);
        }

        let intervals = (f64::from(total) / f64::from(spacing)).ceil();
        if intervals >= MAX_SAMPLES as f64 {
            return Err(TrackError::malformed(
                "sample spacing",
                format!("spacing {spacing} over {total} units needs more than {MAX_SAMPLES} samples"),
            ));
        }

        let num_samples = 2.max(intervals as usize + 1);
        Ok((0..num_samples)
            .map(|i| {
                let t = i as f32 / (num_samples - 1) as f32;
                self.sample_at(t * total)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::{Float3, Frame, ORTHONORMAL_TOLERANCE};
    use crate::track::{Path, Segment, SweepConfig, Track, TrackError, Turn};

    use super::MAX_SAMPLES;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    fn straight(len: u32) -> Track {
        Track::from_canonical(&Path::new(vec![Segment::straight(len)]), &SweepConfig::default())
            .unwrap()
    }

    #[test]
    fn sample_clamps_to_endpoints() {
        let track = straight(4);
        assert_eq!(track.sample_at(-3.0), Frame::CANONICAL);
        assert_eq!(track.sample_at(f32::NAN), Frame::CANONICAL);
        assert_eq!(track.sample_at(99.0).position, Float3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn sample_interpolates_between_units() {
        let track = straight(4);
        let mid = track.sample_at(2.5);
        assert_relative_eq!(mid.position.z, 2.5, epsilon = TOLERANCE);
        assert_relative_eq!(mid.tangent.z, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn sample_on_curve_stays_orthonormal() {
        let path = Path::new(vec![Segment::curve(Turn::Left, 6, 12).with_cant(0.2)]);
        let track = Track::from_canonical(&path, &SweepConfig::default()).unwrap();
        for i in 0..=24 {
            let frame = track.sample_at(i as f32 * 0.5);
            assert!(frame.is_orthonormal(ORTHONORMAL_TOLERANCE));
        }
    }

    #[test]
    fn whole_units_match_placements() {
        let path = Path::new(vec![Segment::straight(2), Segment::curve(Turn::Right, 9, 5)]);
        let track = Track::from_canonical(&path, &SweepConfig::default()).unwrap();
        for k in 1..=track.len() {
            assert_eq!(track.sample_at(k as f32).position, track.placements()[k - 1].position);
        }
    }

    #[test]
    fn resample_empty_track_returns_start() {
        let track = straight(0);
        assert_eq!(track.resample(1.0).unwrap(), vec![Frame::CANONICAL]);
    }

    #[test]
    fn resample_includes_both_ends() {
        let track = straight(10);
        let samples = track.resample(3.0).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].position, Float3::ZERO);
        assert_relative_eq!(samples[4].position.z, 10.0, epsilon = TOLERANCE);
        assert_relative_eq!(samples[1].position.z, 2.5, epsilon = TOLERANCE);
    }

    #[test]
    fn resample_rejects_non_positive_spacing() {
        for spacing in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                straight(3).resample(spacing),
                Err(TrackError::MalformedInput { .. })
            ));
        }
    }

    #[test]
    fn resample_rejects_spacing_finer_than_sample_cap() {
        let track = straight(10);
        for spacing in [1e-30, f32::MIN_POSITIVE, 1e-9] {
            assert!(matches!(
                track.resample(spacing),
                Err(TrackError::MalformedInput { .. })
            ));
        }

        let finest = 10.0 / (MAX_SAMPLES - 1) as f32 * 1.01;
        let samples = track.resample(finest).unwrap();
        assert!(samples.len() <= MAX_SAMPLES);
    }
}
