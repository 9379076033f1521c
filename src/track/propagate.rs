//! Unit-step frame propagation along a path.
//!
//! The frame starts at the caller's anchor, and every segment sweeps it
//! forward one unit of arc length at a time, emitting one placement per
//! unit. Segment transitions only happen between units, and each segment
//! starts exactly where the previous one ended.

use tracing::{debug, trace};

use crate::sim::{bank, Frame, Quaternion};

use super::config::SweepConfig;
use super::error::TrackError;
use super::placement::Placement;
use super::segment::{Path, Segment, Turn};

/// Propagates `path` from `start` with the default configuration.
///
/// Returns every placement in order and the frame after the last unit.
pub fn propagate(path: &Path, start: Frame) -> Result<(Vec<Placement>, Frame), TrackError> {
    propagate_with(path, start, &SweepConfig::default())
}

/// Propagates `path` from `start`.
///
/// The whole path is validated before the first unit is swept, so a bad
/// segment anywhere yields an error and no placements at all.
pub fn propagate_with(
    path: &Path,
    start: Frame,
    config: &SweepConfig,
) -> Result<(Vec<Placement>, Frame), TrackError> {
    path.validate()?;

    let mut frame = start.reorthonormalize();
    if !frame.is_valid() {
        return Err(TrackError::DegenerateFrame);
    }

    let mut placements = Vec::with_capacity(path.total_length());

    for (index, segment) in path.iter().enumerate() {
        let emitted_before = placements.len();
        frame = match *segment {
            Segment::Straight { length } => sweep_straight(frame, length, &mut placements),
            Segment::Curve {
                turn,
                radius,
                length,
                cant,
                ..
            } => sweep_curve(frame, turn, radius, length, cant, config, &mut placements),
        };
        debug!(
            index,
            kind = segment.kind(),
            emitted = placements.len() - emitted_before,
            "segment swept"
        );
    }

    Ok((placements, frame))
}

fn sweep_straight(mut frame: Frame, length: u32, out: &mut Vec<Placement>) -> Frame {
    for _ in 0..length {
        let tangent = frame.tangent.normalize();
        let position = frame.position + tangent;
        let binormal = frame.normal.cross(tangent);

        frame = Frame::new(position, tangent, frame.normal, binormal);
        out.push(Placement::from_frame(&frame));
    }
    frame
}

/// Sweeps a constant-curvature arc.
///
/// The radius is signed by the turn so one set of formulas covers both
/// directions: the centre sits at `binormal * signed_radius`, and a positive
/// angle about the normal bends the tangent toward `+binormal`.
///
/// Curve placements use the same `(B, N, T)` columns as straights, so a mesh
/// authored for a straight needs no flip on curves. The running normal is
/// the curve-start normal throughout; only the emitted copy is banked.
fn sweep_curve(
    start: Frame,
    turn: Turn,
    radius: i32,
    length: u32,
    cant: f32,
    config: &SweepConfig,
    out: &mut Vec<Placement>,
) -> Frame {
    if length == 0 {
        return start;
    }

    let signed_radius = turn.sign() * radius.unsigned_abs() as f32;
    let center = start.position + start.binormal.normalize() * signed_radius;
    let angle = 1.0 / signed_radius;
    let axis = start.normal;
    let arm = start.position - center;

    trace!(?turn, signed_radius, angle, "curve centre at {:?}", center);

    let mut frame = start;
    for i in 1..=length {
        let sweep = Quaternion::from_axis_angle(axis, angle * i as f32);
        let tangent = sweep.mul_vec(start.tangent);
        let position = center + sweep.mul_vec(arm);

        frame = Frame::new(position, tangent, frame.normal, frame.normal.cross(tangent))
            .reorthonormalize();

        let banked = bank(frame, cant, turn.sign(), config.cant_model);
        out.push(Placement::from_frame(&banked));
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{signed_angle_about, Float3, ORTHONORMAL_TOLERANCE};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn run(segments: Vec<Segment>) -> (Vec<Placement>, Frame) {
        propagate(&Path::new(segments), Frame::CANONICAL).unwrap()
    }

    fn assert_vec_eq(a: Float3, b: Float3, epsilon: f32) {
        assert_relative_eq!(a.x, b.x, epsilon = epsilon);
        assert_relative_eq!(a.y, b.y, epsilon = epsilon);
        assert_relative_eq!(a.z, b.z, epsilon = epsilon);
    }

    #[test]
    fn straight_three_from_canonical() {
        let (placements, end) = run(vec![Segment::straight(3)]);

        assert_eq!(placements.len(), 3);
        for (i, p) in placements.iter().enumerate() {
            assert_eq!(p.position, Float3::new(0.0, 0.0, (i + 1) as f32));
            assert_eq!(p.transform.rotation, crate::sim::Matrix3::IDENTITY);
            assert_eq!(p.transform.translation, p.position);
            assert_eq!(p.frame().tangent, Float3::FORWARD);
        }
        assert_eq!(end.tangent, Float3::FORWARD);
        assert_eq!(end.normal, Float3::UP);
        assert_eq!(end.position, Float3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn straight_steps_follow_rotated_tangent() {
        let start = Frame::CANONICAL
            .rotate_around(Float3::new(0.3, 1.0, -0.2), 1.1)
            .with_position(Float3::new(5.0, 1.0, -2.0));
        let (placements, _) = propagate(&Path::new(vec![Segment::straight(6)]), start).unwrap();

        let mut prev = start.position;
        for p in &placements {
            let step = p.position - prev;
            assert_relative_eq!(step.magnitude(), 1.0, epsilon = 1e-5);
            assert_vec_eq(step, start.tangent, 1e-5);
            assert!(p.frame().is_orthonormal(ORTHONORMAL_TOLERANCE));
            prev = p.position;
        }
    }

    #[test]
    fn zero_length_curve_is_a_no_op() {
        let (placements, end) = run(vec![Segment::curve(Turn::Right, 10, 0)]);
        assert!(placements.is_empty());
        assert_eq!(end, Frame::CANONICAL);
    }

    #[test]
    fn zero_radius_fails_before_stepping() {
        let path = Path::new(vec![Segment::straight(5), Segment::curve(Turn::Left, 0, 5)]);
        let err = propagate(&path, Frame::CANONICAL).unwrap_err();
        assert!(matches!(err, TrackError::InvalidSegment { index: 1, .. }));
    }

    #[test]
    fn degenerate_start_frame_is_rejected() {
        let start = Frame::new(Float3::ZERO, Float3::UP, Float3::UP, Float3::ZERO);
        let err = propagate(&Path::new(vec![Segment::straight(1)]), start).unwrap_err();
        assert!(matches!(err, TrackError::DegenerateFrame));
    }

    #[test]
    fn curve_sweeps_one_over_radius_per_unit() {
        let radius = 10;
        let (placements, end) = run(vec![Segment::curve(Turn::Left, radius, 5)]);

        let first = signed_angle_about(Float3::FORWARD, placements[0].frame().tangent, Float3::UP);
        assert_relative_eq!(first, 1.0 / radius as f32, epsilon = 1e-5);

        let sweep = signed_angle_about(Float3::FORWARD, end.tangent, Float3::UP);
        assert_relative_eq!(sweep, 5.0 / radius as f32, epsilon = 1e-5);
    }

    #[test]
    fn left_bends_toward_binormal_right_away_from_it() {
        let (left, _) = run(vec![Segment::curve(Turn::Left, 20, 4)]);
        let (right, _) = run(vec![Segment::curve(Turn::Right, 20, 4)]);
        assert!(left[3].position.x > 0.0);
        assert!(right[3].position.x < 0.0);
    }

    #[test]
    fn negative_radius_uses_magnitude() {
        let (a, _) = run(vec![Segment::curve(Turn::Right, 15, 6)]);
        let (b, _) = run(vec![Segment::curve(Turn::Right, -15, 6)]);
        assert_eq!(a, b);
    }

    #[test]
    fn curve_positions_stay_on_circle() {
        let radius = 12.0;
        let (placements, _) = run(vec![Segment::curve(Turn::Right, 12, 30)]);
        let center = Float3::new(-radius, 0.0, 0.0);
        for p in &placements {
            assert_relative_eq!((p.position - center).magnitude(), radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn full_circle_returns_to_start() {
        // About 2 * pi * r units close a circle of radius r.
        let radius = (64.0 / (2.0 * std::f32::consts::PI)).round() as i32;
        let steps = (2.0 * std::f32::consts::PI * radius as f32).round() as u32;
        let (_, end) = run(vec![Segment::curve(Turn::Left, radius, steps)]);
        assert!(end.position.magnitude() < 0.5);
        assert!(end.tangent.dot(Float3::FORWARD) > 0.99);
    }

    #[test]
    fn curve_joins_straight_without_a_seam() {
        let (placements, _) = run(vec![
            Segment::straight(4),
            Segment::curve(Turn::Left, 30, 3),
            Segment::straight(2),
        ]);
        assert_eq!(placements.len(), 9);

        // Chord of one unit of arc on radius 30.
        let chord = 2.0 * 30.0 * (1.0_f32 / 60.0).sin();
        assert_relative_eq!(
            (placements[4].position - placements[3].position).magnitude(),
            chord,
            epsilon = 1e-4
        );

        // The straight after the curve continues along the curve's exit tangent.
        let exit = placements[6].frame().tangent;
        let step = placements[7].position - placements[6].position;
        assert_vec_eq(step, exit, 1e-5);
    }

    #[test]
    fn cant_tilts_emitted_normal_but_is_not_carried() {
        let cant = 0.15_f32;
        let (placements, end) = run(vec![
            Segment::curve(Turn::Left, 25, 10).with_cant(cant),
            Segment::straight(2),
        ]);

        for p in &placements[..10] {
            let tilt = p.frame().normal.dot(Float3::UP).acos();
            assert_relative_eq!(tilt, cant.sin(), epsilon = 1e-4);
            assert!(p.frame().is_orthonormal(ORTHONORMAL_TOLERANCE));
        }
        for p in &placements[10..] {
            assert_vec_eq(p.frame().normal, Float3::UP, 1e-6);
        }
        assert_vec_eq(end.normal, Float3::UP, 1e-6);
    }

    #[test]
    fn propagation_is_deterministic() {
        let path = Path::new(vec![
            Segment::straight(7),
            Segment::curve(Turn::Right, 40, 25).with_cant(0.1),
            Segment::curve(Turn::Left, 15, 12),
            Segment::straight(3),
        ]);
        let a = propagate(&path, Frame::CANONICAL).unwrap();
        let b = propagate(&path, Frame::CANONICAL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn end_frame_chains_into_next_pass() {
        let first = Path::new(vec![Segment::straight(3), Segment::curve(Turn::Left, 9, 4)]);
        let second = Path::new(vec![Segment::curve(Turn::Right, 6, 5), Segment::straight(2)]);
        let joined: Path = first.iter().chain(second.iter()).copied().collect();

        let (mut chained, mid) = propagate(&first, Frame::CANONICAL).unwrap();
        let (tail, end) = propagate(&second, mid).unwrap();
        chained.extend(tail);

        let (whole, whole_end) = propagate(&joined, Frame::CANONICAL).unwrap();
        assert_eq!(chained.len(), whole.len());
        for (a, b) in chained.iter().zip(&whole) {
            assert_vec_eq(a.position, b.position, 1e-5);
        }
        assert_vec_eq(end.position, whole_end.position, 1e-5);
    }

    fn segment_strategy() -> impl Strategy<Value = Segment> {
        prop_oneof![
            (0u32..20).prop_map(Segment::straight),
            (any::<bool>(), 1i32..200, 0u32..40, -0.3f32..0.3).prop_map(
                |(left, radius, length, cant)| {
                    let turn = if left { Turn::Left } else { Turn::Right };
                    Segment::curve(turn, radius, length).with_cant(cant)
                }
            ),
        ]
    }

    fn mirrored(segment: Segment) -> Segment {
        match segment {
            Segment::Curve {
                turn,
                radius,
                length,
                cant,
                scale,
            } => Segment::Curve {
                turn: turn.mirrored(),
                radius,
                length,
                cant,
                scale,
            },
            straight => straight,
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-3 * (1.0 + a.abs().max(b.abs()))
    }

    proptest! {
        #[test]
        fn emits_one_orthonormal_placement_per_unit(
            segments in prop::collection::vec(segment_strategy(), 0..8)
        ) {
            let path = Path::new(segments);
            let (placements, end) = propagate(&path, Frame::CANONICAL).unwrap();

            prop_assert_eq!(placements.len(), path.total_length());
            for p in &placements {
                prop_assert!(p.frame().is_orthonormal(ORTHONORMAL_TOLERANCE));
                let r = p.transform.rotation;
                prop_assert!((r.c0.dot(r.c1.cross(r.c2)) - 1.0).abs() < 1e-4);
            }
            prop_assert!(end.is_orthonormal(ORTHONORMAL_TOLERANCE));
        }

        #[test]
        fn curve_sweep_matches_length_over_radius(
            left in any::<bool>(),
            radius in 20i32..500,
            length in 0u32..60,
        ) {
            let turn = if left { Turn::Left } else { Turn::Right };
            let (_, end) = propagate(
                &Path::new(vec![Segment::curve(turn, radius, length)]),
                Frame::CANONICAL,
            ).unwrap();

            // Sweeps stay below pi here, so the measured angle is unambiguous.
            let expected = turn.sign() * length as f32 / radius as f32;
            let measured = signed_angle_about(Float3::FORWARD, end.tangent, Float3::UP);
            prop_assert!((measured - expected).abs() < 1e-4, "{} vs {}", measured, expected);
        }

        #[test]
        fn left_and_right_are_mirror_images(
            segments in prop::collection::vec(segment_strategy(), 1..6)
        ) {
            let path = Path::new(segments.clone());
            let mirror: Path = segments.into_iter().map(mirrored).collect();

            let (a, _) = propagate(&path, Frame::CANONICAL).unwrap();
            let (b, _) = propagate(&mirror, Frame::CANONICAL).unwrap();

            prop_assert_eq!(a.len(), b.len());
            for (p, q) in a.iter().zip(&b) {
                prop_assert!(close(p.position.x, -q.position.x));
                prop_assert!(close(p.position.y, q.position.y));
                prop_assert!(close(p.position.z, q.position.z));
                prop_assert!(close(p.frame().normal.x, -q.frame().normal.x));
            }
        }
    }
}
