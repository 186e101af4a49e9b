use proptest::prelude::*;

/// Property-based suite for component-level invariants.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blink::{eye_aspect_ratio, BlinkDetector};
    use crate::gaze::GazeTracker;
    use crate::landmarks::{indices, LandmarkFrame};

    fn eye_frame(points: [(u32, f32, f32); 8]) -> LandmarkFrame {
        let mut frame = LandmarkFrame::new(640, 480);
        frame.face_detected = true;
        for (idx, x, y) in points {
            frame.points.insert(idx, [x, y]);
        }
        frame
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn test_ear_is_finite_and_non_negative(
            top in 0.0f32..1.0, bottom in 0.0f32..1.0,
            outer in 0.0f32..1.0, inner in 0.0f32..1.0,
        ) {
            let frame = eye_frame([
                (indices::LEFT_EYE_TOP, 0.4, top),
                (indices::LEFT_EYE_BOTTOM, 0.4, bottom),
                (indices::LEFT_EYE_OUTER, outer, 0.4),
                (indices::LEFT_EYE_INNER, inner, 0.4),
                (indices::RIGHT_EYE_TOP, 0.6, 0.38),
                (indices::RIGHT_EYE_BOTTOM, 0.6, 0.42),
                (indices::RIGHT_EYE_OUTER, 0.55, 0.4),
                (indices::RIGHT_EYE_INNER, 0.65, 0.4),
            ]);
            let ratio = eye_aspect_ratio(
                &frame,
                indices::LEFT_EYE_TOP,
                indices::LEFT_EYE_BOTTOM,
                indices::LEFT_EYE_OUTER,
                indices::LEFT_EYE_INNER,
            );
            prop_assert!(ratio.is_finite());
            prop_assert!(ratio >= 0.0);
            // Coincident corners must read exactly 0, not NaN.
            if (outer - inner).abs() == 0.0 {
                prop_assert_eq!(ratio, 0.0);
            }
        }

        #[test]
        fn test_blink_counters_monotone_under_random_lids(
            lids in proptest::collection::vec((0.0f32..0.1, 0.0f32..0.1), 1..200)
        ) {
            let mut detector = BlinkDetector::new();
            let mut last_count = 0u32;
            let mut last_sleeps = 0u32;
            let mut ts = 0i64;

            for (left_gap, right_gap) in lids {
                let frame = eye_frame([
                    (indices::LEFT_EYE_TOP, 0.4, 0.4 - left_gap / 2.0),
                    (indices::LEFT_EYE_BOTTOM, 0.4, 0.4 + left_gap / 2.0),
                    (indices::LEFT_EYE_OUTER, 0.35, 0.4),
                    (indices::LEFT_EYE_INNER, 0.45, 0.4),
                    (indices::RIGHT_EYE_TOP, 0.6, 0.4 - right_gap / 2.0),
                    (indices::RIGHT_EYE_BOTTOM, 0.6, 0.4 + right_gap / 2.0),
                    (indices::RIGHT_EYE_OUTER, 0.55, 0.4),
                    (indices::RIGHT_EYE_INNER, 0.65, 0.4),
                ]);
                let state = detector.update(&frame, ts);
                ts += 33_333;

                prop_assert!(state.blink_count >= last_count);
                prop_assert!(state.micro_sleep_count >= last_sleeps);
                prop_assert!(state.rate_per_minute >= 0.0);
                last_count = state.blink_count;
                last_sleeps = state.micro_sleep_count;
            }
        }

        #[test]
        fn test_attention_ratio_bounded_for_any_gaze(
            offsets in proptest::collection::vec((-2.0f32..2.0, -2.0f32..2.0), 1..300),
            blinking in any::<bool>(),
        ) {
            let mut tracker = GazeTracker::new();
            let mut ts = 0i64;
            for (x_off, y_off) in offsets {
                let mut frame = eye_frame([
                    (indices::LEFT_EYE_TOP, 0.4, 0.38),
                    (indices::LEFT_EYE_BOTTOM, 0.4, 0.42),
                    (indices::LEFT_EYE_OUTER, 0.35, 0.4),
                    (indices::LEFT_EYE_INNER, 0.45, 0.4),
                    (indices::RIGHT_EYE_TOP, 0.6, 0.38),
                    (indices::RIGHT_EYE_BOTTOM, 0.6, 0.42),
                    (indices::RIGHT_EYE_OUTER, 0.55, 0.4),
                    (indices::RIGHT_EYE_INNER, 0.65, 0.4),
                ]);
                frame
                    .points
                    .insert(indices::LEFT_IRIS_CENTER, [0.40 + x_off * 0.05, 0.40 + y_off * 0.02]);
                frame
                    .points
                    .insert(indices::RIGHT_IRIS_CENTER, [0.60 + x_off * 0.05, 0.40 + y_off * 0.02]);

                let m = tracker.update(&frame, ts, blinking, false);
                ts += 33_333;
                prop_assert!((0.0..=1.0).contains(&m.screen_attention_ratio));
                prop_assert!(m.gaze.x.is_finite());
                prop_assert!(m.gaze.y.is_finite());
            }
        }
    }
}
