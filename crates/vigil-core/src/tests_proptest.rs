use proptest::prelude::*;

/// Property-based suite for pipeline invariants under arbitrary input.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonitorSession;
    use vigil_signals::landmarks::indices;
    use vigil_signals::LandmarkFrame;

    const ALL_INDICES: [u32; 13] = [
        indices::LEFT_EYE_OUTER,
        indices::LEFT_EYE_INNER,
        indices::LEFT_EYE_TOP,
        indices::LEFT_EYE_BOTTOM,
        indices::RIGHT_EYE_OUTER,
        indices::RIGHT_EYE_INNER,
        indices::RIGHT_EYE_TOP,
        indices::RIGHT_EYE_BOTTOM,
        indices::LEFT_IRIS_CENTER,
        indices::RIGHT_IRIS_CENTER,
        indices::NOSE_TIP,
        indices::LEFT_MOUTH_CORNER,
        indices::RIGHT_MOUTH_CORNER,
    ];

    /// A frame with every landmark at an arbitrary position, or no face.
    fn arb_frame() -> impl Strategy<Value = LandmarkFrame> {
        (
            any::<bool>(),
            proptest::collection::vec((0.0f32..1.0, 0.0f32..1.0), ALL_INDICES.len()),
        )
            .prop_map(|(face_detected, coords)| {
                let mut frame = LandmarkFrame::new(640, 480);
                frame.face_detected = face_detected;
                if face_detected {
                    for (idx, (x, y)) in ALL_INDICES.iter().zip(coords) {
                        frame.points.insert(*idx, [x, y]);
                    }
                }
                frame
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_counters_monotone_and_scores_bounded(
            frames in proptest::collection::vec(arb_frame(), 1..120)
        ) {
            let mut session = MonitorSession::new();
            let mut last_blinks = 0u32;
            let mut last_micro_sleeps = 0u32;
            let mut ts = 0i64;

            for frame in &frames {
                let snap = session.process_frame(frame, ts);
                ts += 33_333;

                prop_assert!(snap.blink.blink_count >= last_blinks);
                prop_assert!(snap.blink.micro_sleep_count >= last_micro_sleeps);
                last_blinks = snap.blink.blink_count;
                last_micro_sleeps = snap.blink.micro_sleep_count;

                prop_assert!((0.0..=1.0).contains(&snap.gaze.screen_attention_ratio));
                prop_assert!((0.0..=100.0).contains(&snap.derived.attention_score));
                prop_assert!((0.0..=100.0).contains(&snap.derived.stress_score));

                prop_assert!(snap.blink.left_ratio >= 0.0);
                prop_assert!(snap.blink.left_ratio.is_finite());
                prop_assert!(snap.blink.right_ratio >= 0.0);
                prop_assert!(snap.blink.right_ratio.is_finite());
            }
        }

        #[test]
        fn test_calibration_never_panics_on_arbitrary_frames(
            frames in proptest::collection::vec(arb_frame(), 1..90),
            countdown_frames in 1usize..60
        ) {
            let mut session = MonitorSession::new();
            session.start_calibration(0);
            let mut ts = 0i64;
            for (i, frame) in frames.iter().enumerate() {
                let snap = session.process_frame(frame, ts);
                ts += 33_333;
                prop_assert!(snap.derived.attention_score.is_finite());
                if i == countdown_frames {
                    // Restart mid-collection must also be safe.
                    session.start_calibration(ts);
                }
            }
        }
    }
}
