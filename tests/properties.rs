use phosphor_dsp::routing::FilterMorpher;
use phosphor_dsp::scope::{sample_ring, TriggerDetector, TriggerMarker};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #[test]
    fn ring_returns_last_writes_in_order(
        capacity_pow in 4u32..10,
        extra in 0usize..3_000,
    ) {
        let capacity = 1usize << capacity_pow;
        let (mut writer, reader) = sample_ring(capacity);
        let total = extra + 1;
        for i in 0..total {
            writer.write(i as f32, -(i as f32));
        }

        let keep = total.min(capacity);
        let frames = reader.read_last(keep);
        prop_assert_eq!(frames.len(), keep);
        for (n, frame) in frames.iter().enumerate() {
            let expected = (total - keep + n) as f32;
            prop_assert_eq!(frame.left, expected);
            prop_assert_eq!(frame.right, -expected);
        }
    }

    #[test]
    fn morph_weights_sum_to_one(
        angle in 0.0f32..std::f32::consts::TAU,
        radius in 0.0f32..=1.0,
        split in -180.0f32..=180.0,
    ) {
        let mut morpher = FilterMorpher::new();
        morpher.set_position(radius * angle.cos(), radius * angle.sin());
        morpher.set_split_angle(split);
        prop_assert!((morpher.weights().sum() - 1.0).abs() < 1e-3);
        prop_assert!((morpher.weights_y().sum() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn trigger_count_tracks_square_period(
        period in 1_100usize..4_000,
        threshold in -0.75f32..0.75,
    ) {
        let marker = Arc::new(TriggerMarker::new());
        let mut trigger = TriggerDetector::new(1_024, Arc::clone(&marker));
        trigger.set_threshold(threshold);

        let periods = 20;
        let mut accepted = 0i64;
        for n in 0..period * periods {
            let sample = if n % period < period / 2 { 0.8 } else { -0.8 };
            if trigger.process(sample, n + 1) {
                accepted += 1;
            }
        }
        prop_assert!((accepted - periods as i64).abs() <= 1, "accepted {}", accepted);
        prop_assert_eq!(marker.count(), accepted as u64);
    }
}
