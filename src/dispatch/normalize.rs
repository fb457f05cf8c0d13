/// Map a raw axis value onto [-1.0, 1.0] with deadzone suppression.
///
/// The raw range is interpreted directionally: `raw_min` maps to +1.0 and
/// `raw_max` to -1.0, so a profile inverts an axis simply by swapping the
/// bounds. Values whose normalized magnitude is within the deadzone collapse
/// to exactly 0.0; everything outside passes through unchanged (a hard
/// cutoff, not a remapped dead-band).
///
/// Profile validation guarantees `raw_min != raw_max`.
pub fn normalize(raw_min: i32, raw_max: i32, raw: i32, deadzone: f32) -> f32 {
    let t = (raw - raw_min) as f32 / (raw_max - raw_min) as f32;
    let normalized = 1.0 - 2.0 * t;
    if normalized.abs() <= deadzone {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(normalize(-32768, 32767, -32768, 0.05), 1.0);
        assert_eq!(normalize(-32768, 32767, 32767, 0.05), -1.0);
        assert_eq!(normalize(0, 255, 0, 0.05), 1.0);
        assert_eq!(normalize(0, 255, 255, 0.05), -1.0);
    }

    #[test]
    fn reversed_range_flips_polarity() {
        assert_eq!(normalize(32767, -32768, 32767, 0.05), 1.0);
        assert_eq!(normalize(32767, -32768, -32768, 0.05), -1.0);
    }

    #[test]
    fn output_stays_in_unit_range() {
        for raw in (-32768..=32767).step_by(997) {
            let value = normalize(-32768, 32767, raw, 0.0);
            assert!((-1.0..=1.0).contains(&value), "raw {raw} gave {value}");
        }
    }

    #[test]
    fn midpoint_falls_in_deadzone() {
        // Raw 0 on a symmetric-ish range normalizes to ~0 and snaps to exactly 0.0.
        assert_eq!(normalize(-32768, 32767, 0, 0.05), 0.0);
    }

    #[test]
    fn deadzone_is_a_hard_cutoff() {
        // Outside the deadzone the value passes through unrescaled
        // (exact because 384/1024 is a binary fraction).
        assert_eq!(normalize(-512, 512, -128, 0.05), 0.25);

        // Within the deadzone it snaps to zero, inclusive comparison.
        assert_eq!(normalize(-512, 512, -16, 0.05), 0.0);
    }

    #[test]
    fn hat_axes_normalize_from_tiny_ranges() {
        assert_eq!(normalize(-1, 1, -1, 0.05), 1.0);
        assert_eq!(normalize(-1, 1, 0, 0.05), 0.0);
        assert_eq!(normalize(-1, 1, 1, 0.05), -1.0);
    }
}
