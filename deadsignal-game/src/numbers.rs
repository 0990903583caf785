//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f32 and clamp it to the u32 range, returning 0 for NaN or negative values.
#[must_use]
pub fn round_f32_to_u32(value: f32) -> u32 {
    to_u32(f64::from(value).round())
}

/// Floor a f32 and clamp it to the u32 range.
#[must_use]
pub fn floor_f32_to_u32(value: f32) -> u32 {
    to_u32(f64::from(value).floor())
}

/// Ceil a f32 and clamp it to the u32 range.
#[must_use]
pub fn ceil_f32_to_u32(value: f32) -> u32 {
    to_u32(f64::from(value).ceil())
}

/// Floor a f32 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn floor_f32_to_i32(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = f64::from(value).floor().clamp(min, max);
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Convert u32 to f32 while allowing precision loss in a single location.
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    cast::<u32, f32>(value).unwrap_or(0.0)
}

/// Convert a non-negative i32 to u32, saturating negatives at zero.
#[must_use]
pub fn i32_to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.clamp(0.0, max)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_saturate_at_zero() {
        assert_eq!(round_f32_to_u32(1.5), 2);
        assert_eq!(round_f32_to_u32(-3.2), 0);
        assert_eq!(round_f32_to_u32(f32::NAN), 0);
        assert_eq!(floor_f32_to_u32(2.99), 2);
        assert_eq!(ceil_f32_to_u32(9.8), 10);
        assert_eq!(ceil_f32_to_u32(14.0), 14);
    }

    #[test]
    fn signed_helpers_cover_edges() {
        assert_eq!(floor_f32_to_i32(-0.5), -1);
        assert_eq!(floor_f32_to_i32(f32::NAN), 0);
        assert_eq!(i32_to_u32(-4), 0);
        assert_eq!(i32_to_u32(7), 7);
        assert!((u32_to_f32(12) - 12.0).abs() < f32::EPSILON);
    }
}
