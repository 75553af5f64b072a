// Math utilities for axis values

/// Readings with a magnitude at or below this are treated as "no input"
/// when choosing between several axis bindings.
pub const AXIS_EPSILON: f32 = 0.001;

/// Clamp a value to the normalized axis range [-1, 1]
pub fn clamp_axis(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

/// Zero out a value whose magnitude does not exceed the deadzone
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() <= deadzone {
        0.0
    } else {
        value
    }
}

/// Check whether an axis value counts as active input
pub fn is_active_axis(value: f32) -> bool {
    value.abs() > AXIS_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(0.5), 0.5);
        assert_eq!(clamp_axis(-5.0), -1.0);
        assert_eq!(clamp_axis(15.0), 1.0);
    }

    #[test]
    fn test_apply_deadzone() {
        assert_eq!(apply_deadzone(0.05, 0.1), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.1), 0.0);
        assert_eq!(apply_deadzone(0.5, 0.1), 0.5);
        assert_eq!(apply_deadzone(-0.5, 0.1), -0.5);
    }

    #[test]
    fn test_is_active_axis() {
        assert!(!is_active_axis(0.0));
        assert!(!is_active_axis(0.0005));
        assert!(is_active_axis(-0.01));
    }
}
