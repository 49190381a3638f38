//! Bounds and clamping rules for every record field.
//!
//! All functions are pure and total: numeric inputs are taken as `i64` so
//! callers can pass anything a file or a caller could produce without a
//! lossy conversion first.

/// Largest accepted value for the x parameter.
pub const MAX_X: i16 = 1023;
/// Largest accepted value for the y parameter.
pub const MAX_Y: i16 = 1023;
/// Largest accepted value for each misc parameter.
pub const MAX_MISC: i32 = 65535;
/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 1023;
/// Number of misc parameters.
pub const MISC_LEN: usize = 4;
/// Number of switch parameters.
pub const SWITCH_LEN: usize = 8;

pub fn valid_x(x: i64) -> bool {
    in_range(x, i64::from(MAX_X))
}

/// Clamps `x` into `[0, MAX_X]`.
pub fn clamp_x(x: i64) -> i16 {
    // Bounded by MAX_X, so the narrowing cast is lossless.
    x.clamp(0, i64::from(MAX_X)) as i16
}

pub fn valid_y(y: i64) -> bool {
    in_range(y, i64::from(MAX_Y))
}

/// Clamps `y` into `[0, MAX_Y]`.
pub fn clamp_y(y: i64) -> i16 {
    y.clamp(0, i64::from(MAX_Y)) as i16
}

pub fn valid_misc(misc: i64) -> bool {
    in_range(misc, i64::from(MAX_MISC))
}

/// Clamps a misc value into `[0, MAX_MISC]`.
pub fn clamp_misc(misc: i64) -> i32 {
    misc.clamp(0, i64::from(MAX_MISC)) as i32
}

/// A name is valid when present and at most `MAX_NAME_LENGTH` characters long.
pub fn valid_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.chars().count() <= MAX_NAME_LENGTH)
}

/// Maps an absent name to `""` and truncates long names to `MAX_NAME_LENGTH` characters.
pub fn clamp_name(name: Option<&str>) -> String {
    match name {
        None => String::new(),
        Some(n) => n.chars().take(MAX_NAME_LENGTH).collect(),
    }
}

pub fn valid_misc_index(index: usize) -> bool {
    index < MISC_LEN
}

pub fn valid_switch_index(index: usize) -> bool {
    index < SWITCH_LEN
}

fn in_range(value: i64, max: i64) -> bool {
    (0..=max).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn x_and_y_bounds() {
        assert!(valid_x(0));
        assert!(valid_x(1023));
        assert!(!valid_x(-1));
        assert!(!valid_x(1024));
        assert!(valid_y(512));
        assert!(!valid_y(550_000));
    }

    #[test]
    fn clamp_numeric_to_nearest_bound() {
        assert_eq!(clamp_x(-5), 0);
        assert_eq!(clamp_x(2000), MAX_X);
        assert_eq!(clamp_y(1), 1);
        assert_eq!(clamp_y(550_000), MAX_Y);
        assert_eq!(clamp_misc(-1), 0);
        assert_eq!(clamp_misc(65_536), MAX_MISC);
        assert_eq!(clamp_misc(i64::MAX), MAX_MISC);
    }

    #[test]
    fn absent_name_is_invalid_and_clamps_to_empty() {
        assert!(!valid_name(None));
        assert!(valid_name(Some("")));
        assert_eq!(clamp_name(None), "");
        assert_eq!(clamp_name(Some("")), "");
    }

    #[test]
    fn long_name_is_truncated_by_characters() {
        let exact = "a".repeat(MAX_NAME_LENGTH);
        assert!(valid_name(Some(&exact)));

        let long = "é".repeat(MAX_NAME_LENGTH + 1);
        assert!(!valid_name(Some(&long)));
        let clamped = clamp_name(Some(&long));
        assert_eq!(clamped.chars().count(), MAX_NAME_LENGTH);
        assert!(valid_name(Some(&clamped)));
    }

    #[test]
    fn index_predicates() {
        assert!(valid_misc_index(0));
        assert!(valid_misc_index(3));
        assert!(!valid_misc_index(4));
        assert!(valid_switch_index(7));
        assert!(!valid_switch_index(8));
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent_and_valid(v in any::<i64>()) {
            let x = clamp_x(v);
            prop_assert_eq!(clamp_x(i64::from(x)), x);
            prop_assert!(valid_x(i64::from(x)));

            let y = clamp_y(v);
            prop_assert_eq!(clamp_y(i64::from(y)), y);
            prop_assert!(valid_y(i64::from(y)));

            let m = clamp_misc(v);
            prop_assert_eq!(clamp_misc(i64::from(m)), m);
            prop_assert!(valid_misc(i64::from(m)));
        }

        #[test]
        fn name_clamp_is_idempotent_and_valid(name in ".{0,1100}") {
            let once = clamp_name(Some(&name));
            prop_assert_eq!(clamp_name(Some(&once)), once.clone());
            prop_assert!(valid_name(Some(&once)));
        }
    }
}
