use crate::domain::{MAX_YEAR, MIN_YEAR};

pub const RATE_STEP: f64 = 5.0;
pub const RATE_FINE_STEP: f64 = 1.0;
pub const YEAR_PAGE_STEP: i32 = 10;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Year slider bounds: 1960..=2050.
pub fn step_year(year: i32, delta: i32) -> i32 {
    year.saturating_add(delta).clamp(MIN_YEAR, MAX_YEAR)
}

/// EV adoption slider bounds: 0..=100 percent.
pub fn step_rate(rate: f64, delta: f64) -> f64 {
    (rate + delta).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliders_clamp_at_their_bounds() {
        assert_eq!(step_year(2049, YEAR_PAGE_STEP), 2050);
        assert_eq!(step_year(1961, -YEAR_PAGE_STEP), 1960);
        assert_eq!(step_year(2019, 1), 2020);
        assert!((step_rate(98.0, RATE_STEP) - 100.0).abs() < f64::EPSILON);
        assert!(step_rate(3.0, -RATE_STEP).abs() < f64::EPSILON);
    }

    #[test]
    fn wrapping_indices() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
    }
}
