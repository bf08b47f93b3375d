use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Default for Random {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Random {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = ordered(min, max);
        self.rng.gen_range(low..=high)
    }

    // NaN bounds defer to the other bound and infinities saturate to the finite extremes.
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        let (min, max) = match (min.is_nan(), max.is_nan()) {
            (true, true) => return 0.0,
            (true, false) => return saturate(max),
            (false, true) => return saturate(min),
            (false, false) => (saturate(min), saturate(max)),
        };
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        if low == high {
            return low;
        }
        let t: f32 = self.rng.gen();
        let span = high - low;
        let value = if span.is_finite() {
            low + span * t
        } else {
            low * (1.0 - t) + high * t
        };
        value.clamp(low, high)
    }

    pub fn one_in(&mut self, chance: i32) -> bool {
        if chance <= 0 {
            return false;
        }
        self.random_int(1, chance) == 1
    }

    pub fn roll_dice(&mut self, number: i32, sides: i32) -> i32 {
        if number <= 0 || sides <= 0 {
            return 0;
        }
        (0..number).map(|_| self.random_int(1, sides)).sum()
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn saturate(value: f32) -> f32 {
    value.clamp(f32::MIN, f32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_range_returns_the_bound() {
        let mut random = Random::from_seed(7);
        for _ in 0..100 {
            assert_eq!(random.random_int(5, 5), 5);
            assert_eq!(random.random_float(2.5, 2.5), 2.5);
        }
    }

    #[test]
    fn random_int_stays_within_inclusive_bounds() {
        let mut random = Random::from_seed(11);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2_000 {
            let value = random.random_int(-3, 3);
            assert!((-3..=3).contains(&value));
            seen_min |= value == -3;
            seen_max |= value == 3;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let mut random = Random::from_seed(3);
        for _ in 0..500 {
            assert!((1..=6).contains(&random.random_int(6, 1)));
            let value = random.random_float(1.0, -1.0);
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut a = Random::from_seed(42);
        let mut b = Random::from_seed(42);
        let first: Vec<i32> = (0..16).map(|_| a.random_int(0, 1000)).collect();
        let second: Vec<i32> = (0..16).map(|_| b.random_int(0, 1000)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn one_in_edge_cases() {
        let mut random = Random::from_seed(5);
        for _ in 0..100 {
            assert!(random.one_in(1));
            assert!(!random.one_in(0));
            assert!(!random.one_in(-4));
        }
    }

    #[test]
    fn roll_dice_sum_is_bounded() {
        let mut random = Random::from_seed(9);
        for _ in 0..500 {
            let total = random.roll_dice(3, 6);
            assert!((3..=18).contains(&total));
        }
        assert_eq!(random.roll_dice(0, 6), 0);
        assert_eq!(random.roll_dice(2, 0), 0);
        assert_eq!(random.roll_dice(4, 1), 4);
    }

    #[test]
    fn random_float_spans_the_full_f32_range() {
        let mut random = Random::from_seed(13);
        let mut seen_negative = false;
        let mut seen_positive = false;
        for _ in 0..1_000 {
            let value = random.random_float(f32::MIN, f32::MAX);
            assert!(value.is_finite());
            seen_negative |= value < 0.0;
            seen_positive |= value > 0.0;
        }
        assert!(seen_negative && seen_positive);
    }

    #[test]
    fn non_finite_float_bounds_are_tamed() {
        let mut random = Random::from_seed(17);
        for _ in 0..200 {
            let value = random.random_float(f32::NEG_INFINITY, f32::INFINITY);
            assert!(value.is_finite());
            let value = random.random_float(0.0, f32::INFINITY);
            assert!((0.0..=f32::MAX).contains(&value));
        }
        assert_eq!(random.random_float(f32::NAN, 4.0), 4.0);
        assert_eq!(random.random_float(-2.0, f32::NAN), -2.0);
        assert_eq!(random.random_float(f32::NAN, f32::NAN), 0.0);
        assert_eq!(random.random_float(f32::INFINITY, f32::INFINITY), f32::MAX);
    }
}
