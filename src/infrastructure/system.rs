//! Production clock and randomness

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::application::ports::outbound::{ClockPort, RandomPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomPort for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom;
        for _ in 0..1000 {
            let sample = random.sample();
            assert!((0.0..1.0).contains(&sample));
            assert!(random.pick(3) < 3);
        }
        assert_eq!(random.pick(1), 0);
    }
}
