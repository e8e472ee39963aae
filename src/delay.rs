use core::{fmt, str::FromStr, time::Duration};

use rand::Rng;

/// A pause drawn uniformly from `[min, max]` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jitter {
    pub min: u64,
    pub max: u64,
}

impl Jitter {
    pub const NONE: Self = Self::new(0, 0);

    pub const fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn sample(self) -> Duration {
        if self.min == self.max {
            return Duration::from_millis(self.min);
        }
        Duration::from_millis(rand::rng().random_range(self.min..=self.max))
    }

    pub async fn sleep(self) {
        let d = self.sample();
        if !d.is_zero() {
            tokio::time::sleep(d).await;
        }
    }
}

impl fmt::Display for Jitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for Jitter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |x: &str| {
            x.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid milliseconds {x:?}: {e}"))
        };
        match s.split_once('-') {
            Some((min, max)) => Ok(Self::new(parse(min)?, parse(max)?)),
            None => parse(s).map(|ms| Self::new(ms, ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranges() {
        assert_eq!("1000-3000".parse::<Jitter>(), Ok(Jitter::new(1000, 3000)));
        assert_eq!(" 5 - 2 ".parse::<Jitter>(), Ok(Jitter::new(2, 5)));
        assert_eq!("250".parse::<Jitter>(), Ok(Jitter::new(250, 250)));
        assert!("a-b".parse::<Jitter>().is_err());
        assert!("".parse::<Jitter>().is_err());
    }

    #[test]
    fn samples_stay_in_range() {
        let j = Jitter::new(500, 1200);
        for _ in 0..200 {
            let d = j.sample();
            assert!(d >= Duration::from_millis(500) && d <= Duration::from_millis(1200));
        }
        assert_eq!(Jitter::NONE.sample(), Duration::ZERO);
    }
}
