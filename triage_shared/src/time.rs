//! Logical time of day used by every simulated event.
//!
//! A `SimTime` is an offset from midnight. Unlike a wall clock it never wraps:
//! an event scheduled after 23:59 is simply later than everything before it.

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(Duration);

impl SimTime {
    pub fn from_hm(hours: u64, minutes: u64) -> Self {
        Self(Duration::from_secs((hours * 60 + minutes) * 60))
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self(Duration::from_secs(minutes * 60))
    }

    /// Whole minutes since midnight.
    pub fn minutes(self) -> u64 {
        self.0.as_secs() / 60
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl From<NaiveTime> for SimTime {
    fn from(t: NaiveTime) -> Self {
        Self(Duration::from_secs(u64::from(t.num_seconds_from_midnight())))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.minutes();
        write!(f, "{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

impl Serialize for SimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
