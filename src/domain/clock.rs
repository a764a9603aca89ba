//! Time source for task timestamps

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::timestamp::{self, TimestampError};

/// Source of "now" for task timestamps
///
/// Implementations return millisecond-precision instants so that stored
/// timestamps compare equal after a save/load cycle.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        timestamp::truncate(Utc::now())
    }
}

/// A clock that stays where it is put
#[derive(Debug)]
pub struct FixedClock {
    instant: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Cell::new(timestamp::truncate(instant)),
        }
    }

    /// Creates a clock from a stored-format timestamp
    pub fn at(stamp: &str) -> Result<Self, TimestampError> {
        timestamp::parse(stamp).map(Self::new)
    }

    /// Moves the clock to another instant
    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(timestamp::truncate(instant));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
