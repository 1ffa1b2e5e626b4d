//! "Today" provider for ages relative to the real current date

use jiff::Zoned;
use jiff::civil::Date;

pub trait Clock {
    fn today(&self) -> Date;
}

/// Local date of the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Zoned::now().date()
    }
}

/// Always returns the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
