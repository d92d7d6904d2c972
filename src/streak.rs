use crate::dates::yesterday_of;
use chrono::NaiveDate;

/// Consecutive-day logging counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streak {
    pub count: u32,
    pub last_log_date: Option<NaiveDate>,
}

impl Streak {
    pub fn new(count: u32, last_log_date: Option<NaiveDate>) -> Self {
        Self {
            count,
            last_log_date,
        }
    }

    /// Applies a new-entry log dated `log_date`. Only logs for `today` move
    /// the counter. Returns whether anything changed.
    pub fn record_log(&mut self, log_date: NaiveDate, today: NaiveDate) -> bool {
        if log_date != today || self.last_log_date == Some(today) {
            return false;
        }

        if self.last_log_date == Some(yesterday_of(today)) {
            self.count = self.count.saturating_add(1);
        } else {
            self.count = 1;
        }
        self.last_log_date = Some(today);
        true
    }

    /// Session-start check: a last log older than yesterday zeroes the
    /// counter. `last_log_date` is left as is.
    pub fn decay(&mut self, today: NaiveDate) -> bool {
        match self.last_log_date {
            Some(last) if last != today && last != yesterday_of(today) && self.count != 0 => {
                self.count = 0;
                true
            }
            _ => false,
        }
    }
}
