use std::fmt;

/// Seconds under which the remaining time is flagged as running low.
pub const RUNNING_LOW_SECS: u32 = 60;

/// What a single one-second tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Time remains after the tick.
    Running { remaining_secs: u32 },
    /// This tick brought the countdown to zero.
    Expired,
    /// The countdown was already at zero; nothing changed.
    Exhausted,
}

/// Remaining-time counter for an exam session.
///
/// Starts at the quiz duration, loses one second per tick and never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    total_secs: u32,
    remaining_secs: u32,
}

impl SessionClock {
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_secs(minutes.saturating_mul(60))
    }

    #[must_use]
    pub fn from_secs(secs: u32) -> Self {
        Self {
            total_secs: secs,
            remaining_secs: secs,
        }
    }

    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    #[must_use]
    pub fn is_running_low(&self) -> bool {
        self.remaining_secs < RUNNING_LOW_SECS
    }

    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining_secs {
            0 => CountdownTick::Exhausted,
            1 => {
                self.remaining_secs = 0;
                CountdownTick::Expired
            }
            n => {
                self.remaining_secs = n - 1;
                CountdownTick::Running {
                    remaining_secs: self.remaining_secs,
                }
            }
        }
    }
}

/// Formats the remaining time as `mm:ss`.
impl fmt::Display for SessionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_mm_ss(self.remaining_secs))
    }
}

/// Formats seconds as zero-padded `mm:ss`; minutes may exceed two digits.
#[must_use]
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
