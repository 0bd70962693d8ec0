/*
timer.rs

Copyright 2025 Hervé Quatremain

This file is part of Jigtile.

Jigtile is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Jigtile is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Jigtile. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Count the seconds spent on the puzzle.
//!
//! The host calls [`SessionTimer::tick`] once per second. The timer ignores the ticks once it is
//! stopped, so a tick that was already scheduled when the puzzle got solved has no effect.

/// Elapsed time counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTimer {
    /// Number of ticks received while running.
    elapsed_seconds: u64,

    /// Whether the ticks are counted.
    running: bool,
}

impl SessionTimer {
    /// Create a stopped [`SessionTimer`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter and start counting.
    pub fn start(&mut self) {
        self.elapsed_seconds = 0;
        self.running = true;
    }

    /// Count one second, if running.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_seconds += 1;
        }
    }

    /// Freeze the counter.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Return the elapsed time in hours, minutes, and seconds.
    pub fn hms(&self) -> (u64, u64, u64) {
        let duration: u64 = self.elapsed_seconds;
        (
            duration / 3600,
            (duration % 3600) / 60,
            (duration % 3600) % 60,
        )
    }

    /// Return the elapsed time as `MM:SS`, or `HH:MM:SS` after an hour.
    pub fn format_clock(&self) -> String {
        let (hour, minute, second) = self.hms();
        if hour > 0 {
            format!("{hour:02}:{minute:02}:{second:02}")
        } else {
            format!("{minute:02}:{second:02}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_while_running() {
        let mut timer = SessionTimer::new();
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 0);

        timer.start();
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.elapsed_seconds(), 5);
        assert!(timer.is_running());
    }

    #[test]
    fn stop_freezes_the_counter() {
        let mut timer = SessionTimer::new();
        timer.start();
        for _ in 0..5 {
            timer.tick();
        }
        timer.stop();
        timer.tick();
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 5);
        assert!(!timer.is_running());

        timer.start();
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn clock_format() {
        let mut timer = SessionTimer::new();
        timer.start();
        for _ in 0..75 {
            timer.tick();
        }
        assert_eq!(timer.format_clock(), "01:15");
        for _ in 0..3600 {
            timer.tick();
        }
        assert_eq!(timer.hms(), (1, 1, 15));
        assert_eq!(timer.format_clock(), "01:01:15");
    }
}
