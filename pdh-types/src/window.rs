use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Returned when a window's start year lies after its end year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid window: start year {start} is after end year {end}")]
pub struct InvalidWindow {
    pub start: i32,
    pub end: i32,
}

/// A closed year interval `[start, end]` over which flows are aggregated.
///
/// Construction validates `start <= end`, so every `YearWindow` in the
/// system is well ordered. Serializes as the two-element array a range
/// slider reports, e.g. `[2010, 2050]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 2]", into = "[i32; 2]")]
pub struct YearWindow {
    start: i32,
    end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Result<Self, InvalidWindow> {
        if start > end {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// True if `year` lies inside the window, bounds included.
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl TryFrom<[i32; 2]> for YearWindow {
    type Error = InvalidWindow;

    fn try_from(pair: [i32; 2]) -> Result<Self, Self::Error> {
        YearWindow::new(pair[0], pair[1])
    }
}

impl From<YearWindow> for [i32; 2] {
    fn from(window: YearWindow) -> Self {
        [window.start, window.end]
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Range and step of the window selector control.
///
/// The core trusts callers to keep windows inside these bounds; the
/// selector (or the CLI standing in for it) uses [`WindowBounds::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowBounds {
    pub min_year: i32,
    pub max_year: i32,
    pub step: i32,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            min_year: 2010,
            max_year: 2050,
            step: 5,
        }
    }
}

impl WindowBounds {
    /// The widest selectable window, used as the initial selection.
    pub fn full(&self) -> Result<YearWindow, InvalidWindow> {
        YearWindow::new(self.min_year, self.max_year)
    }

    /// Clamp both ends of a raw selection into `[min_year, max_year]`.
    ///
    /// Ordering is left alone: a reversed pair stays reversed and is
    /// rejected later by [`YearWindow::new`].
    pub fn clamp(&self, pair: [i32; 2]) -> [i32; 2] {
        let lo = self.min_year.min(self.max_year);
        let hi = self.max_year.max(self.min_year);
        [pair[0].clamp(lo, hi), pair[1].clamp(lo, hi)]
    }

    /// Tick marks shown under the selector: every `step` years from
    /// `min_year`, with `max_year` always included.
    pub fn marks(&self) -> Vec<i32> {
        if self.min_year > self.max_year {
            return Vec::new();
        }
        if self.step <= 0 {
            return vec![self.min_year, self.max_year];
        }
        let mut marks: Vec<i32> = (self.min_year..=self.max_year)
            .step_by(self.step as usize)
            .collect();
        if marks.last() != Some(&self.max_year) {
            marks.push(self.max_year);
        }
        marks
    }
}
