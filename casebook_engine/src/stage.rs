//! Stage -- the five-phase time-of-day cycle.
//!
//! Surrounding systems gate item availability and NPC presence on the current
//! stage; the clue core itself never reads it. One shared enum replaces the
//! bare stage index so every consumer names phases the same way.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One phase of the in-game day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    #[default]
    Morning,
    Midday,
    Afternoon,
    Evening,
    Night,
}

impl Stage {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Stage::Morning => 0,
            Stage::Midday => 1,
            Stage::Afternoon => 2,
            Stage::Evening => 3,
            Stage::Night => 4,
        }
    }

    /// Look up a stage by index; `None` when out of range.
    pub fn from_index(index: usize) -> Option<Stage> {
        match index {
            0 => Some(Stage::Morning),
            1 => Some(Stage::Midday),
            2 => Some(Stage::Afternoon),
            3 => Some(Stage::Evening),
            4 => Some(Stage::Night),
            _ => None,
        }
    }

    /// The following stage; night wraps back to morning.
    pub fn next(self) -> Stage {
        match self {
            Stage::Morning => Stage::Midday,
            Stage::Midday => Stage::Afternoon,
            Stage::Afternoon => Stage::Evening,
            Stage::Evening => Stage::Night,
            Stage::Night => Stage::Morning,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Morning => write!(f, "morning"),
            Stage::Midday => write!(f, "midday"),
            Stage::Afternoon => write!(f, "afternoon"),
            Stage::Evening => write!(f, "evening"),
            Stage::Night => write!(f, "night"),
        }
    }
}

/// Frame-driven clock that advances the stage at a fixed interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageClock {
    pub current: Stage,
    pub interval_frames: u64,
    pub auto_advance: bool,
    elapsed: u64,
}

impl StageClock {
    pub fn new(interval_frames: u64) -> StageClock {
        StageClock {
            current: Stage::default(),
            interval_frames,
            auto_advance: true,
            elapsed: 0,
        }
    }

    /// Advance the clock by one frame.
    ///
    /// Returns `Some(stage)` when the interval elapsed and the stage rolled
    /// over, `None` otherwise. An interval of zero disables auto-advance.
    pub fn tick(&mut self) -> Option<Stage> {
        if !self.auto_advance || self.interval_frames == 0 {
            return None;
        }
        self.elapsed += 1;
        if self.elapsed < self.interval_frames {
            return None;
        }
        self.elapsed = 0;
        self.current = self.current.next();
        info!("stage advanced to {}", self.current);
        Some(self.current)
    }

    /// Jump directly to a stage, resetting the interval timer.
    pub fn set_stage(&mut self, stage: Stage) {
        self.current = stage;
        self.elapsed = 0;
        info!("stage set to {stage}");
    }
}

impl Default for StageClock {
    fn default() -> StageClock {
        StageClock::new(0)
    }
}
