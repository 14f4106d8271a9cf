//! Level progression driven by the external correct-answer counter.

use bug_battle_core::Difficulty;

/// Tracks the current level and progress toward the next one.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LevelProgression {
    level: u8,
    correct_answers: u32,
}

impl LevelProgression {
    pub(crate) const fn new() -> Self {
        Self {
            level: 1,
            correct_answers: 0,
        }
    }

    pub(crate) const fn level(&self) -> u8 {
        self.level
    }

    pub(crate) fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.level)
    }

    /// Records one correct answer, returning the new level when it changes.
    ///
    /// The counter always resets once the threshold is reached; the level
    /// itself saturates at [`Difficulty::MAX_LEVEL`] and never decreases.
    pub(crate) fn record_correct(&mut self, threshold: u32) -> Option<u8> {
        self.correct_answers += 1;
        if self.correct_answers < threshold.max(1) {
            return None;
        }
        self.correct_answers = 0;
        if self.level >= Difficulty::MAX_LEVEL {
            return None;
        }
        self.level += 1;
        Some(self.level)
    }
}
