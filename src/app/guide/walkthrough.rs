use std::collections::BTreeSet;

use serde::Serialize;

use crate::app::models::UnlockStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum StepOutcome {
    Advanced(usize),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Position within one guide plus which steps the user marked done.
#[derive(Debug, Clone)]
pub struct GuideWalkthrough {
    steps: Vec<UnlockStep>,
    current: usize,
    completed: BTreeSet<usize>,
}

impl GuideWalkthrough {
    pub fn new(steps: Vec<UnlockStep>) -> Self {
        Self {
            steps,
            current: 0,
            completed: BTreeSet::new(),
        }
    }

    pub fn steps(&self) -> &[UnlockStep] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&UnlockStep> {
        self.steps.get(self.current)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.completed.len() == self.steps.len()
    }

    /// Marks the current step done and moves forward. Completing the last step
    /// stays on it and reports `Finished`.
    pub fn complete_current(&mut self) -> StepOutcome {
        if self.steps.is_empty() {
            return StepOutcome::Finished;
        }
        self.completed.insert(self.current);
        if self.current + 1 < self.steps.len() {
            self.current += 1;
            StepOutcome::Advanced(self.current)
        } else {
            StepOutcome::Finished
        }
    }

    pub fn go_back(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn jump_to(&mut self, index: usize) -> Option<&UnlockStep> {
        if index < self.steps.len() {
            self.current = index;
        }
        self.steps.get(index)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed.len(),
            total: self.steps.len(),
        }
    }
}
