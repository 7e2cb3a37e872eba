use std::sync::{Arc, Mutex};

/// Share of the progress budget spent on adding entries
pub const STAGING_BUDGET: f32 = 50.0;
/// Checkpoint reported right before the container is serialized
pub const SERIALIZE_CHECKPOINT: f32 = 75.0;
/// Checkpoint reported once the blob exists
pub const DONE_CHECKPOINT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    #[default]
    Idle,
    Building,
}

/// Progress after `completed` of `total` entries have been added
pub fn entry_checkpoint(completed: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    completed as f32 / total as f32 * STAGING_BUDGET
}

/// Observes builder state and percent changes
pub trait ProgressObserver {
    fn on_progress(&mut self, state: BuildState, percent: f32);
}

impl<F> ProgressObserver for F
where
    F: FnMut(BuildState, f32),
{
    fn on_progress(&mut self, state: BuildState, percent: f32) {
        self(state, percent)
    }
}

/// Records every progress update. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    events: Arc<Mutex<Vec<(BuildState, f32)>>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(BuildState, f32)> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn percents(&self) -> Vec<f32> {
        self.events().into_iter().map(|(_, p)| p).collect()
    }
}

impl ProgressObserver for ProgressLog {
    fn on_progress(&mut self, state: BuildState, percent: f32) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((state, percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_checkpoints() {
        assert_eq!(entry_checkpoint(1, 4), 12.5);
        assert_eq!(entry_checkpoint(2, 4), 25.0);
        assert_eq!(entry_checkpoint(4, 4), 50.0);
        assert_eq!(entry_checkpoint(1, 1), 50.0);
        assert_eq!(entry_checkpoint(0, 0), 0.0);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |state: BuildState, percent: f32| seen.push((state, percent));
            observer.on_progress(BuildState::Building, 75.0);
        }
        assert_eq!(seen, vec![(BuildState::Building, 75.0)]);
    }
}
