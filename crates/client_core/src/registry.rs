use std::sync::Arc;

use shared::domain::Direction;
use tracing::{info, warn};

use crate::{
    feedback::{ControllerEvent, FeedbackPresenter},
    media::MediaTarget,
};

pub const VIDEO_SELECTED_FEEDBACK: &str = "Video Selected";

/// The videos discovered at startup plus the one receiving commands.
///
/// The target list is fixed at construction. The highlight flag on each target
/// mirrors `active`: exactly the active target is highlighted.
pub struct TargetRegistry {
    targets: Vec<Arc<dyn MediaTarget>>,
    active: Option<usize>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<Arc<dyn MediaTarget>>) -> Self {
        for target in &targets {
            target.set_highlighted(false);
        }
        Self {
            targets,
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[Arc<dyn MediaTarget>] {
        &self.targets
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn MediaTarget>> {
        self.targets.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Arc<dyn MediaTarget>> {
        self.active.and_then(|index| self.targets.get(index))
    }

    pub fn index_of(&self, target: &Arc<dyn MediaTarget>) -> Option<usize> {
        self.targets
            .iter()
            .position(|candidate| Arc::ptr_eq(candidate, target))
    }

    /// Makes `index` the active target. Returns false for an index outside the
    /// registry, which leaves the selection untouched.
    pub fn select(&mut self, index: usize, presenter: &FeedbackPresenter) -> bool {
        let Some(selected) = self.targets.get(index).cloned() else {
            warn!(index, len = self.targets.len(), "select: index outside registry");
            return false;
        };

        for (position, target) in self.targets.iter().enumerate() {
            target.set_highlighted(position == index);
        }
        self.active = Some(index);

        let label = selected.label();
        info!(index, source = %label, "active video set");
        presenter.command_feedback(selected.as_ref(), VIDEO_SELECTED_FEEDBACK);
        presenter.emit(ControllerEvent::TargetSelected { index, label });
        true
    }

    /// Cycles the active target. With nothing active, `Next` lands on the first
    /// target and `Previous` on the last. Registries of one or zero targets are
    /// left alone.
    pub fn switch_active(
        &mut self,
        direction: Direction,
        presenter: &FeedbackPresenter,
    ) -> Option<usize> {
        let count = self.targets.len();
        if count <= 1 {
            return None;
        }

        let index = match (self.active, direction) {
            (Some(current), Direction::Next) => (current + 1) % count,
            (Some(current), Direction::Previous) => (current + count - 1) % count,
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => count - 1,
        };

        self.select(index, presenter).then_some(index)
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
