//! Keyboard path: arrow keys walk the hover target over the drop slots and the
//! gesture finishes through the same [`DragController::release`] as a pointer.

use serde::{Deserialize, Serialize};

use crate::curriculum::CurriculumTree;
use crate::drag::controller::{DragController, DragSource, DropTarget};
use crate::drag::error::DragResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Every position the source could be released on, top to bottom.
///
/// A section drag sees the sections. A lecture drag sees each lecture position
/// plus the container of every section other than its own, placed after that
/// section's lectures.
pub fn drop_slots(tree: &CurriculumTree, source: DragSource) -> Vec<DropTarget> {
    match source {
        DragSource::Section(_) => tree
            .sections()
            .iter()
            .map(|s| DropTarget::Section(s.id()))
            .collect(),
        DragSource::Lecture(id) => {
            let origin = tree.locate_lecture(id).map(|(si, _)| si);
            let mut slots = Vec::with_capacity(tree.lecture_count() + tree.sections().len());
            for (si, section) in tree.sections().iter().enumerate() {
                slots.extend(section.lectures().iter().map(|l| DropTarget::Lecture(l.id())));
                if origin != Some(si) {
                    slots.push(DropTarget::Section(section.id()));
                }
            }
            slots
        }
    }
}

fn home_slot(source: DragSource) -> DropTarget {
    match source {
        DragSource::Section(id) => DropTarget::Section(id),
        DragSource::Lecture(id) => DropTarget::Lecture(id),
    }
}

impl DragController {
    /// Moves the hover target one slot up or down, stopping at either end.
    pub fn nudge(
        &mut self,
        tree: &CurriculumTree,
        direction: Direction,
    ) -> DragResult<Option<DropTarget>> {
        let session = self.session_mut()?;
        let slots = drop_slots(tree, session.source());
        let current = session.hover().unwrap_or(home_slot(session.source()));

        let Some(index) = slots.iter().position(|slot| *slot == current) else {
            return Ok(session.hover());
        };

        let next = match direction {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => (index + 1).min(slots.len() - 1),
        };
        session.set_hover(Some(slots[next]));
        Ok(Some(slots[next]))
    }
}
