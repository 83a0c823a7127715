use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::curriculum::{CurriculumMutation, CurriculumTree, LectureId, SectionId};
use crate::drag::error::{DragError, DragResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Section,
    Lecture,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    #[default]
    Pointer,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Section(SectionId),
    Lecture(LectureId),
}

impl DragSource {
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Section(_) => DragKind::Section,
            Self::Lecture(_) => DragKind::Lecture,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Section(id) => id.as_uuid(),
            Self::Lecture(id) => id.as_uuid(),
        }
    }
}

/// What the pointer is over: a section container or a lecture position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Section(SectionId),
    Lecture(LectureId),
}

impl DropTarget {
    pub fn classify(tree: &CurriculumTree, id: Uuid) -> Option<Self> {
        if tree.is_section(SectionId::from_uuid(id)) {
            Some(Self::Section(SectionId::from_uuid(id)))
        } else if tree.is_lecture(LectureId::from_uuid(id)) {
            Some(Self::Lecture(LectureId::from_uuid(id)))
        } else {
            None
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Section(id) => id.as_uuid(),
            Self::Lecture(id) => id.as_uuid(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    source: DragSource,
    input: InputSource,
    hover: Option<DropTarget>,
}

impl DragSession {
    pub fn source(&self) -> DragSource {
        self.source
    }

    pub fn input(&self) -> InputSource {
        self.input
    }

    pub fn hover(&self) -> Option<DropTarget> {
        self.hover
    }

    pub(crate) fn set_hover(&mut self, hover: Option<DropTarget>) {
        self.hover = hover;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Released outside any container.
    NoTarget,
    /// Released where it started.
    SamePosition,
    /// The dragged item was deleted mid-drag.
    SourceVanished,
    /// The hovered item was deleted mid-drag.
    TargetVanished,
    /// Explicit cancel.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Committed(CurriculumMutation),
    Cancelled(CancelReason),
}

/// Turns one drag gesture into at most one [`CurriculumMutation`].
///
/// The controller never touches the tree. [`DragController::release`] hands the
/// mutation back and the caller applies it.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub(crate) fn session_mut(&mut self) -> DragResult<&mut DragSession> {
        match &mut self.state {
            DragState::Dragging(session) => Ok(session),
            DragState::Idle => Err(DragError::NotDragging),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn start(
        &mut self,
        tree: &CurriculumTree,
        id: Uuid,
        input: InputSource,
    ) -> DragResult<DragKind> {
        if !self.is_idle() {
            return Err(DragError::AlreadyDragging);
        }

        let source = if tree.is_section(SectionId::from_uuid(id)) {
            DragSource::Section(SectionId::from_uuid(id))
        } else if tree.is_lecture(LectureId::from_uuid(id)) {
            DragSource::Lecture(LectureId::from_uuid(id))
        } else {
            return Err(DragError::UnknownSource(id));
        };

        tracing::debug!(%id, kind = ?source.kind(), ?input, "drag started");
        self.state = DragState::Dragging(DragSession {
            source,
            input,
            hover: None,
        });
        Ok(source.kind())
    }

    /// Records what is under the pointer. Unknown ids hover nothing.
    pub fn hover(
        &mut self,
        tree: &CurriculumTree,
        target: Option<Uuid>,
    ) -> DragResult<Option<DropTarget>> {
        let hover = target.and_then(|id| DropTarget::classify(tree, id));
        self.session_mut()?.set_hover(hover);
        Ok(hover)
    }

    /// Ends the gesture at the current hover target and returns to idle.
    pub fn release(&mut self, tree: &CurriculumTree) -> DragResult<DropOutcome> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Err(DragError::NotDragging);
        };

        let outcome = resolve(&session, tree);
        tracing::debug!(source = %session.source.id(), ?outcome, "drag released");
        Ok(outcome)
    }

    pub fn cancel(&mut self) -> DragResult<DropOutcome> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Err(DragError::NotDragging);
        };

        tracing::debug!(source = %session.source.id(), "drag cancelled");
        Ok(DropOutcome::Cancelled(CancelReason::Aborted))
    }
}

fn owning_section(tree: &CurriculumTree, lecture: LectureId) -> Option<SectionId> {
    tree.locate_lecture(lecture)
        .map(|(si, _)| tree.sections()[si].id())
}

fn resolve(session: &DragSession, tree: &CurriculumTree) -> DropOutcome {
    use CancelReason::*;

    match session.source {
        DragSource::Section(id) => {
            let Some(from) = tree.section_index(id) else {
                return DropOutcome::Cancelled(SourceVanished);
            };

            let target = match session.hover {
                None => return DropOutcome::Cancelled(NoTarget),
                Some(DropTarget::Section(target)) => Some(target),
                Some(DropTarget::Lecture(lecture)) => owning_section(tree, lecture),
            };
            let Some(to) = target.and_then(|t| tree.section_index(t)) else {
                return DropOutcome::Cancelled(TargetVanished);
            };

            if from == to {
                return DropOutcome::Cancelled(SamePosition);
            }

            let mut order: Vec<SectionId> = tree.sections().iter().map(|s| s.id()).collect();
            let moved = order.remove(from);
            order.insert(to, moved);
            DropOutcome::Committed(CurriculumMutation::ReorderSections { order })
        }
        DragSource::Lecture(id) => {
            let Some((from_si, from_li)) = tree.locate_lecture(id) else {
                return DropOutcome::Cancelled(SourceVanished);
            };
            let from_section = tree.sections()[from_si].id();

            match session.hover {
                None => DropOutcome::Cancelled(NoTarget),
                Some(DropTarget::Lecture(target)) => {
                    let Some((to_si, to_li)) = tree.locate_lecture(target) else {
                        return DropOutcome::Cancelled(TargetVanished);
                    };

                    if to_si != from_si {
                        return DropOutcome::Committed(
                            CurriculumMutation::MoveLectureAcrossSections {
                                lecture_id: id,
                                from_section_id: from_section,
                                to_section_id: tree.sections()[to_si].id(),
                                target_index: to_li,
                            },
                        );
                    }

                    if to_li == from_li {
                        return DropOutcome::Cancelled(SamePosition);
                    }

                    DropOutcome::Committed(CurriculumMutation::MoveLectureWithinSection {
                        section_id: from_section,
                        from_index: from_li,
                        to_index: to_li,
                    })
                }
                Some(DropTarget::Section(target)) => {
                    let Some(section) = tree.section(target) else {
                        return DropOutcome::Cancelled(TargetVanished);
                    };

                    if section.id() == from_section {
                        return DropOutcome::Cancelled(SamePosition);
                    }

                    DropOutcome::Committed(CurriculumMutation::MoveLectureAcrossSections {
                        lecture_id: id,
                        from_section_id: from_section,
                        to_section_id: section.id(),
                        target_index: section.lectures().len(),
                    })
                }
            }
        }
    }
}
