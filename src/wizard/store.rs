use uuid::Uuid;

use crate::curriculum::{
    CurriculumMutation, CurriculumTree, LectureDraft, LectureId, LecturePatch, SectionId,
    SectionPatch,
};
use crate::drag::{Direction, DragController, DragKind, DragResult, DropOutcome, DropTarget, InputSource};
use crate::wizard::draft::{BasicsPatch, CourseDraft, PricingPatch};
use crate::wizard::error::{WizardError, WizardResult};
use crate::wizard::step::WizardStep;
use crate::wizard::validator::{StepCompletion, StepValidators};

/// State of one authoring session.
///
/// Holds the draft and dispatches curriculum mutations: each one is computed by
/// the pure tree functions, the stored tree is swapped for the result and the
/// steps are validated again. No structural logic lives here.
#[derive(Debug)]
pub struct WizardStore {
    draft: CourseDraft,
    current_step: WizardStep,
    completion: StepCompletion,
    selection: Option<LectureId>,
    drag: DragController,
    validators: StepValidators,
}

impl WizardStore {
    pub fn new(draft: CourseDraft) -> Self {
        Self::with_validators(draft, StepValidators::default())
    }

    pub fn with_validators(draft: CourseDraft, validators: StepValidators) -> Self {
        let completion = validators.evaluate(&draft);
        Self {
            draft,
            current_step: WizardStep::default(),
            completion,
            selection: None,
            drag: DragController::new(),
            validators,
        }
    }

    pub fn draft(&self) -> &CourseDraft {
        &self.draft
    }

    pub fn curriculum(&self) -> &CurriculumTree {
        self.draft.curriculum()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn completion(&self) -> StepCompletion {
        self.completion
    }

    pub fn selection(&self) -> Option<LectureId> {
        self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    fn revalidate(&mut self) {
        self.completion = self.validators.evaluate(&self.draft);
    }

    /// Applies one mutation. Returns `false` when it changed nothing.
    #[tracing::instrument(level = "debug", skip_all, fields(op = mutation.name()))]
    pub fn dispatch(&mut self, mutation: &CurriculumMutation) -> bool {
        let next = self.curriculum().apply(mutation);
        if next == *self.curriculum() {
            tracing::debug!("mutation left the curriculum unchanged");
            return false;
        }

        self.draft.replace_curriculum(next);
        if let Some(selected) = self.selection {
            if !self.curriculum().is_lecture(selected) {
                self.selection = None;
            }
        }
        self.revalidate();
        true
    }

    pub fn add_section(&mut self) -> SectionId {
        self.add_section_with(SectionPatch::default())
    }

    /// Appends a section with its initial fields in a single dispatch.
    pub fn add_section_with(&mut self, patch: SectionPatch) -> SectionId {
        let section_id = SectionId::new();
        self.dispatch(&CurriculumMutation::AddSection { section_id, patch });
        section_id
    }

    pub fn update_section(&mut self, section_id: SectionId, patch: SectionPatch) -> bool {
        self.dispatch(&CurriculumMutation::UpdateSection { section_id, patch })
    }

    pub fn delete_section(&mut self, section_id: SectionId) -> bool {
        self.dispatch(&CurriculumMutation::DeleteSection { section_id })
    }

    pub fn reorder_sections(&mut self, order: Vec<SectionId>) -> bool {
        self.dispatch(&CurriculumMutation::ReorderSections { order })
    }

    /// Returns the new lecture's id, or `None` when the section does not exist.
    pub fn add_lecture(&mut self, section_id: SectionId, draft: LectureDraft) -> Option<LectureId> {
        let lecture_id = LectureId::new();
        self.dispatch(&CurriculumMutation::AddLecture {
            section_id,
            lecture_id,
            draft,
        })
        .then_some(lecture_id)
    }

    pub fn update_lecture(&mut self, lecture_id: LectureId, patch: LecturePatch) -> bool {
        self.dispatch(&CurriculumMutation::UpdateLecture { lecture_id, patch })
    }

    pub fn delete_lecture(&mut self, lecture_id: LectureId) -> bool {
        self.dispatch(&CurriculumMutation::DeleteLecture { lecture_id })
    }

    pub fn move_lecture_within_section(
        &mut self,
        section_id: SectionId,
        from_index: usize,
        to_index: usize,
    ) -> bool {
        self.dispatch(&CurriculumMutation::MoveLectureWithinSection {
            section_id,
            from_index,
            to_index,
        })
    }

    pub fn move_lecture_across_sections(
        &mut self,
        lecture_id: LectureId,
        from_section_id: SectionId,
        to_section_id: SectionId,
        target_index: usize,
    ) -> bool {
        self.dispatch(&CurriculumMutation::MoveLectureAcrossSections {
            lecture_id,
            from_section_id,
            to_section_id,
            target_index,
        })
    }

    /// Opens a lecture in the editor, or closes it with `None`.
    pub fn select_lecture(&mut self, lecture_id: Option<LectureId>) -> bool {
        match lecture_id {
            Some(id) if !self.curriculum().is_lecture(id) => false,
            _ => {
                self.selection = lecture_id;
                true
            }
        }
    }

    pub fn update_basics(&mut self, patch: &BasicsPatch) {
        self.draft.apply_basics(patch);
        self.revalidate();
    }

    pub fn update_pricing(&mut self, patch: &PricingPatch) {
        self.draft.apply_pricing(patch);
        self.revalidate();
    }

    pub fn begin_drag(&mut self, id: Uuid, input: InputSource) -> DragResult<DragKind> {
        self.drag.start(self.draft.curriculum(), id, input)
    }

    pub fn drag_over(&mut self, target: Option<Uuid>) -> DragResult<Option<DropTarget>> {
        self.drag.hover(self.draft.curriculum(), target)
    }

    pub fn nudge_drag(&mut self, direction: Direction) -> DragResult<Option<DropTarget>> {
        self.drag.nudge(self.draft.curriculum(), direction)
    }

    /// Finishes the gesture; a committed drop goes through [`WizardStore::dispatch`].
    pub fn drop_drag(&mut self) -> DragResult<DropOutcome> {
        let outcome = self.drag.release(self.draft.curriculum())?;
        if let DropOutcome::Committed(mutation) = &outcome {
            self.dispatch(mutation);
        }
        Ok(outcome)
    }

    pub fn cancel_drag(&mut self) -> DragResult<DropOutcome> {
        self.drag.cancel()
    }

    pub fn next_step(&mut self) -> WizardResult<WizardStep> {
        let next = self.current_step.next().ok_or(WizardError::NoNextStep)?;
        self.go_to_step(next)
    }

    pub fn previous_step(&mut self) -> WizardResult<WizardStep> {
        let previous = self
            .current_step
            .previous()
            .ok_or(WizardError::NoPreviousStep)?;
        self.go_to_step(previous)
    }

    /// Enters `step` if every step before it is complete.
    pub fn go_to_step(&mut self, step: WizardStep) -> WizardResult<WizardStep> {
        if let Some(incomplete) = step
            .prerequisites()
            .iter()
            .find(|s| !self.completion.is_complete(**s))
        {
            return Err(WizardError::StepIncomplete(*incomplete));
        }

        tracing::debug!(from = %self.current_step, to = %step, "wizard step changed");
        self.current_step = step;
        Ok(step)
    }
}

impl Default for WizardStore {
    fn default() -> Self {
        Self::new(CourseDraft::new())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curriculum::LectureType;

    fn lecture(title: &str) -> LectureDraft {
        LectureDraft {
            title: title.into(),
            kind: LectureType::Quiz,
            ..Default::default()
        }
    }

    fn titled(title: &str) -> SectionPatch {
        SectionPatch {
            title: Some(title.into()),
            description: None,
        }
    }

    #[test]
    fn test_dispatch_replaces_tree_and_revalidates() {
        let mut store = WizardStore::default();
        assert!(!store.completion().curriculum);

        let section = store.add_section();
        assert!(store.update_section(section, titled("Intro")));
        assert!(!store.completion().curriculum);

        store.add_lecture(section, lecture("Warm-up quiz")).unwrap();
        assert!(store.completion().curriculum);
        store.curriculum().verify().unwrap();
    }

    #[test]
    fn test_add_section_with_sets_fields() {
        let mut store = WizardStore::default();
        let section = store.add_section_with(titled("Intro"));

        let added = store.curriculum().section(section).unwrap();
        assert_eq!(added.title(), "Intro");
        assert_eq!(added.order(), 0);
    }

    #[test]
    fn test_unknown_ids_report_no_change() {
        let mut store = WizardStore::default();
        store.add_section();
        let before = store.curriculum().clone();

        assert!(!store.delete_section(SectionId::new()));
        assert!(!store.delete_lecture(LectureId::new()));
        assert!(store.add_lecture(SectionId::new(), lecture("x")).is_none());
        assert_eq!(*store.curriculum(), before);
    }

    #[test]
    fn test_selection_survives_moves_and_clears_on_delete() {
        let mut store = WizardStore::default();
        let a = store.add_section();
        let b = store.add_section();
        let a1 = store.add_lecture(a, lecture("a1")).unwrap();
        store.add_lecture(a, lecture("a2")).unwrap();

        assert!(store.select_lecture(Some(a1)));
        assert!(store.move_lecture_across_sections(a1, a, b, 0));
        assert_eq!(store.selection(), Some(a1));

        assert!(store.delete_section(b));
        assert_eq!(store.selection(), None);
        assert!(!store.select_lecture(Some(a1)));
    }

    #[test]
    fn test_drop_commits_through_dispatch() {
        let mut store = WizardStore::default();
        let a = store.add_section();
        let b = store.add_section();
        let a1 = store.add_lecture(a, lecture("a1")).unwrap();

        store.begin_drag(a1.as_uuid(), InputSource::Pointer).unwrap();
        store.drag_over(Some(b.as_uuid())).unwrap();
        let outcome = store.drop_drag().unwrap();

        assert!(matches!(outcome, DropOutcome::Committed(_)));
        assert_eq!(store.curriculum().lecture(a1).unwrap().section_id(), b);
        assert!(store.drag().is_idle());
    }

    #[test]
    fn test_cancelled_drag_keeps_snapshot() {
        let mut store = WizardStore::default();
        let a = store.add_section();
        let a1 = store.add_lecture(a, lecture("a1")).unwrap();
        store.add_lecture(a, lecture("a2")).unwrap();
        let snapshot = store.curriculum().clone();

        store.begin_drag(a1.as_uuid(), InputSource::Pointer).unwrap();
        store.drag_over(Some(Uuid::new_v4())).unwrap();
        assert!(matches!(store.drop_drag().unwrap(), DropOutcome::Cancelled(_)));
        assert_eq!(*store.curriculum(), snapshot);
    }

    #[test]
    fn test_mutation_mid_drag_is_seen_at_drop() {
        let mut store = WizardStore::default();
        let a = store.add_section();
        let b = store.add_section();
        let a1 = store.add_lecture(a, lecture("a1")).unwrap();

        store.begin_drag(a1.as_uuid(), InputSource::Keyboard).unwrap();
        store.nudge_drag(Direction::Down).unwrap();
        assert!(store.delete_section(a));

        assert!(matches!(store.drop_drag().unwrap(), DropOutcome::Cancelled(_)));
        assert!(store.curriculum().section(b).unwrap().lectures().is_empty());
    }

    #[test]
    fn test_steps_are_gated() {
        let mut store = WizardStore::default();
        assert_eq!(
            store.next_step(),
            Err(WizardError::StepIncomplete(WizardStep::Basics))
        );
        assert_eq!(store.previous_step(), Err(WizardError::NoPreviousStep));

        store.update_basics(&BasicsPatch {
            title: Some("Async Rust".into()),
            description: Some("Futures, executors and pinning.".into()),
            category: Some("development".into()),
            ..Default::default()
        });
        assert_eq!(store.next_step(), Ok(WizardStep::Curriculum));
        assert_eq!(
            store.next_step(),
            Err(WizardError::StepIncomplete(WizardStep::Curriculum))
        );

        let s = store.add_section();
        store.update_section(s, titled("Futures"));
        store.add_lecture(s, lecture("Quiz")).unwrap();
        assert_eq!(store.next_step(), Ok(WizardStep::Pricing));
        assert_eq!(store.previous_step(), Ok(WizardStep::Curriculum));
    }
}
