use serde::Serialize;

use crate::curriculum::{Lecture, LectureType};
use crate::wizard::draft::CourseDraft;
use crate::wizard::step::WizardStep;

/// Decides whether one wizard step holds enough to move past it.
pub trait StepValidator: Send + Sync {
    fn step(&self) -> WizardStep;
    fn is_complete(&self, draft: &CourseDraft) -> bool;
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub struct BasicsValidator;

impl StepValidator for BasicsValidator {
    fn step(&self) -> WizardStep {
        WizardStep::Basics
    }

    fn is_complete(&self, draft: &CourseDraft) -> bool {
        let basics = draft.basics();
        !blank(&basics.title) && !blank(&basics.description) && basics.category.is_some()
    }
}

pub struct CurriculumValidator;

impl CurriculumValidator {
    fn lecture_complete(lecture: &Lecture) -> bool {
        if blank(lecture.title()) {
            return false;
        }

        match lecture.kind() {
            LectureType::Video => lecture.video_url().is_some(),
            LectureType::Text => lecture.content().is_some(),
            LectureType::Quiz | LectureType::Assignment => true,
        }
    }
}

impl StepValidator for CurriculumValidator {
    fn step(&self) -> WizardStep {
        WizardStep::Curriculum
    }

    fn is_complete(&self, draft: &CourseDraft) -> bool {
        let sections = draft.curriculum().sections();
        !sections.is_empty()
            && sections.iter().all(|section| {
                !blank(section.title())
                    && !section.lectures().is_empty()
                    && section.lectures().iter().all(Self::lecture_complete)
            })
    }
}

pub struct PricingValidator;

impl StepValidator for PricingValidator {
    fn step(&self) -> WizardStep {
        WizardStep::Pricing
    }

    fn is_complete(&self, draft: &CourseDraft) -> bool {
        let pricing = draft.pricing();
        pricing.is_free
            || (pricing.price_cents > 0
                && pricing.currency.len() == 3
                && pricing.currency.chars().all(|c| c.is_ascii_alphabetic()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct StepCompletion {
    pub basics: bool,
    pub curriculum: bool,
    pub pricing: bool,
    pub review: bool,
}

impl StepCompletion {
    pub fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => self.basics,
            WizardStep::Curriculum => self.curriculum,
            WizardStep::Pricing => self.pricing,
            WizardStep::Review => self.review,
        }
    }
}

pub struct StepValidators {
    validators: Vec<Box<dyn StepValidator>>,
}

impl StepValidators {
    pub fn new(validators: Vec<Box<dyn StepValidator>>) -> Self {
        Self { validators }
    }

    /// Runs every validator. A step without a validator counts as complete;
    /// review is complete once everything before it is.
    pub fn evaluate(&self, draft: &CourseDraft) -> StepCompletion {
        let check = |step: WizardStep| {
            self.validators
                .iter()
                .filter(|v| v.step() == step)
                .all(|v| v.is_complete(draft))
        };

        let basics = check(WizardStep::Basics);
        let curriculum = check(WizardStep::Curriculum);
        let pricing = check(WizardStep::Pricing);
        StepCompletion {
            basics,
            curriculum,
            pricing,
            review: basics && curriculum && pricing && check(WizardStep::Review),
        }
    }
}

impl Default for StepValidators {
    fn default() -> Self {
        Self::new(vec![
            Box::new(BasicsValidator),
            Box::new(CurriculumValidator),
            Box::new(PricingValidator),
        ])
    }
}

impl std::fmt::Debug for StepValidators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|v| v.step()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curriculum::{LectureDraft, LectureId, LecturePatch, SectionId, SectionPatch};
    use crate::wizard::draft::{BasicsPatch, PricingPatch};

    fn complete_curriculum(draft: &mut CourseDraft) -> (SectionId, LectureId) {
        let section = SectionId::new();
        let lecture = LectureId::new();
        let tree = draft
            .curriculum()
            .add_section(section)
            .update_section(section, &SectionPatch {
                title: Some("Setup".into()),
                description: None,
            })
            .add_lecture(section, lecture, &LectureDraft {
                title: "Installing".into(),
                kind: LectureType::Text,
                content: Some("Run the installer.".into()),
                ..Default::default()
            });
        draft.replace_curriculum(tree);
        (section, lecture)
    }

    #[test]
    fn test_curriculum_needs_lectures_in_every_section() {
        let mut draft = CourseDraft::new();
        assert!(!CurriculumValidator.is_complete(&draft));

        complete_curriculum(&mut draft);
        assert!(CurriculumValidator.is_complete(&draft));

        let empty = SectionId::new();
        let tree = draft
            .curriculum()
            .add_section(empty)
            .update_section(empty, &SectionPatch {
                title: Some("Later".into()),
                description: None,
            });
        draft.replace_curriculum(tree);
        assert!(!CurriculumValidator.is_complete(&draft));
    }

    #[test]
    fn test_curriculum_checks_lecture_payload() {
        let mut draft = CourseDraft::new();
        let (_, lecture) = complete_curriculum(&mut draft);

        let tree = draft.curriculum().update_lecture(lecture, &LecturePatch {
            kind: Some(LectureType::Video),
            ..Default::default()
        });
        draft.replace_curriculum(tree);
        assert!(!CurriculumValidator.is_complete(&draft));
    }

    #[test]
    fn test_pricing() {
        let mut draft = CourseDraft::new();
        assert!(!PricingValidator.is_complete(&draft));

        draft.apply_pricing(&PricingPatch {
            price_cents: Some(1999),
            currency: Some("eur".into()),
            ..Default::default()
        });
        assert!(PricingValidator.is_complete(&draft));
        assert_eq!(draft.pricing().currency, "EUR");

        draft.apply_pricing(&PricingPatch {
            price_cents: Some(0),
            is_free: Some(true),
            ..Default::default()
        });
        assert!(PricingValidator.is_complete(&draft));
    }

    #[test]
    fn test_review_follows_other_steps() {
        let mut draft = CourseDraft::new();
        let validators = StepValidators::default();
        assert_eq!(validators.evaluate(&draft), StepCompletion::default());

        draft.apply_basics(&BasicsPatch {
            title: Some("Rust for Beginners".into()),
            description: Some("From zero to ownership.".into()),
            category: Some("development".into()),
            ..Default::default()
        });
        complete_curriculum(&mut draft);
        draft.apply_pricing(&PricingPatch {
            is_free: Some(true),
            ..Default::default()
        });

        let completion = validators.evaluate(&draft);
        assert!(completion.basics && completion.curriculum && completion.pricing);
        assert!(completion.review);
    }
}
