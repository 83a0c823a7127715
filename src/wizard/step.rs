use serde::{Deserialize, Serialize};

static ORDERED_STEPS: [WizardStep; 4] = WizardStep::ALL;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Basics,
    Curriculum,
    Pricing,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Basics,
        WizardStep::Curriculum,
        WizardStep::Pricing,
        WizardStep::Review,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Steps that have to be complete before this one can be entered.
    pub fn prerequisites(&self) -> &'static [WizardStep] {
        &ORDERED_STEPS[..self.index()]
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basics => write!(f, "basics"),
            Self::Curriculum => write!(f, "curriculum"),
            Self::Pricing => write!(f, "pricing"),
            Self::Review => write!(f, "review"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_navigation() {
        assert_eq!(WizardStep::Basics.next(), Some(WizardStep::Curriculum));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Basics.previous(), None);
        assert_eq!(WizardStep::Pricing.previous(), Some(WizardStep::Curriculum));
        assert_eq!(
            WizardStep::Pricing.prerequisites(),
            &[WizardStep::Basics, WizardStep::Curriculum]
        );
    }
}
