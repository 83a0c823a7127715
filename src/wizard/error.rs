use thiserror::Error;

use crate::wizard::WizardStep;

pub type WizardResult<T> = std::result::Result<T, WizardError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("step `{0}` is not complete")]
    StepIncomplete(WizardStep),
    #[error("already at the last step")]
    NoNextStep,
    #[error("already at the first step")]
    NoPreviousStep,
}
