mod draft;
pub use draft::{BasicsPatch, CourseBasics, CourseDraft, CourseLevel, CoursePricing, PricingPatch};

mod error;
pub use error::{WizardError, WizardResult};

mod step;
pub use step::WizardStep;

mod store;
pub use store::WizardStore;

mod validator;
pub use validator::{
    BasicsValidator, CurriculumValidator, PricingValidator, StepCompletion, StepValidator,
    StepValidators,
};
