use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::curriculum::{CurriculumResult, CurriculumTree};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    AllLevels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CourseBasics {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: Option<String>,
    pub level: CourseLevel,
    pub language: String,
}

impl Default for CourseBasics {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            category: None,
            level: CourseLevel::default(),
            language: String::from("en"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct BasicsPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CoursePricing {
    pub is_free: bool,
    /// Price in the smallest currency unit.
    pub price_cents: u32,
    pub currency: String,
}

impl Default for CoursePricing {
    fn default() -> Self {
        Self {
            is_free: false,
            price_cents: 0,
            currency: String::from("USD"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct PricingPatch {
    pub is_free: Option<bool>,
    pub price_cents: Option<u32>,
    pub currency: Option<String>,
}

/// Everything an instructor has entered for a course that is not published yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseDraft {
    id: Uuid,
    #[serde(default)]
    basics: CourseBasics,
    #[serde(default)]
    curriculum: CurriculumTree,
    #[serde(default)]
    pricing: CoursePricing,
}

impl CourseDraft {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            basics: CourseBasics::default(),
            curriculum: CurriculumTree::new(),
            pricing: CoursePricing::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn basics(&self) -> &CourseBasics {
        &self.basics
    }

    pub fn curriculum(&self) -> &CurriculumTree {
        &self.curriculum
    }

    pub fn pricing(&self) -> &CoursePricing {
        &self.pricing
    }

    pub(crate) fn replace_curriculum(&mut self, curriculum: CurriculumTree) {
        self.curriculum = curriculum;
    }

    pub(crate) fn apply_basics(&mut self, patch: &BasicsPatch) {
        let basics = &mut self.basics;
        if let Some(title) = &patch.title {
            basics.title = title.clone();
        }
        if let Some(subtitle) = &patch.subtitle {
            basics.subtitle = subtitle.clone();
        }
        if let Some(description) = &patch.description {
            basics.description = description.clone();
        }
        if let Some(category) = &patch.category {
            basics.category = Some(category.clone()).filter(|c| !c.trim().is_empty());
        }
        if let Some(level) = patch.level {
            basics.level = level;
        }
        if let Some(language) = &patch.language {
            basics.language = language.clone();
        }
    }

    pub(crate) fn apply_pricing(&mut self, patch: &PricingPatch) {
        let pricing = &mut self.pricing;
        if let Some(is_free) = patch.is_free {
            pricing.is_free = is_free;
        }
        if let Some(price_cents) = patch.price_cents {
            pricing.price_cents = price_cents;
        }
        if let Some(currency) = &patch.currency {
            pricing.currency = currency.to_uppercase();
        }
    }

    /// Repairs derived curriculum fields and checks what cannot be repaired.
    pub fn into_verified(mut self) -> CurriculumResult<Self> {
        self.curriculum = self.curriculum.normalized();
        self.curriculum.verify()?;
        Ok(self)
    }
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self::new()
    }
}
