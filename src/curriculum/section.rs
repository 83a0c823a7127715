use serde::{Deserialize, Serialize};

use crate::curriculum::id::SectionId;
use crate::curriculum::lecture::Lecture;
use crate::curriculum::ordered::{self, Ordered};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Section {
    id: SectionId,
    title: String,
    description: String,
    lectures: Vec<Lecture>,
    order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Section {
    pub(crate) fn empty(id: SectionId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            lectures: Vec::new(),
            order: 0,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &SectionPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }

    pub(crate) fn lectures_mut(&mut self) -> &mut Vec<Lecture> {
        &mut self.lectures
    }

    /// Renumbers the lectures and re-stamps their back-reference from nesting.
    pub(crate) fn restamp(&mut self) {
        let id = self.id;
        for lecture in self.lectures.iter_mut() {
            lecture.set_section_id(id);
        }
        ordered::renumber(&mut self.lectures);
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn total_duration(&self) -> u32 {
        self.lectures.iter().map(|l| l.duration() as u32).sum()
    }
}

impl Ordered for Section {
    type Id = SectionId;

    fn id(&self) -> SectionId {
        self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
