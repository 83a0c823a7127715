use serde::{Deserialize, Serialize};

use crate::curriculum::id::{LectureId, SectionId};
use crate::curriculum::ordered::Ordered;

pub const MAX_LECTURE_MINUTES: u16 = 600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LectureType {
    #[default]
    Video,
    Text,
    Quiz,
    Assignment,
}

impl std::fmt::Display for LectureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Text => write!(f, "text"),
            Self::Quiz => write!(f, "quiz"),
            Self::Assignment => write!(f, "assignment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Lecture {
    id: LectureId,
    section_id: SectionId,
    title: String,
    #[serde(rename = "type")]
    kind: LectureType,
    duration: u16,
    is_preview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    order: u32,
}

/// Field values for a lecture that is about to be added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LectureDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LectureType,
    pub duration: u16,
    pub is_preview: bool,
    pub content: Option<String>,
    pub video_url: Option<String>,
}

/// Shallow patch for an existing lecture. An empty `content` or `video_url`
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LecturePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<LectureType>,
    pub duration: Option<u16>,
    pub is_preview: Option<bool>,
    pub content: Option<String>,
    pub video_url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl Lecture {
    pub(crate) fn from_draft(id: LectureId, section_id: SectionId, draft: &LectureDraft) -> Self {
        Self {
            id,
            section_id,
            title: draft.title.clone(),
            kind: draft.kind,
            duration: draft.duration.min(MAX_LECTURE_MINUTES),
            is_preview: draft.is_preview,
            content: non_empty(&draft.content),
            video_url: non_empty(&draft.video_url),
            order: 0,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &LecturePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration.min(MAX_LECTURE_MINUTES);
        }
        if let Some(is_preview) = patch.is_preview {
            self.is_preview = is_preview;
        }
        if patch.content.is_some() {
            self.content = non_empty(&patch.content);
        }
        if patch.video_url.is_some() {
            self.video_url = non_empty(&patch.video_url);
        }
    }

    pub(crate) fn set_section_id(&mut self, section_id: SectionId) {
        self.section_id = section_id;
    }

    pub(crate) fn clamp_duration(&mut self) {
        self.duration = self.duration.min(MAX_LECTURE_MINUTES);
    }

    pub fn id(&self) -> LectureId {
        self.id
    }

    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> LectureType {
        self.kind
    }

    pub fn duration(&self) -> u16 {
        self.duration
    }

    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn order(&self) -> u32 {
        self.order
    }
}

impl Ordered for Lecture {
    type Id = LectureId;

    fn id(&self) -> LectureId {
        self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
