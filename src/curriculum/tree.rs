use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::curriculum::error::{CurriculumError, CurriculumResult};
use crate::curriculum::id::{LectureId, SectionId};
use crate::curriculum::lecture::{Lecture, LectureDraft, LecturePatch};
use crate::curriculum::ordered;
use crate::curriculum::section::{Section, SectionPatch};

/// Ordered sections, each owning its ordered lectures.
///
/// Every operation takes the tree by reference and hands back a complete new
/// tree. A reference to an id that is not in the tree yields an identical copy,
/// never a partially edited one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurriculumTree {
    sections: Vec<Section>,
}

impl CurriculumTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        ordered::position_of(&self.sections, id)
    }

    pub fn is_section(&self, id: SectionId) -> bool {
        self.section_index(id).is_some()
    }

    /// Finds a lecture by scanning the nesting, returning `(section index, lecture index)`.
    pub fn locate_lecture(&self, id: LectureId) -> Option<(usize, usize)> {
        self.sections.iter().enumerate().find_map(|(si, section)| {
            ordered::position_of(section.lectures(), id).map(|li| (si, li))
        })
    }

    pub fn lecture(&self, id: LectureId) -> Option<&Lecture> {
        self.locate_lecture(id)
            .map(|(si, li)| &self.sections[si].lectures()[li])
    }

    pub fn is_lecture(&self, id: LectureId) -> bool {
        self.locate_lecture(id).is_some()
    }

    pub fn lecture_count(&self) -> usize {
        self.sections.iter().map(|s| s.lectures().len()).sum()
    }

    pub fn total_duration(&self) -> u32 {
        self.sections.iter().map(Section::total_duration).sum()
    }

    fn transform<F>(&self, f: F) -> Self
    where
        F: FnOnce(&mut Vec<Section>) -> bool,
    {
        let mut sections = self.sections.clone();
        if f(&mut sections) {
            Self { sections }
        } else {
            self.clone()
        }
    }

    pub fn add_section(&self, id: SectionId) -> Self {
        if self.is_section(id) {
            tracing::debug!(%id, "section id already present, ignoring add");
            return self.clone();
        }

        self.transform(|sections| {
            let end = sections.len();
            ordered::insert_at(sections, end, Section::empty(id));
            true
        })
    }

    pub fn update_section(&self, id: SectionId, patch: &SectionPatch) -> Self {
        self.transform(|sections| match sections.iter_mut().find(|s| s.id() == id) {
            Some(section) => {
                section.apply_patch(patch);
                true
            }
            None => false,
        })
    }

    /// Removes the section together with every lecture it holds.
    pub fn delete_section(&self, id: SectionId) -> Self {
        self.transform(|sections| ordered::remove_by_id(sections, id).is_some())
    }

    /// Rearranges sections to match `order`, which has to be a permutation of the
    /// current section ids.
    pub fn reorder_sections(&self, order: &[SectionId]) -> Self {
        if order.len() != self.sections.len() {
            return self.clone();
        }

        let mut seen = HashSet::with_capacity(order.len());
        if !order.iter().all(|id| seen.insert(*id)) {
            return self.clone();
        }

        self.transform(|sections| {
            let mut rearranged = Vec::with_capacity(order.len());
            for id in order {
                match ordered::position_of(sections, *id) {
                    Some(index) => rearranged.push(sections[index].clone()),
                    None => return false,
                }
            }
            ordered::renumber(&mut rearranged);
            *sections = rearranged;
            true
        })
    }

    pub fn add_lecture(
        &self,
        section_id: SectionId,
        lecture_id: LectureId,
        draft: &LectureDraft,
    ) -> Self {
        if self.is_lecture(lecture_id) {
            tracing::debug!(%lecture_id, "lecture id already present, ignoring add");
            return self.clone();
        }

        self.transform(|sections| match sections.iter_mut().find(|s| s.id() == section_id) {
            Some(section) => {
                let lectures = section.lectures_mut();
                let end = lectures.len();
                ordered::insert_at(
                    lectures,
                    end,
                    Lecture::from_draft(lecture_id, section_id, draft),
                );
                true
            }
            None => false,
        })
    }

    pub fn update_lecture(&self, id: LectureId, patch: &LecturePatch) -> Self {
        let Some((si, li)) = self.locate_lecture(id) else {
            return self.clone();
        };

        self.transform(|sections| {
            sections[si].lectures_mut()[li].apply_patch(patch);
            true
        })
    }

    pub fn delete_lecture(&self, id: LectureId) -> Self {
        let Some((si, _)) = self.locate_lecture(id) else {
            return self.clone();
        };

        self.transform(|sections| ordered::remove_by_id(sections[si].lectures_mut(), id).is_some())
    }

    pub fn move_lecture_within_section(&self, section_id: SectionId, from: usize, to: usize) -> Self {
        let Some(si) = self.section_index(section_id) else {
            return self.clone();
        };

        self.transform(|sections| ordered::move_within(sections[si].lectures_mut(), from, to))
    }

    /// Moves a lecture out of `from_section` and into `to_section` at
    /// `target_index`, clamped to the destination's length. When both sections
    /// are the same this is a within-section move.
    pub fn move_lecture_across_sections(
        &self,
        lecture_id: LectureId,
        from_section: SectionId,
        to_section: SectionId,
        target_index: usize,
    ) -> Self {
        let (Some(from_si), Some(to_si)) = (
            self.section_index(from_section),
            self.section_index(to_section),
        ) else {
            return self.clone();
        };

        // the tree decides where the lecture lives, not the caller
        let Some(from_li) = ordered::position_of(self.sections[from_si].lectures(), lecture_id)
        else {
            return self.clone();
        };

        if from_si == to_si {
            return self.move_lecture_within_section(from_section, from_li, target_index);
        }

        self.transform(|sections| {
            let Some(mut lecture) = ordered::remove_by_id(sections[from_si].lectures_mut(), lecture_id)
            else {
                return false;
            };
            lecture.set_section_id(to_section);
            ordered::insert_at(sections[to_si].lectures_mut(), target_index, lecture);
            true
        })
    }

    /// Rebuilds orders and back-references from the nesting and clamps durations.
    /// Used on trees that come back from storage.
    pub fn normalized(mut self) -> Self {
        ordered::renumber(&mut self.sections);
        for section in self.sections.iter_mut() {
            for lecture in section.lectures_mut().iter_mut() {
                lecture.clamp_duration();
            }
            section.restamp();
        }
        self
    }

    pub fn verify(&self) -> CurriculumResult<()> {
        let mut section_ids = HashSet::new();
        let mut lecture_ids = HashSet::new();

        if let Some((section, expected, found)) = ordered::first_out_of_order(&self.sections) {
            return Err(CurriculumError::SectionOrder {
                section,
                expected,
                found,
            });
        }

        for section in self.sections.iter() {
            if !section_ids.insert(section.id()) {
                return Err(CurriculumError::DuplicateSectionId(section.id()));
            }
            if let Some((lecture, expected, found)) = ordered::first_out_of_order(section.lectures())
            {
                return Err(CurriculumError::LectureOrder {
                    lecture,
                    expected,
                    found,
                });
            }

            for lecture in section.lectures() {
                if !lecture_ids.insert(lecture.id()) {
                    return Err(CurriculumError::DuplicateLectureId(lecture.id()));
                }
                if lecture.section_id() != section.id() {
                    return Err(CurriculumError::BackReference {
                        lecture: lecture.id(),
                        expected: section.id(),
                        found: lecture.section_id(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Two sections: A holding `a1, a2` and B holding `b1`.
    pub(crate) struct Fixture {
        pub tree: CurriculumTree,
        pub a: SectionId,
        pub b: SectionId,
        pub a1: LectureId,
        pub a2: LectureId,
        pub b1: LectureId,
    }

    fn titled(title: &str) -> LectureDraft {
        LectureDraft {
            title: title.to_string(),
            duration: 5,
            ..Default::default()
        }
    }

    pub(crate) fn fixture() -> Fixture {
        let (a, b) = (SectionId::new(), SectionId::new());
        let (a1, a2, b1) = (LectureId::new(), LectureId::new(), LectureId::new());

        let tree = CurriculumTree::new()
            .add_section(a)
            .update_section(a, &SectionPatch {
                title: Some("A".into()),
                description: None,
            })
            .add_section(b)
            .update_section(b, &SectionPatch {
                title: Some("B".into()),
                description: None,
            })
            .add_lecture(a, a1, &titled("a1"))
            .add_lecture(a, a2, &titled("a2"))
            .add_lecture(b, b1, &titled("b1"));

        Fixture { tree, a, b, a1, a2, b1 }
    }

    pub(crate) fn lecture_ids(tree: &CurriculumTree, section: SectionId) -> Vec<LectureId> {
        tree.section(section)
            .unwrap()
            .lectures()
            .iter()
            .map(|l| l.id())
            .collect()
    }

    fn lecture_orders(tree: &CurriculumTree, section: SectionId) -> Vec<u32> {
        tree.section(section)
            .unwrap()
            .lectures()
            .iter()
            .map(|l| l.order())
            .collect()
    }

    fn section_ids(tree: &CurriculumTree) -> Vec<SectionId> {
        tree.sections().iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_add_section_appends_with_next_order() {
        let f = fixture();
        let c = SectionId::new();
        let tree = f.tree.add_section(c);

        assert_eq!(section_ids(&tree), vec![f.a, f.b, c]);
        let added = tree.section(c).unwrap();
        assert_eq!(added.order(), 2);
        assert_eq!(added.title(), "");
        assert!(added.lectures().is_empty());
        tree.verify().unwrap();
    }

    #[test]
    fn test_add_with_existing_id_is_ignored() {
        let f = fixture();
        assert_eq!(f.tree.add_section(f.a), f.tree);
        assert_eq!(f.tree.add_lecture(f.b, f.a1, &titled("dup")), f.tree);
    }

    #[test]
    fn test_update_section_merges_patch() {
        let f = fixture();
        let tree = f.tree.update_section(f.a, &SectionPatch {
            title: None,
            description: Some("Getting started".into()),
        });

        let a = tree.section(f.a).unwrap();
        assert_eq!(a.title(), "A");
        assert_eq!(a.description(), "Getting started");
    }

    #[test]
    fn test_delete_section_discards_lectures() {
        let f = fixture();
        let tree = f.tree.delete_section(f.a);

        assert_eq!(section_ids(&tree), vec![f.b]);
        assert_eq!(tree.section(f.b).unwrap().order(), 0);
        assert!(tree.lecture(f.a1).is_none());
        assert!(tree.lecture(f.a2).is_none());
        assert_eq!(tree.lecture_count(), 1);
        tree.verify().unwrap();
    }

    #[test]
    fn test_reorder_sections_requires_permutation() {
        let f = fixture();

        let tree = f.tree.reorder_sections(&[f.b, f.a]);
        assert_eq!(section_ids(&tree), vec![f.b, f.a]);
        assert_eq!(tree.section(f.b).unwrap().order(), 0);
        assert_eq!(tree.section(f.a).unwrap().order(), 1);
        assert_eq!(lecture_ids(&tree, f.a), vec![f.a1, f.a2]);
        assert_eq!(tree.lecture(f.a2).unwrap().section_id(), f.a);
        tree.verify().unwrap();

        assert_eq!(f.tree.reorder_sections(&[f.a]), f.tree);
        assert_eq!(f.tree.reorder_sections(&[f.a, f.a]), f.tree);
        assert_eq!(f.tree.reorder_sections(&[f.a, SectionId::new()]), f.tree);
    }

    #[test]
    fn test_add_lecture_sets_order_and_owner() {
        let f = fixture();
        let b2 = LectureId::new();
        let tree = f.tree.add_lecture(f.b, b2, &titled("b2"));

        let lecture = tree.lecture(b2).unwrap();
        assert_eq!(lecture.order(), 1);
        assert_eq!(lecture.section_id(), f.b);
        assert_eq!(lecture.title(), "b2");
    }

    #[test]
    fn test_update_lecture_trusts_nesting() {
        let f = fixture();
        let tree = f.tree.update_lecture(f.b1, &LecturePatch {
            title: Some("Welcome".into()),
            is_preview: Some(true),
            ..Default::default()
        });

        let b1 = tree.lecture(f.b1).unwrap();
        assert_eq!(b1.title(), "Welcome");
        assert!(b1.is_preview());
        assert_eq!(b1.duration(), 5);
    }

    #[test]
    fn test_delete_lecture_renumbers_siblings() {
        let f = fixture();
        let extra: Vec<LectureId> = (0..4).map(|_| LectureId::new()).collect();
        let mut tree = f.tree.clone();
        for id in &extra {
            tree = tree.add_lecture(f.a, *id, &titled("x"));
        }

        let n = tree.section(f.a).unwrap().lectures().len();
        for k in 0..n {
            let victim = tree.section(f.a).unwrap().lectures()[k].id();
            let after = tree.delete_lecture(victim);
            assert_eq!(after.section(f.a).unwrap().lectures().len(), n - 1);
            assert_eq!(
                lecture_orders(&after, f.a),
                (0..(n - 1) as u32).collect::<Vec<_>>()
            );
            after.verify().unwrap();
        }
    }

    #[test]
    fn test_move_within_section_round_trip() {
        let f = fixture();
        let mut tree = f.tree.clone();
        for _ in 0..3 {
            tree = tree.add_lecture(f.a, LectureId::new(), &titled("x"));
        }
        let original = lecture_ids(&tree, f.a);
        let n = original.len();

        for a in 0..n {
            for b in 0..n {
                let moved = tree.move_lecture_within_section(f.a, a, b);
                moved.verify().unwrap();
                assert_eq!(lecture_ids(&moved, f.a)[b], original[a]);

                let back = moved.move_lecture_within_section(f.a, b, a);
                assert_eq!(lecture_ids(&back, f.a), original);
            }
        }
    }

    #[test]
    fn test_move_within_same_index_is_identity() {
        let f = fixture();
        assert_eq!(f.tree.move_lecture_within_section(f.a, 1, 1), f.tree);
    }

    #[test]
    fn test_move_a2_into_b_at_front() {
        let f = fixture();
        let tree = f.tree.move_lecture_across_sections(f.a2, f.a, f.b, 0);

        assert_eq!(lecture_ids(&tree, f.a), vec![f.a1]);
        assert_eq!(lecture_orders(&tree, f.a), vec![0]);
        assert_eq!(lecture_ids(&tree, f.b), vec![f.a2, f.b1]);
        assert_eq!(lecture_orders(&tree, f.b), vec![0, 1]);
        assert_eq!(tree.lecture(f.a2).unwrap().section_id(), f.b);
        tree.verify().unwrap();
    }

    #[test]
    fn test_move_across_conserves_lectures() {
        let f = fixture();
        let before_a = f.tree.section(f.a).unwrap().lectures().len();
        let before_b = f.tree.section(f.b).unwrap().lectures().len();

        for target in 0..4 {
            let tree = f.tree.move_lecture_across_sections(f.a1, f.a, f.b, target);
            assert_eq!(tree.lecture_count(), f.tree.lecture_count());
            assert_eq!(tree.section(f.a).unwrap().lectures().len(), before_a - 1);
            assert_eq!(tree.section(f.b).unwrap().lectures().len(), before_b + 1);
            assert_eq!(
                tree.locate_lecture(f.a1),
                Some((1, target.min(before_b)))
            );
            tree.verify().unwrap();
        }
    }

    #[test]
    fn test_move_across_same_section_degrades_to_within() {
        let f = fixture();
        let tree = f.tree.move_lecture_across_sections(f.a1, f.a, f.a, 1);
        assert_eq!(lecture_ids(&tree, f.a), vec![f.a2, f.a1]);
        assert_eq!(tree, f.tree.move_lecture_within_section(f.a, 0, 1));
    }

    #[test]
    fn test_move_across_ignores_stale_source() {
        let f = fixture();
        // b1 does not live in A
        assert_eq!(f.tree.move_lecture_across_sections(f.b1, f.a, f.b, 0), f.tree);
    }

    #[test]
    fn test_unknown_ids_leave_tree_untouched() {
        let f = fixture();
        let ghost_section = SectionId::new();
        let ghost_lecture = LectureId::new();
        let patch = SectionPatch {
            title: Some("x".into()),
            description: None,
        };

        assert_eq!(f.tree.update_section(ghost_section, &patch), f.tree);
        assert_eq!(f.tree.delete_section(ghost_section), f.tree);
        assert_eq!(f.tree.add_lecture(ghost_section, LectureId::new(), &titled("x")), f.tree);
        assert_eq!(f.tree.update_lecture(ghost_lecture, &LecturePatch::default()), f.tree);
        assert_eq!(f.tree.delete_lecture(ghost_lecture), f.tree);
        assert_eq!(f.tree.move_lecture_within_section(ghost_section, 0, 1), f.tree);
        assert_eq!(
            f.tree.move_lecture_across_sections(ghost_lecture, f.a, f.b, 0),
            f.tree
        );
        assert_eq!(
            f.tree.move_lecture_across_sections(f.a1, f.a, ghost_section, 0),
            f.tree
        );
    }

    #[test]
    fn test_every_reachable_tree_keeps_invariants() {
        let f = fixture();
        let mut tree = f.tree.clone();
        let mut sections = vec![f.a, f.b];

        for step in 0..60usize {
            let s = sections[step % sections.len()];
            let other = sections[(step + 1) % sections.len()];
            tree = match step % 6 {
                0 => tree.add_lecture(s, LectureId::new(), &titled("n")),
                1 => {
                    let id = SectionId::new();
                    sections.push(id);
                    tree.add_section(id)
                }
                2 => match tree.section(s).and_then(|x| x.lectures().first()) {
                    Some(l) => tree.move_lecture_across_sections(l.id(), s, other, step),
                    None => tree,
                },
                3 => tree.move_lecture_within_section(s, step % 3, step % 2),
                4 => {
                    let mut order = tree.sections().iter().map(|x| x.id()).collect::<Vec<_>>();
                    order.rotate_left(1);
                    tree.reorder_sections(&order)
                }
                _ => match tree.section(other).and_then(|x| x.lectures().last()) {
                    Some(l) => tree.delete_lecture(l.id()),
                    None => tree,
                },
            };
            tree.verify().unwrap();
        }
    }

    #[test]
    fn test_normalized_repairs_loaded_tree() {
        let f = fixture();
        let mut json = serde_json::to_value(&f.tree).unwrap();
        json["sections"][0]["order"] = serde_json::json!(7);
        json["sections"][1]["lectures"][0]["section_id"] = serde_json::json!(f.a);
        json["sections"][0]["lectures"][1]["duration"] = serde_json::json!(900);

        let loaded: CurriculumTree = serde_json::from_value(json).unwrap();
        assert_eq!(
            loaded.verify(),
            Err(CurriculumError::SectionOrder {
                section: f.a,
                expected: 0,
                found: 7,
            })
        );

        let repaired = loaded.normalized();
        repaired.verify().unwrap();
        assert_eq!(repaired.lecture(f.b1).unwrap().section_id(), f.b);
        assert_eq!(repaired.lecture(f.a2).unwrap().duration(), 600);
    }

    #[test]
    fn test_verify_reports_duplicates() {
        let f = fixture();
        let mut json = serde_json::to_value(&f.tree).unwrap();
        let copy = json["sections"][0]["lectures"][0].clone();
        json["sections"][1]["lectures"]
            .as_array_mut()
            .unwrap()
            .push(copy);

        let loaded: CurriculumTree = serde_json::from_value(json).unwrap();
        assert_eq!(
            loaded.normalized().verify(),
            Err(CurriculumError::DuplicateLectureId(f.a1))
        );
    }
}
