//! Sequence of identified items whose `order` field always mirrors array position.
//!
//! Every function here finishes with [`renumber`], which is the only place an
//! `order` value is ever written.

pub(crate) trait Ordered {
    type Id: PartialEq + Copy;

    fn id(&self) -> Self::Id;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

pub(crate) fn renumber<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32);
    }
}

pub(crate) fn position_of<T: Ordered>(items: &[T], id: T::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Inserts `item` at `index` clamped to `[0, len]`, returning the index actually used.
pub(crate) fn insert_at<T: Ordered>(items: &mut Vec<T>, index: usize, item: T) -> usize {
    let index = index.min(items.len());
    items.insert(index, item);
    renumber(items);
    index
}

/// Removes the item with `id`. `None` means nothing matched and the list is untouched.
pub(crate) fn remove_by_id<T: Ordered>(items: &mut Vec<T>, id: T::Id) -> Option<T> {
    let index = position_of(items, id)?;
    let removed = items.remove(index);
    renumber(items);
    Some(removed)
}

/// Moves the item at `from` so that it ends up at `to`. The target index is read
/// against the list after removal and clamped to its end. Returns `false` when the
/// list was left as it was.
pub(crate) fn move_within<T: Ordered>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }

    let to = to.min(items.len() - 1);
    if from == to {
        return false;
    }

    let item = items.remove(from);
    items.insert(to, item);
    renumber(items);
    true
}

/// First item whose `order` differs from its position, as `(id, expected, found)`.
pub(crate) fn first_out_of_order<T: Ordered>(items: &[T]) -> Option<(T::Id, u32, u32)> {
    items
        .iter()
        .enumerate()
        .find(|(index, item)| item.order() != *index as u32)
        .map(|(index, item)| (item.id(), index as u32, item.order()))
}
