//! Ordered list of reasons.
//!
//! A reason's `reason_id` is its display position. Every operation leaves
//! the list numbered densely `1..=N` in display order, with no gaps or
//! duplicates.

use super::{ContentError, ReasonItem};

/// Reasons held in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonList {
    items: Vec<ReasonItem>,
}

impl ReasonList {
    /// Build from stored items, sorting by `reason_id` and renumbering.
    #[must_use]
    pub fn new(mut items: Vec<ReasonItem>) -> Self {
        items.sort_by_key(|r| r.reason_id);
        let mut list = Self { items };
        list.renumber();
        list
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[ReasonItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<ReasonItem> {
        self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a blank reason numbered one past the current maximum.
    pub fn add(&mut self) {
        let next = self.items.iter().map(|r| r.reason_id).max().unwrap_or(0) + 1;
        self.items.push(ReasonItem {
            reason_id: next,
            ..ReasonItem::default()
        });
    }

    /// Remove the reason at `index` (0-based) and renumber the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NoSuchItem`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<ReasonItem, ContentError> {
        if index >= self.items.len() {
            return Err(ContentError::NoSuchItem(index));
        }
        let removed = self.items.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move the reason at `index` (0-based) to display position `order`
    /// (1-based, clamped to `1..=N`), then renumber.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NoSuchItem`] if `index` is out of range.
    pub fn set_order(&mut self, index: usize, order: u32) -> Result<(), ContentError> {
        if index >= self.items.len() {
            return Err(ContentError::NoSuchItem(index));
        }
        let target = self.clamp_position(order);
        let item = self.items.remove(index);
        self.items.insert(target, item);
        self.renumber();
        Ok(())
    }

    /// Apply the orders typed into the editor, one per item in current
    /// display order. `None` (a blank or non-numeric box) keeps the item
    /// at its current position.
    ///
    /// Items whose requested order equals their position stay put relative
    /// to each other. An item moved up lands before the item already at its
    /// target, an item moved down lands after it. The result is renumbered.
    pub fn apply_requested_orders(&mut self, requested: &[Option<u32>]) {
        let count = self.items.len();
        let mut keyed: Vec<(usize, u8, ReasonItem)> = self
            .items
            .drain(..)
            .enumerate()
            .map(|(index, item)| {
                let current = index + 1;
                let wanted = requested
                    .get(index)
                    .copied()
                    .flatten()
                    .map_or(current, |order| usize::try_from(order).unwrap_or(usize::MAX));
                let wanted = wanted.clamp(1, count);
                let tie_break = match wanted.cmp(&current) {
                    std::cmp::Ordering::Less => 0,
                    std::cmp::Ordering::Equal => 1,
                    std::cmp::Ordering::Greater => 2,
                };
                (wanted, tie_break, item)
            })
            .collect();

        keyed.sort_by_key(|(wanted, tie_break, _)| (*wanted, *tie_break));
        self.items = keyed.into_iter().map(|(_, _, item)| item).collect();
        self.renumber();
    }

    /// Mutable access to the item at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ReasonItem> {
        self.items.get_mut(index)
    }

    fn clamp_position(&self, order: u32) -> usize {
        let order = usize::try_from(order).unwrap_or(usize::MAX);
        order.clamp(1, self.items.len().max(1)) - 1
    }

    fn renumber(&mut self) {
        for (position, item) in (1..).zip(self.items.iter_mut()) {
            item.reason_id = position;
        }
    }
}
