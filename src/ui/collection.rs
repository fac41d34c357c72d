use std::collections::HashSet;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::ui::ControlKey;

/// Told about every control entering or leaving a collection.
/// Moving a control inside the same collection is neither.
pub trait MembershipObserver {
    fn attached(&mut self, key: ControlKey);
    fn detached(&mut self, key: ControlKey);
}

/// Ordered child list of a container. A control appears at most once; adding one that is
/// already present moves it instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlCollection {
    items: Vec<ControlKey>,
}

impl ControlCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ControlKey> {
        self.items.get(index).copied()
    }

    pub fn contains(&self, key: ControlKey) -> bool {
        self.items.contains(&key)
    }

    pub fn position(&self, key: ControlKey) -> Option<usize> {
        self.items.iter().position(|&item| item == key)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ControlKey> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ControlKey] {
        &self.items
    }

    /// Fails the way [`ControlCollection::insert`] would, without touching anything.
    pub fn check_insert(&self, index: usize, key: ControlKey) -> Result<()> {
        let len = self.items.len() - usize::from(self.contains(key));
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    pub fn check_insert_all(&self, index: usize, keys: &[ControlKey]) -> Result<()> {
        let len = self.items.iter().filter(|item| !keys.contains(item)).count();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    pub fn check_set(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Appends `key`, or sends it to the end when already present.
    pub fn add(&mut self, key: ControlKey, observer: &mut impl MembershipObserver) {
        if !self.take_existing(key) {
            observer.attached(key);
        }
        self.items.push(key);
    }

    /// Inserts at `index`. A present control is removed first, so `index` counts the
    /// remaining controls.
    pub fn insert(
        &mut self,
        index: usize,
        key: ControlKey,
        observer: &mut impl MembershipObserver,
    ) -> Result<()> {
        self.check_insert(index, key)?;
        if self.contains(key) {
            self.take_existing(key);
        } else {
            observer.attached(key);
        }
        self.items.insert(index, key);
        Ok(())
    }

    /// Appends all `keys`; duplicates in the input keep their first occurrence.
    pub fn extend(
        &mut self,
        keys: impl IntoIterator<Item = ControlKey>,
        observer: &mut impl MembershipObserver,
    ) {
        let unique = self.prepare_many(keys, observer);
        self.items.extend(unique);
    }

    /// Inserts all `keys` at `index`, with the same rules as [`ControlCollection::extend`].
    pub fn insert_all(
        &mut self,
        index: usize,
        keys: impl IntoIterator<Item = ControlKey>,
        observer: &mut impl MembershipObserver,
    ) -> Result<()> {
        let unique = unique(keys);
        self.check_insert_all(index, &unique)?;
        let unique = self.prepare_many(unique, observer);
        self.items.splice(index..index, unique);
        Ok(())
    }

    /// Puts `key` at `index` and returns the control that was there.
    ///
    /// A present control is moved to `index`, shifting the others; an absent one replaces the
    /// old occupant, which is detached.
    pub fn set(
        &mut self,
        index: usize,
        key: ControlKey,
        observer: &mut impl MembershipObserver,
    ) -> Result<ControlKey> {
        self.check_set(index)?;
        let replaced = self.items[index];
        if self.contains(key) {
            self.take_existing(key);
            self.items.insert(index, key);
        } else {
            self.items[index] = key;
            observer.detached(replaced);
            observer.attached(key);
        }
        Ok(replaced)
    }

    pub fn remove(&mut self, key: ControlKey, observer: &mut impl MembershipObserver) -> bool {
        let removed = self.take_existing(key);
        if removed {
            observer.detached(key);
        }
        removed
    }

    pub fn remove_at(
        &mut self,
        index: usize,
        observer: &mut impl MembershipObserver,
    ) -> Result<ControlKey> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let key = self.items.remove(index);
        observer.detached(key);
        Ok(key)
    }

    /// Removes a contiguous run of controls.
    pub fn remove_range(
        &mut self,
        range: Range<usize>,
        observer: &mut impl MembershipObserver,
    ) -> Result<Vec<ControlKey>> {
        let len = self.items.len();
        if range.start > range.end || range.end > len {
            return Err(Error::IndexOutOfBounds {
                index: range.end.max(range.start),
                len,
            });
        }
        let removed: Vec<_> = self.items.drain(range).collect();
        for &key in &removed {
            observer.detached(key);
        }
        Ok(removed)
    }

    pub fn remove_all(
        &mut self,
        keys: impl IntoIterator<Item = ControlKey>,
        observer: &mut impl MembershipObserver,
    ) -> usize {
        let doomed = unique(keys);
        self.retain(|key| !doomed.contains(&key), observer)
    }

    /// Keeps the controls for which `keep` holds. Returns how many were removed.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(ControlKey) -> bool,
        observer: &mut impl MembershipObserver,
    ) -> usize {
        let before = self.items.len();
        let mut detached = Vec::new();
        self.items.retain(|&key| {
            let kept = keep(key);
            if !kept {
                detached.push(key);
            }
            kept
        });
        for key in detached {
            observer.detached(key);
        }
        before - self.items.len()
    }

    pub fn clear(&mut self, observer: &mut impl MembershipObserver) {
        for key in self.items.drain(..) {
            observer.detached(key);
        }
    }

    fn take_existing(&mut self, key: ControlKey) -> bool {
        match self.position(key) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn prepare_many(
        &mut self,
        keys: impl IntoIterator<Item = ControlKey>,
        observer: &mut impl MembershipObserver,
    ) -> Vec<ControlKey> {
        let unique = unique(keys);
        for &key in &unique {
            if !self.take_existing(key) {
                observer.attached(key);
            }
        }
        unique
    }
}

fn unique(keys: impl IntoIterator<Item = ControlKey>) -> Vec<ControlKey> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|key| seen.insert(*key)).collect()
}

impl<'a> IntoIterator for &'a ControlCollection {
    type Item = &'a ControlKey;
    type IntoIter = std::slice::Iter<'a, ControlKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
