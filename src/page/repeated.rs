//! Ordered collection of regions materialised from one read

use std::ops::Index;

use super::traits::Region;

/// One region per element matching a locator at read time, in document order
///
/// The collection belongs to the document it was read from. After a
/// navigation transition, read it again.
#[derive(Debug)]
pub struct RepeatedRegion<R> {
    items: Vec<R>,
}

impl<R: Region> RepeatedRegion<R> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&R> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&R> {
        self.items.last()
    }

    pub fn into_vec(self) -> Vec<R> {
        self.items
    }
}

impl<R> FromIterator<R> for RepeatedRegion<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<R> IntoIterator for RepeatedRegion<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a RepeatedRegion<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<R> Index<usize> for RepeatedRegion<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.items[index]
    }
}
