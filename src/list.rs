//! Ordered-sequence extensions.
//!
//! Kinds whose value is a sequence implement [`ListKind`]; every
//! [`Extension`] of such a kind then gets the list operations of
//! [`OrderedValueOps`] as well as `Index`/`IndexMut` over items and ranges.
//! Order and duplicates are always preserved.

use core::fmt;
use core::ops::{Bound, Index, IndexMut, Range, RangeBounds};
use core::slice::SliceIndex;

use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};
use crate::general_name::IntoItem;

/// Kind whose value is an ordered sequence of items.
pub trait ListKind: Kind {
    /// Element of the sequence.
    type Item: Clone + fmt::Debug + PartialEq;

    /// Borrow the items of a value.
    fn items(value: &Self::Value) -> &[Self::Item];

    /// Mutably borrow the items of a value.
    fn items_mut(value: &mut Self::Value) -> &mut Vec<Self::Item>;

    /// Text form of one item.
    fn format_item(item: &Self::Item) -> String;
}

/// Comma-joined items, as used by `Display`.
pub(crate) fn fmt_items<K: ListKind>(value: &K::Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in K::items(value).iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(&K::format_item(item))?;
    }
    Ok(())
}

/// Debug-style list of item text forms: `["DNS:a", "DNS:b"]`.
pub(crate) fn fmt_item_list<T>(
    items: &[T],
    format: impl Fn(&T) -> String,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.debug_list().entries(items.iter().map(format)).finish()
}

/// One `* item` line per item.
pub(crate) fn items_as_text<K: ListKind>(value: &K::Value) -> String {
    K::items(value)
        .iter()
        .map(|item| format!("* {}", K::format_item(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `a=[..], b=[..]` rendering of values made of several named lists.
pub(crate) fn fmt_named_lists<T>(
    lists: &[(&str, &[T])],
    format: impl Fn(&T) -> String + Copy,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (i, (name, items)) in lists.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}=")?;
        fmt_item_list(items, format, f)?;
    }
    Ok(())
}

/// One titled section per non-empty list, items indented as `  * item`.
pub(crate) fn sections_as_text<T>(sections: &[(&str, &[T])], format: impl Fn(&T) -> String) -> String {
    let mut text = String::new();
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        text.push_str(title);
        text.push_str(":\n");
        for item in *items {
            text.push_str("  * ");
            text.push_str(&format(item));
            text.push('\n');
        }
    }
    text
}

pub(crate) fn parse_items<T, I, V>(items: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = V>,
    V: IntoItem<T>,
{
    items.into_iter().map(IntoItem::into_item).collect()
}

/// Clamp a range to `0..len`, the way slice assignment treats out-of-range bounds.
fn clamp_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    }
    .min(len);

    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    }
    .clamp(start, len);

    start..end
}

/// Sequence operations on list-valued extensions.
///
/// Items may be passed in text form or already parsed.
pub trait OrderedValueOps {
    /// Element of the sequence.
    type Item;

    /// Number of items.
    fn len(&self) -> usize;

    /// Borrow all items.
    fn items(&self) -> &[Self::Item];

    /// Borrow one item.
    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.items().get(index)
    }

    /// Is `item` stored at least once? Unparseable input is never contained.
    fn contains<T: IntoItem<Self::Item>>(&self, item: T) -> bool {
        self.count(item) > 0
    }

    /// Number of times `item` is stored.
    fn count<T: IntoItem<Self::Item>>(&self, item: T) -> usize;

    /// Append one item.
    fn append<T: IntoItem<Self::Item>>(&mut self, item: T) -> Result<()>;

    /// Append several items. Nothing is appended if any item fails to parse.
    fn extend<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<Self::Item>;

    /// Insert an item before `index`. Indices past the end append.
    fn insert<T: IntoItem<Self::Item>>(&mut self, index: usize, item: T) -> Result<()>;

    /// Remove the first occurrence of `item`.
    fn remove<T: IntoItem<Self::Item>>(&mut self, item: T) -> Result<()>;

    /// Remove and return the last item.
    fn pop(&mut self) -> Option<Self::Item>;

    /// Remove every item.
    fn clear(&mut self);

    /// Replace the item at `index`.
    fn set<T: IntoItem<Self::Item>>(&mut self, index: usize, item: T) -> Result<()>;

    /// Remove and return the item at `index`.
    fn delete(&mut self, index: usize) -> Result<Self::Item>;

    /// Remove a range of items. Out-of-range bounds are clamped.
    fn delete_range<R: RangeBounds<usize>>(&mut self, range: R);

    /// Replace a range of items, which may change the length of the sequence.
    /// Out-of-range bounds are clamped.
    fn splice<R, I, T>(&mut self, range: R, items: I) -> Result<()>
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
        T: IntoItem<Self::Item>;
}

impl<K: ListKind> OrderedValueOps for Extension<K> {
    type Item = K::Item;

    fn len(&self) -> usize {
        K::items(self.value()).len()
    }

    fn items(&self) -> &[K::Item] {
        K::items(self.value())
    }

    fn count<T: IntoItem<K::Item>>(&self, item: T) -> usize {
        match item.into_item() {
            Ok(item) => self.items().iter().filter(|i| **i == item).count(),
            Err(_) => 0,
        }
    }

    fn append<T: IntoItem<K::Item>>(&mut self, item: T) -> Result<()> {
        let item = item.into_item()?;
        K::items_mut(self.value_mut()).push(item);
        Ok(())
    }

    fn extend<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoItem<K::Item>,
    {
        let items = parse_items(items)?;
        K::items_mut(self.value_mut()).extend(items);
        Ok(())
    }

    fn insert<T: IntoItem<K::Item>>(&mut self, index: usize, item: T) -> Result<()> {
        let item = item.into_item()?;
        let items = K::items_mut(self.value_mut());
        let index = index.min(items.len());
        items.insert(index, item);
        Ok(())
    }

    fn remove<T: IntoItem<K::Item>>(&mut self, item: T) -> Result<()> {
        let item = item.into_item()?;
        let items = K::items_mut(self.value_mut());
        match items.iter().position(|i| *i == item) {
            Some(index) => {
                items.remove(index);
                Ok(())
            }
            None => Err(Error::ItemNotFound(K::format_item(&item))),
        }
    }

    fn pop(&mut self) -> Option<K::Item> {
        K::items_mut(self.value_mut()).pop()
    }

    fn clear(&mut self) {
        K::items_mut(self.value_mut()).clear();
    }

    fn set<T: IntoItem<K::Item>>(&mut self, index: usize, item: T) -> Result<()> {
        let item = item.into_item()?;
        let items = K::items_mut(self.value_mut());
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = item;
        Ok(())
    }

    fn delete(&mut self, index: usize) -> Result<K::Item> {
        let items = K::items_mut(self.value_mut());
        if index >= items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    fn delete_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let items = K::items_mut(self.value_mut());
        let range = clamp_range(range, items.len());
        items.drain(range);
    }

    fn splice<R, I, T>(&mut self, range: R, items: I) -> Result<()>
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
        T: IntoItem<K::Item>,
    {
        let replacement = parse_items(items)?;
        let items = K::items_mut(self.value_mut());
        let range = clamp_range(range, items.len());
        items.splice(range, replacement);
        Ok(())
    }
}

impl<K, I> Index<I> for Extension<K>
where
    K: ListKind,
    I: SliceIndex<[K::Item]>,
{
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &K::items(self.value())[index]
    }
}

impl<K, I> IndexMut<I> for Extension<K>
where
    K: ListKind,
    I: SliceIndex<[K::Item]>,
{
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut K::items_mut(self.value_mut())[index]
    }
}
