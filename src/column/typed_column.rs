use std::sync::Arc;

use crate::column::common::BitMask;

/// Structure representing a typed column with an optional NULL mask.
///
/// NULL slots hold `T::default()` in `data`; readers must consult the mask.
#[derive(Debug, Clone)]
pub struct TypedColumn<T> {
    pub(crate) data: Arc<[T]>,
    pub(crate) null_mask: Option<BitMask>,
}

impl<T: Clone + Default> TypedColumn<T> {
    /// Create a column with no NULL values
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
        }
    }

    /// Create a column from optional values, `None` becoming NULL
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<T> = values.into_iter().map(Option::unwrap_or_default).collect();

        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(BitMask::from_bools(&nulls))
        } else {
            None
        };

        Self {
            data: data.into(),
            null_mask,
        }
    }
}

impl<T> TypedColumn<T> {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the row holds NULL (out-of-range rows count as NULL)
    pub fn is_null(&self, index: usize) -> bool {
        if index >= self.data.len() {
            return true;
        }
        self.null_mask
            .as_ref()
            .map(|mask| mask.is_set(index))
            .unwrap_or(false)
    }

    /// Value at `index`, or `None` for NULL and out-of-range rows
    pub fn value(&self, index: usize) -> Option<&T> {
        if self.is_null(index) {
            None
        } else {
            self.data.get(index)
        }
    }

    /// Number of NULL rows
    pub fn null_count(&self) -> usize {
        self.null_mask.as_ref().map(BitMask::count_ones).unwrap_or(0)
    }

    /// Iterates all rows in storage order
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        (0..self.data.len()).map(move |i| self.value(i))
    }
}
