//! Row renumbering for field moves and removals.
//!
//! Reindexing is two-phase: build an old-to-new row map for the structural
//! change, then rewrite every error's row references through it. Neither
//! phase touches the field list itself.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::exception::FieldError;

/// Old row index to new row index.
pub type ReindexMap = BTreeMap<usize, usize>;

/// Where each row of a `len`-row list lands when the row at `source` is moved
/// to `dest`.
///
/// The new order is built by walking the old rows once, skipping the moved
/// row and inserting it when the walk reaches `dest`: before the displaced
/// row when moving up, after it when moving down.
pub fn compute_reindex_map(len: usize, source: usize, dest: usize) -> Result<ReindexMap> {
    check_row(source, len)?;
    check_row(dest, len)?;
    if source == dest {
        return Ok((0..len).map(|row| (row, row)).collect());
    }

    let mut map = ReindexMap::new();
    let mut next = 0;
    for old in 0..len {
        if old == source {
            continue;
        }
        if old == dest && source > dest {
            map.insert(source, next);
            next += 1;
        }
        map.insert(old, next);
        next += 1;
        if old == dest && source < dest {
            map.insert(source, next);
            next += 1;
        }
    }
    Ok(map)
}

/// Where each row of a `len`-row list lands when the row at `removed` is
/// deleted. The removed row has no entry.
pub fn removal_map(len: usize, removed: usize) -> Result<ReindexMap> {
    check_row(removed, len)?;
    Ok((0..len)
        .filter(|old| *old != removed)
        .map(|old| (old, if old > removed { old - 1 } else { old }))
        .collect())
}

/// Rewrite row references through `map`.
///
/// Rows without an entry in the map are dropped. Errors are never dropped
/// here, even when they end up with no rows.
pub fn apply_reindex(errors: &[FieldError], map: &ReindexMap) -> Vec<FieldError> {
    errors
        .iter()
        .map(|error| FieldError {
            row_indexes: error
                .row_indexes
                .iter()
                .filter_map(|row| map.get(row).copied())
                .collect(),
            ..error.clone()
        })
        .collect()
}

/// Reorder `items` so each element lands at the row `map` assigns it.
///
/// `map` must be a bijection over `0..items.len()`, as produced by
/// [`compute_reindex_map`].
pub fn permute<T: Clone>(items: &[T], map: &ReindexMap) -> Vec<T> {
    let mut slots: Vec<Option<T>> = vec![None; items.len()];
    for (old, new) in map {
        if let (Some(item), Some(slot)) = (items.get(*old), slots.get_mut(*new)) {
            *slot = Some(item.clone());
        }
    }
    slots.into_iter().flatten().collect()
}

/// Move the element at `source` to `dest`.
pub fn move_item<T: Clone>(items: &[T], source: usize, dest: usize) -> Result<Vec<T>> {
    let map = compute_reindex_map(items.len(), source, dest)?;
    Ok(permute(items, &map))
}

fn check_row(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ModelError::RowOutOfRange { index, len })
    }
}
