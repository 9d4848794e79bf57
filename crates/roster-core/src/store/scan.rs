//! Scan-based evaluation of read queries.
//!
//! Stores that hold rows locally feed their left-join iterator through these
//! functions, so filtering, ordering and windowing behave the same in every
//! store.

use std::cmp::Ordering;

use roster_proto::{Filter, NullOrdering, OrderDirection, OrderSpec, ReadQuery, Window};

use super::{FilterEvaluator, JoinedRow};
use crate::error::Error;

/// Evaluate `query` over a stream of joined rows in store-native order.
///
/// Without an ordering the window is applied while streaming; with one, all
/// matching rows are collected and stably sorted first, so ties keep their
/// store-native order.
pub fn execute_read<I>(rows: I, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error>
where
    I: IntoIterator<Item = Result<JoinedRow, Error>>,
{
    let mut matching = rows.into_iter().filter(|result| match result {
        Ok(row) => FilterEvaluator::matches(&query.filter, row),
        Err(_) => true,
    });

    if query.order_by.is_empty() {
        let Some(Window { offset, limit }) = query.window else {
            return matching.collect();
        };

        let mut skipped = 0u64;
        let mut page = Vec::with_capacity(limit.min(1024) as usize);
        while page.len() < limit as usize {
            let Some(row) = matching.next() else {
                break;
            };
            let row = row?;
            if skipped < offset {
                skipped += 1;
                continue;
            }
            page.push(row);
        }
        return Ok(page);
    }

    let mut rows = matching.collect::<Result<Vec<_>, _>>()?;
    sort_rows(&mut rows, &query.order_by);
    if let Some(window) = query.window {
        apply_window(&mut rows, window);
    }
    Ok(rows)
}

/// Count the rows of a joined stream that match `filter`.
pub fn count_matching<I>(rows: I, filter: &Filter) -> Result<u64, Error>
where
    I: IntoIterator<Item = Result<JoinedRow, Error>>,
{
    let mut count = 0u64;
    for row in rows {
        if FilterEvaluator::matches(filter, &row?) {
            count += 1;
        }
    }
    Ok(count)
}

/// Sort rows according to order specifications.
///
/// An explicit null placement holds regardless of direction.
fn sort_rows(rows: &mut [JoinedRow], order_by: &[OrderSpec]) {
    rows.sort_by(|a, b| {
        for spec in order_by {
            let (left, right) = (a.value(spec.column), b.value(spec.column));

            let cmp = match (spec.nulls, left.is_null(), right.is_null()) {
                (Some(NullOrdering::First), true, false) => Ordering::Less,
                (Some(NullOrdering::First), false, true) => Ordering::Greater,
                (Some(NullOrdering::Last), true, false) => Ordering::Greater,
                (Some(NullOrdering::Last), false, true) => Ordering::Less,
                _ => match spec.direction {
                    OrderDirection::Asc => left.sort_cmp(&right),
                    OrderDirection::Desc => left.sort_cmp(&right).reverse(),
                },
            };

            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

/// Apply an offset/limit window in place.
fn apply_window(rows: &mut Vec<JoinedRow>, window: Window) {
    let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
    if offset >= rows.len() {
        rows.clear();
        return;
    }
    rows.drain(0..offset);
    rows.truncate(window.limit as usize);
}
