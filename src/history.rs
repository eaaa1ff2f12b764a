use std::collections::BTreeMap;

use crate::models::{LimitHistoryRow, LimitRepresentative};

/// Groups rows by account code, each group sorted by date ascending.
/// Undated rows sort after dated ones; rows without a code are dropped.
pub fn group_by_account(rows: &[LimitHistoryRow]) -> BTreeMap<u64, Vec<LimitHistoryRow>> {
    let mut groups: BTreeMap<u64, Vec<LimitHistoryRow>> = BTreeMap::new();
    for row in rows {
        if let Some(code) = row.code {
            groups.entry(code).or_default().push(row.clone());
        }
    }
    for group in groups.values_mut() {
        group.sort_by_key(|r| (r.date.is_none(), r.date));
    }
    groups
}

/// Carries the last known limit forward through one date-ordered group.
/// Leading gaps stay empty.
pub fn forward_fill_limits(group: &mut [LimitHistoryRow]) {
    let mut last: Option<f64> = None;
    for row in group.iter_mut() {
        match row.authorized_limit {
            Some(limit) => last = Some(limit),
            None => row.authorized_limit = last,
        }
    }
}

/// Earliest record per account whose (filled) limit exceeds `min_limit`.
pub fn reduce_limit_history(
    rows: &[LimitHistoryRow],
    min_limit: f64,
) -> BTreeMap<u64, LimitRepresentative> {
    let mut representatives = BTreeMap::new();
    for (code, mut group) in group_by_account(rows) {
        forward_fill_limits(&mut group);
        let first = group
            .iter()
            .find(|r| r.authorized_limit.is_some_and(|l| l > min_limit));
        if let Some(row) = first {
            representatives.insert(
                code,
                LimitRepresentative {
                    date: row.date,
                    limit: row.authorized_limit,
                },
            );
        }
    }
    log::debug!("limit history: {} accounts with a qualifying authorization", representatives.len());
    representatives
}
