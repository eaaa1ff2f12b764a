use std::collections::{BTreeMap, HashMap};

use crate::models::{LimitRepresentative, MatrixRow, MergedRow, NewAccountRow};

/// Keeps the first New-Accounts row per code, in sheet order.
pub fn dedupe_new_accounts(rows: &[NewAccountRow]) -> HashMap<u64, &NewAccountRow> {
    let mut by_code: HashMap<u64, &NewAccountRow> = HashMap::new();
    let mut dropped = 0usize;
    for row in rows {
        let Some(code) = row.code else { continue };
        if by_code.contains_key(&code) {
            dropped += 1;
        } else {
            by_code.insert(code, row);
        }
    }
    if dropped > 0 {
        log::warn!("New-Accounts: {dropped} duplicate rows ignored (first row per code kept)");
    }
    by_code
}

/// Left join anchored on the matrix: one output row per matrix row.
pub fn merge_sources(
    matrix: &[MatrixRow],
    new_accounts: &[NewAccountRow],
    limit_reps: &BTreeMap<u64, LimitRepresentative>,
) -> Vec<MergedRow> {
    let signups = dedupe_new_accounts(new_accounts);

    matrix
        .iter()
        .map(|m| {
            let signup = m.code.and_then(|c| signups.get(&c));
            let rep = m.code.and_then(|c| limit_reps.get(&c));
            MergedRow {
                code: m.code,
                current_limit: m.current_limit,
                payment_frequency: m.payment_frequency,
                matrix_signup_date: m.signup_date,
                signup_date: signup.and_then(|s| s.signup_date),
                signup_limit: signup.and_then(|s| s.signup_limit),
                limit_date: rep.and_then(|r| r.date),
                limit_amount: rep.and_then(|r| r.limit),
                verification_date: m.verification_date,
            }
        })
        .collect()
}
