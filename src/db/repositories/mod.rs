mod activities;
mod appointments;
mod contacts;
mod medications;

/// SQLite treats a negative LIMIT as "no limit".
fn sql_limit(limit: Option<usize>) -> i64 {
    limit
        .and_then(|n| i64::try_from(n).ok())
        .unwrap_or(-1)
}
