use rusqlite::{params, Connection};

use crate::db::DatabaseError;

/// Record one API access in the audit_log table.
pub fn insert_audit_entry(
    conn: &Connection,
    actor: &str,
    action: &str,
    status: u16,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO audit_log (actor, action, status) VALUES (?1, ?2, ?3)",
        params![actor, action, status],
    )?;
    Ok(())
}

/// Prune audit entries older than the given number of days.
pub fn prune_audit_log(conn: &Connection, retention_days: i64) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM audit_log WHERE timestamp < datetime('now', ?1)",
        params![format!("-{retention_days} days")],
    )?;
    Ok(deleted)
}

/// Most recent audit entries as (timestamp, actor, action, status), newest first.
#[cfg(test)]
pub fn recent_audit_entries(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<(String, String, String, u16)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT timestamp, actor, action, status FROM audit_log
         ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u16>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
