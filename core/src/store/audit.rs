use crate::{audit::AuditLogEntry, error::DiscountResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

pub(super) fn append(conn: &Connection, entry: &AuditLogEntry) -> DiscountResult<()> {
    conn.execute(
        "INSERT INTO discount_audit_log (
            entry_id, customer_id, discount_bps, raw_bps, bonuses, recorded_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.entry_id,
            entry.customer_id,
            entry.discount_bps as i64,
            entry.raw_bps as i64,
            serde_json::to_string(&entry.bonuses)?,
            entry.recorded_at_text(),
        ],
    )?;
    Ok(())
}

pub(super) fn count_for_customer(conn: &Connection, customer_id: &str) -> DiscountResult<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM discount_audit_log WHERE customer_id = ?1",
        params![customer_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

pub(super) fn entries_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> DiscountResult<Vec<AuditLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, entry_id, customer_id, discount_bps, raw_bps, bonuses, recorded_at
         FROM discount_audit_log WHERE customer_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![customer_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut entries = Vec::with_capacity(rows.len());
    for (id, entry_id, customer_id, discount_bps, raw_bps, bonuses, recorded_at) in rows {
        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(|e| anyhow::anyhow!("audit row {id}: bad recorded_at '{recorded_at}': {e}"))?
            .with_timezone(&Utc);
        entries.push(AuditLogEntry {
            id: Some(id),
            entry_id,
            customer_id,
            discount_bps: discount_bps as u32,
            raw_bps: raw_bps as u32,
            bonuses: serde_json::from_str(&bonuses)?,
            recorded_at,
        });
    }
    Ok(entries)
}
