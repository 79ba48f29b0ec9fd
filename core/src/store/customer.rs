use crate::{
    customer::{Customer, LoyaltyLevel},
    error::{DiscountError, DiscountResult},
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn insert(conn: &Connection, c: &Customer) -> DiscountResult<()> {
    conn.execute(
        "INSERT INTO customer (
            customer_id, join_date, total_orders, loyalty_level, has_active_promotion
        ) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            c.id(),
            c.join_date().format(DATE_FORMAT).to_string(),
            c.total_orders() as i64,
            c.loyalty_level().as_str(),
            if c.has_active_promotion() { 1 } else { 0 },
        ],
    )?;
    Ok(())
}

pub(super) fn find_by_id(conn: &Connection, customer_id: &str) -> DiscountResult<Option<Customer>> {
    let row: Option<(String, String, i64, String, i64)> = conn
        .query_row(
            "SELECT customer_id, join_date, total_orders, loyalty_level, has_active_promotion
             FROM customer WHERE customer_id = ?1",
            params![customer_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )
        .optional()?;

    let Some((id, join_date, total_orders, level, promo)) = row else {
        return Ok(None);
    };

    let join_date = NaiveDate::parse_from_str(&join_date, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("customer {id}: bad join_date '{join_date}': {e}"))?;
    let total_orders = u32::try_from(total_orders)
        .map_err(|_| anyhow::anyhow!("customer {id}: total_orders {total_orders} out of range"))?;
    let level: LoyaltyLevel = level.parse()?;

    Customer::new(id, join_date, total_orders, level, promo != 0).map(Some)
}

pub(super) fn all_ids(conn: &Connection) -> DiscountResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT customer_id FROM customer ORDER BY customer_id ASC")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

pub(super) fn random_id(conn: &Connection) -> DiscountResult<Option<String>> {
    conn.query_row(
        "SELECT customer_id FROM customer ORDER BY RANDOM() LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(DiscountError::from)
}

pub(super) fn count(conn: &Connection) -> DiscountResult<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
    Ok(n as u64)
}
