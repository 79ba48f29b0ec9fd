//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The engine calls repository methods; it never executes SQL directly.

use crate::{
    audit::AuditLogEntry,
    customer::Customer,
    error::DiscountResult,
    repository::LoyaltyRepository,
};
use rusqlite::{Connection, Transaction};

mod audit;
mod customer;

pub struct LoyaltyStore {
    conn: Connection,
}

impl LoyaltyStore {
    pub fn open(path: &str) -> DiscountResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!("store: opened {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DiscountResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DiscountResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_customers.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_audit_log.sql"))?;
        Ok(())
    }

    /// Begin a unit of work. Dropping the session without `commit` rolls back.
    pub fn session(&mut self) -> DiscountResult<Session<'_>> {
        Ok(Session {
            tx: self.conn.transaction()?,
        })
    }

    /// Run `f` inside a session: commit on `Ok`, roll back on `Err`.
    pub fn with_session<T, F>(&mut self, f: F) -> DiscountResult<T>
    where
        F: FnOnce(&Session<'_>) -> DiscountResult<T>,
    {
        let session = self.session()?;
        match f(&session) {
            Ok(value) => {
                session.commit()?;
                Ok(value)
            }
            Err(e) => {
                log::debug!("store: rolling back session: {e}");
                session.rollback()?;
                Err(e)
            }
        }
    }

    // ── Read-only helpers outside a session ──────────────────────

    pub fn count_audit_logs(&self, customer_id: &str) -> DiscountResult<u64> {
        audit::count_for_customer(&self.conn, customer_id)
    }

    pub fn customer_count(&self) -> DiscountResult<u64> {
        customer::count(&self.conn)
    }
}

/// One open transaction. The only production LoyaltyRepository.
pub struct Session<'s> {
    tx: Transaction<'s>,
}

impl Session<'_> {
    pub fn commit(self) -> DiscountResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> DiscountResult<()> {
        self.tx.rollback()?;
        Ok(())
    }

    pub fn insert_customer(&self, c: &Customer) -> DiscountResult<()> {
        customer::insert(&self.tx, c)
    }

    pub fn customer_ids(&self) -> DiscountResult<Vec<String>> {
        customer::all_ids(&self.tx)
    }

    /// A random persisted customer id, or None when the table is empty.
    pub fn random_customer_id(&self) -> DiscountResult<Option<String>> {
        customer::random_id(&self.tx)
    }

    /// Audit rows for `customer_id`, oldest first.
    pub fn audit_entries_for_customer(&self, customer_id: &str) -> DiscountResult<Vec<AuditLogEntry>> {
        audit::entries_for_customer(&self.tx, customer_id)
    }
}

impl LoyaltyRepository for Session<'_> {
    fn find_customer_by_id(&self, customer_id: &str) -> DiscountResult<Option<Customer>> {
        customer::find_by_id(&self.tx, customer_id)
    }

    fn append_audit_log(&self, entry: &AuditLogEntry) -> DiscountResult<()> {
        audit::append(&self.tx, entry)
    }

    fn count_audit_logs(&self, customer_id: &str) -> DiscountResult<u64> {
        audit::count_for_customer(&self.tx, customer_id)
    }
}
