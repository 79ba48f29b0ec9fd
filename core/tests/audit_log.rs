//! Audit trail behaviour: one row per computation, no partial writes.

use chrono::NaiveDate;
use loyalty_core::{
    audit::AuditLogEntry,
    clock::FixedClock,
    config::DiscountConfig,
    customer::{Customer, LoyaltyLevel},
    engine::DiscountEngine,
    error::{DiscountError, DiscountResult},
    repository::LoyaltyRepository,
    store::LoyaltyStore,
};
use std::cell::Cell;

// ── Test helpers ────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn make_engine() -> DiscountEngine<FixedClock> {
    let _ = env_logger::builder().is_test(true).try_init();
    DiscountEngine::with_clock(DiscountConfig::default(), FixedClock::new(today())).unwrap()
}

fn make_store() -> LoyaltyStore {
    let store = LoyaltyStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn basic_customer(id: &str) -> Customer {
    Customer::new(id, today(), 0, LoyaltyLevel::Basic, false).unwrap()
}

/// Repository whose audit writes always fail.
struct BrokenAuditLog {
    attempts: Cell<u32>,
}

impl LoyaltyRepository for BrokenAuditLog {
    fn find_customer_by_id(&self, _customer_id: &str) -> DiscountResult<Option<Customer>> {
        Ok(None)
    }

    fn append_audit_log(&self, _entry: &AuditLogEntry) -> DiscountResult<()> {
        self.attempts.set(self.attempts.get() + 1);
        Err(DiscountError::Database(rusqlite::Error::InvalidQuery))
    }

    fn count_audit_logs(&self, _customer_id: &str) -> DiscountResult<u64> {
        Ok(0)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn zero_discount_still_writes_one_row() {
    let engine = make_engine();
    let mut store = make_store();
    let c = basic_customer("c021");

    let before = store
        .with_session(|s| engine.count_logs_for_customer(s, "c021"))
        .unwrap();
    let discount = store
        .with_session(|s| engine.compute_discount(s, Some(&c)))
        .unwrap();
    let after = store
        .with_session(|s| engine.count_logs_for_customer(s, "c021"))
        .unwrap();

    assert_eq!(discount, 0.0);
    assert_eq!(after - before, 1, "logs before {before}, after {after}");
}

#[test]
fn identical_calls_write_two_rows() {
    let engine = make_engine();
    let mut store = make_store();
    let c = basic_customer("c021");

    store
        .with_session(|s| {
            engine.compute_discount(s, Some(&c))?;
            engine.compute_discount(s, Some(&c))
        })
        .unwrap();

    assert_eq!(store.count_audit_logs("c021").unwrap(), 2);
}

#[test]
fn rows_are_counted_per_customer() {
    let engine = make_engine();
    let mut store = make_store();

    store
        .with_session(|s| {
            engine.compute_discount(s, Some(&basic_customer("c-a")))?;
            engine.compute_discount(s, Some(&basic_customer("c-b")))?;
            engine.compute_discount(s, Some(&basic_customer("c-b")))
        })
        .unwrap();

    assert_eq!(store.count_audit_logs("c-a").unwrap(), 1);
    assert_eq!(store.count_audit_logs("c-b").unwrap(), 2);
    assert_eq!(store.count_audit_logs("c-none").unwrap(), 0);
}

#[test]
fn absent_customer_is_invalid_and_writes_nothing() {
    let engine = make_engine();
    let mut store = make_store();

    let err = store
        .with_session(|s| engine.compute_discount(s, None))
        .unwrap_err();
    assert!(err.is_invalid_argument(), "got {err}");
    assert_eq!(store.count_audit_logs("c021").unwrap(), 0);
}

#[test]
fn failed_unit_of_work_rolls_back_audit_rows() {
    let engine = make_engine();
    let mut store = make_store();
    let c = basic_customer("c021");

    let result: DiscountResult<()> = store.with_session(|s| {
        engine.compute_discount(s, Some(&c))?;
        engine.compute_discount(s, None)?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(store.count_audit_logs("c021").unwrap(), 0);
}

#[test]
fn dropped_session_rolls_back() {
    let engine = make_engine();
    let mut store = make_store();
    let c = basic_customer("c021");

    {
        let session = store.session().unwrap();
        engine.compute_discount(&session, Some(&c)).unwrap();
        assert_eq!(engine.count_logs_for_customer(&session, "c021").unwrap(), 1);
    }

    assert_eq!(store.count_audit_logs("c021").unwrap(), 0);
}

#[test]
fn audit_failure_fails_the_computation() {
    let engine = make_engine();
    let repo = BrokenAuditLog { attempts: Cell::new(0) };

    let err = engine
        .compute_discount(&repo, Some(&basic_customer("c021")))
        .unwrap_err();

    assert!(matches!(err, DiscountError::Database(_)), "got {err}");
    assert_eq!(repo.attempts.get(), 1);
}

#[test]
fn entries_record_breakdown_in_order() {
    let engine = make_engine();
    let mut store = make_store();
    let veteran = Customer::new(
        "c-vip",
        NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
        150,
        LoyaltyLevel::Platinum,
        true,
    )
    .unwrap();

    let entries = store
        .with_session(|s| {
            engine.compute_discount(s, Some(&basic_customer("c-vip")))?;
            engine.compute_discount(s, Some(&veteran))?;
            s.audit_entries_for_customer("c-vip")
        })
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].id < entries[1].id);
    assert_eq!(entries[0].discount_bps, 0);
    assert_eq!(entries[1].discount_bps, 3_000);
    assert_eq!(entries[1].raw_bps, 3_500);
    assert_eq!(
        entries[1].bonuses,
        vec!["tier", "tenure", "volume", "promotion"]
    );
    assert_ne!(entries[0].entry_id, entries[1].entry_id);
}
