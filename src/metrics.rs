//! Lightweight global metrics for cabinetdb.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Slot store (append / in-place rewrite / tombstone)
//! - Index (полные перестроения)
//! - Purge

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Slot store -----
static SLOTS_APPENDED: AtomicU64 = AtomicU64::new(0);
static SLOTS_REWRITTEN: AtomicU64 = AtomicU64::new(0);
static TOMBSTONES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static SLOT_READS: AtomicU64 = AtomicU64::new(0);

// ----- Index -----
static INDEX_REBUILDS: AtomicU64 = AtomicU64::new(0);

// ----- Purge -----
static PURGE_RUNS: AtomicU64 = AtomicU64::new(0);
static PURGE_SLOTS_MOVED: AtomicU64 = AtomicU64::new(0);
static PURGE_SLOTS_RECLAIMED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    // Slot store
    pub slots_appended: u64,
    pub slots_rewritten: u64,
    pub tombstones_written: u64,
    pub slot_reads: u64,

    // Index
    pub index_rebuilds: u64,

    // Purge
    pub purge_runs: u64,
    pub purge_slots_moved: u64,
    pub purge_slots_reclaimed: u64,
}

impl MetricsSnapshot {
    /// Средний объём освобождённых слотов за один purge.
    pub fn avg_reclaimed_per_purge(&self) -> f64 {
        if self.purge_runs == 0 {
            0.0
        } else {
            self.purge_slots_reclaimed as f64 / self.purge_runs as f64
        }
    }
}

// ----- Recorders (Slot store) -----
pub fn record_slot_appended() {
    SLOTS_APPENDED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_slot_rewritten() {
    SLOTS_REWRITTEN.fetch_add(1, Ordering::Relaxed);
}

pub fn record_tombstone_written() {
    TOMBSTONES_WRITTEN.fetch_add(1, Ordering::Relaxed);
}

pub fn record_slot_read() {
    SLOT_READS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Index) -----
pub fn record_index_rebuild() {
    INDEX_REBUILDS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Purge) -----
pub fn record_purge_run(moved: u64, reclaimed: u64) {
    PURGE_RUNS.fetch_add(1, Ordering::Relaxed);
    PURGE_SLOTS_MOVED.fetch_add(moved, Ordering::Relaxed);
    PURGE_SLOTS_RECLAIMED.fetch_add(reclaimed, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        slots_appended: SLOTS_APPENDED.load(Ordering::Relaxed),
        slots_rewritten: SLOTS_REWRITTEN.load(Ordering::Relaxed),
        tombstones_written: TOMBSTONES_WRITTEN.load(Ordering::Relaxed),
        slot_reads: SLOT_READS.load(Ordering::Relaxed),

        index_rebuilds: INDEX_REBUILDS.load(Ordering::Relaxed),

        purge_runs: PURGE_RUNS.load(Ordering::Relaxed),
        purge_slots_moved: PURGE_SLOTS_MOVED.load(Ordering::Relaxed),
        purge_slots_reclaimed: PURGE_SLOTS_RECLAIMED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    SLOTS_APPENDED.store(0, Ordering::Relaxed);
    SLOTS_REWRITTEN.store(0, Ordering::Relaxed);
    TOMBSTONES_WRITTEN.store(0, Ordering::Relaxed);
    SLOT_READS.store(0, Ordering::Relaxed);

    INDEX_REBUILDS.store(0, Ordering::Relaxed);

    PURGE_RUNS.store(0, Ordering::Relaxed);
    PURGE_SLOTS_MOVED.store(0, Ordering::Relaxed);
    PURGE_SLOTS_RECLAIMED.store(0, Ordering::Relaxed);
}
