//! Indexed priority heap for triage ordering.
//!
//! [`IndexedPriorityHeap`] keeps patients ordered by urgency and lets a
//! caller change an existing patient's priority or label by id, without
//! removing and re-adding it.
//!
//! Ordering rule: higher priority first; among equal priorities the smaller
//! [`PatientId`](triage_types::PatientId) wins. The order is total, so the
//! top of the heap is always deterministic.
//!
//! The heap holds two stores that must agree at all times:
//! - the implicit binary tree of patients, and
//! - an id → slot index used for O(log n) updates.
//!
//! There is no removal operation. Entries live until the heap is dropped.

mod heap;

pub use heap::{Admitted, IndexedPriorityHeap};
