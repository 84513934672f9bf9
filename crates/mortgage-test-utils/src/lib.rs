//! Testing utilities for the mortgage editor workspace
//!
//! In-memory store, recording notifier and record fixtures.

#![allow(missing_docs)]

mod store;

pub use store::{FailureMode, InMemoryStore, StoreOp};

use mortgage_core::{MortgageEditor, Notification, NotificationLevel, Notifier};
use mortgage_schema::{coerce, FieldSchema, PersistedRecord, RawRecord, RecordId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Notifier that keeps everything it is given
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.with_level(NotificationLevel::Success)
    }

    pub fn failures(&self) -> Vec<Notification> {
        self.with_level(NotificationLevel::Failure)
    }

    fn with_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.seen
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

/// Editor wired to an in-memory store and a recording notifier
pub struct Harness {
    pub editor: MortgageEditor,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn setup_editor(store: InMemoryStore) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(RecordingNotifier::new());
    let editor = MortgageEditor::new(
        Arc::new(FieldSchema::mortgage()),
        Arc::clone(&store) as _,
        Arc::clone(&notifier) as _,
    );
    Harness {
        editor,
        store,
        notifier,
    }
}

/// Complete, valid form input
pub fn valid_raw_record() -> RawRecord {
    RawRecord::from_pairs([
        ("credit_score", "700"),
        ("loan_amount", "300000"),
        ("property_value", "350000"),
        ("annual_income", "85000"),
        ("debt_amount", "0"),
        ("loan_type", "fixed"),
        ("property_type", "condo"),
    ])
}

/// Stored record built from valid input
///
/// # Panics
/// If `raw` does not validate against the mortgage schema.
pub fn persisted(id: u64, raw: &RawRecord) -> PersistedRecord {
    let schema = FieldSchema::mortgage();
    let typed = coerce(raw, &schema).expect("fixture record must be valid");
    PersistedRecord::from_typed(RecordId(id), &typed).with_attribute("credit_rating", "A")
}

/// `n` stored records with ids `1..=n` and distinct credit scores
pub fn persisted_records(n: u64) -> Vec<PersistedRecord> {
    (1..=n)
        .map(|id| {
            let score = (600 + id * 10).to_string();
            persisted(id, &valid_raw_record().with("credit_score", score))
        })
        .collect()
}
