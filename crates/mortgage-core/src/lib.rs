//! Mortgage Editor Core
//!
//! Draft buffers, the inline edit state machine and the submission
//! coordinator that sits between the presentation layer and the remote store.
//!
//! # Overview
//!
//! - **CreateForm**: draft for a new record, reset after a successful create
//! - **EditSession**: at most one row under edit, `Viewing -> Editing -> Saving`
//! - **MortgageEditor**: validates, coerces, calls the store once and re-reads the list
//! - **RemoteCollectionClient**: the store contract, implemented over HTTP elsewhere
//! - **Notifier**: success and failure messages for the user
//!
//! The cached list is only ever replaced by a refresh; mutations never patch
//! it locally.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod event;
pub mod form;
pub mod notify;
pub mod session;
pub mod state_machine;
pub mod view;

// Re-exports
pub use client::{ClientError, RemoteCollectionClient};
pub use config::{ConfigError, EditorConfig, LogConfig, LogFormat, RemoteConfig};
pub use draft::DraftBuffer;
pub use editor::MortgageEditor;
pub use error::{DraftError, EditorError};
pub use event::{EditorEvent, FormTarget};
pub use form::{CreateForm, PendingCreate};
pub use notify::{Notification, NotificationLevel, Notifier, Operation};
pub use session::{EditSession, PendingSave, SessionTicket};
pub use state_machine::{allowed_transitions, validate_transition, EditPhase};
pub use view::{Cell, EditView, EditorSnapshot, FormView, RowView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editor operations
    pub use crate::{
        ClientError, EditPhase, EditorError, EditorEvent, EditorSnapshot, MortgageEditor,
        Notification, Notifier, Operation, RemoteCollectionClient,
    };
    pub use mortgage_schema::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
