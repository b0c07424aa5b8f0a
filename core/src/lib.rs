//! Request-composition core for an embedded HTTP client panel.
//!
//! # Overview
//! Turns a pasted command line into a request, keeps the request being
//! edited in an explicit `RequestStore`, and drives the editor widget that
//! shows request and response documents. Nothing here performs network
//! I/O: submitting posts the assembled request to the host through a
//! `HostTransport`, and the host executes it.
//!
//! # Design
//! - `parse_command` is pure; its precedence rules live in a flag table.
//! - The store is passed by `&mut`, never reached through globals.
//! - The editor widget and preview renderer are traits, so the view
//!   controller has no dependency on a concrete editor.
//! - Deferred widget updates are returned as generation-tagged
//!   `Reconciliation` tickets that later transitions invalidate.

pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod store;
pub mod transport;
pub mod view;

pub use command::parse_command;
pub use config::ViewConfig;
pub use error::{ConfigError, ImportError, JsonError};
pub use http::{Headers, HttpMethod, RequestDescriptor};
pub use store::{HostMessage, RequestStatus, RequestStore};
pub use transport::{submit, HostTransport};
pub use view::{
    BeautifyOutcome, DisplayOptions, DocumentViewController, EditorWidget, PreviewRenderer,
    ReconcileOutcome, Reconciliation, ViewMode, ViewState,
};
