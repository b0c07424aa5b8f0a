//! Hand-off of the assembled request to the host.
//!
//! # Design
//! The core never executes a request. Submitting posts a `HostMessage`
//! through a `HostTransport` and returns immediately; whatever the host
//! does with it (and whatever it answers) arrives through other channels.

use std::sync::mpsc::Sender;

use crate::store::{HostMessage, RequestStatus, RequestStore};

/// Fire-and-forget delivery of a request to the hosting environment.
pub trait HostTransport {
    fn post(&self, message: &HostMessage);
}

impl HostTransport for Sender<HostMessage> {
    fn post(&self, message: &HostMessage) {
        if self.send(message.clone()).is_err() {
            tracing::warn!("host channel closed, request dropped");
        }
    }
}

/// Post the store's request to the host.
///
/// The store is marked `Loading` first, but only when there is a URL to
/// load; the message is posted either way.
pub fn submit<T: HostTransport + ?Sized>(store: &mut RequestStore, transport: &T) {
    if !store.url().is_empty() {
        store.set_status(RequestStatus::Loading);
    }
    let message = store.host_message();
    tracing::info!(method = %message.request_method, url = %message.request_url, "submitting request");
    transport.post(&message);
}
