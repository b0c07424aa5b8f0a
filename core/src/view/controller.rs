//! Keeps an editor widget consistent with the selected view mode.
//!
//! # Design
//! Showing a document as editable or formatted text needs the widget to be
//! mounted and laid out before it can format, so those transitions do not
//! touch the widget directly. `set_mode` returns a `Reconciliation` ticket
//! and the caller runs it once the settle delay has passed, either with its
//! own timer plus `reconcile`, or with `reconcile_after_delay`.
//!
//! Tickets carry the generation they were issued in. Every mode or language
//! change bumps the generation, so a ticket that is still waiting when the
//! user switches again is dropped instead of overwriting the newer state.

use std::time::Duration;

use super::widget::{DisplayOptions, EditorWidget, PreviewRenderer};
use super::{ViewMode, ViewState};
use crate::config::ViewConfig;
use crate::json;

/// A deferred widget update issued by a mode or language change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a reconciliation does nothing until it is run"]
pub struct Reconciliation {
    generation: u64,
    target: ViewMode,
    delay: Duration,
}

impl Reconciliation {
    pub fn target(&self) -> ViewMode {
        self.target
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    /// A later transition superseded the ticket; the widget was not touched.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeautifyOutcome {
    Applied,
    /// Already canonical.
    Unchanged,
    /// The buffer was not valid JSON and was left as is.
    Malformed,
    /// Beautify only applies to request documents.
    Skipped,
}

pub struct DocumentViewController<W, R> {
    widget: W,
    renderer: R,
    state: ViewState,
    config: ViewConfig,
    generation: u64,
}

impl<W: EditorWidget, R: PreviewRenderer> DocumentViewController<W, R> {
    pub fn new(widget: W, renderer: R, is_request_context: bool, config: ViewConfig) -> Self {
        Self {
            widget,
            renderer,
            state: ViewState {
                is_request_context,
                ..ViewState::default()
            },
            config,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Switch to `mode`.
    ///
    /// Entering `RenderedPreview` hands the buffer to the renderer and
    /// returns `None`. Entering an editable mode outside a request context
    /// returns the reconciliation to run. Re-selecting the current mode does
    /// nothing.
    pub fn set_mode(&mut self, mode: ViewMode) -> Option<Reconciliation> {
        if mode == self.state.mode {
            return None;
        }
        tracing::debug!(from = ?self.state.mode, to = ?mode, "view mode change");
        self.state.mode = mode;
        self.transition()
    }

    /// Change the document language, re-running reconciliation for the
    /// current mode.
    pub fn set_language(&mut self, language: impl Into<String>) -> Option<Reconciliation> {
        let language = language.into();
        if language == self.state.language {
            return None;
        }
        self.state.language = language;
        self.transition()
    }

    fn transition(&mut self) -> Option<Reconciliation> {
        self.generation += 1;
        match self.state.mode {
            ViewMode::RenderedPreview => {
                self.renderer.render(&self.state.buffer);
                None
            }
            _ if self.state.is_request_context => None,
            target => Some(Reconciliation {
                generation: self.generation,
                target,
                delay: self.config.reconcile_delay(),
            }),
        }
    }

    /// Apply a ticket now: push the buffer if the widget drifted, format,
    /// then lock or unlock the widget for the ticket's mode.
    pub async fn reconcile(&mut self, ticket: Reconciliation) -> ReconcileOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale reconciliation"
            );
            return ReconcileOutcome::Stale;
        }

        if self.widget.value() != self.state.buffer {
            self.widget.set_value(&self.state.buffer);
        }
        self.widget.update_display_options(&DisplayOptions::UNLOCKED);
        self.widget.format_document().await;
        self.widget
            .update_display_options(&DisplayOptions::for_mode(ticket.target));

        tracing::debug!(mode = ?ticket.target, "widget reconciled");
        ReconcileOutcome::Applied
    }

    /// Sleep for the ticket's delay, then `reconcile`.
    pub async fn reconcile_after_delay(&mut self, ticket: Reconciliation) -> ReconcileOutcome {
        tokio::time::sleep(ticket.delay).await;
        self.reconcile(ticket).await
    }

    /// Replace the buffer and show it on whichever surface is active.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.state.buffer = text.into();
        self.present_buffer();
    }

    /// An edit typed into the widget. Only raw mode writes back to the
    /// buffer; returns whether the buffer changed.
    pub fn on_widget_edit(&mut self, text: &str) -> bool {
        if self.state.mode != ViewMode::RawEditable {
            tracing::trace!(mode = ?self.state.mode, "ignoring widget edit");
            return false;
        }
        if self.state.buffer == text {
            return false;
        }
        self.state.buffer = text.to_string();
        true
    }

    /// Re-indent the request body as JSON. Malformed input stays as typed.
    pub fn beautify(&mut self) -> BeautifyOutcome {
        if !self.state.is_request_context {
            return BeautifyOutcome::Skipped;
        }

        match json::beautify_with_indent(&self.state.buffer, self.config.json_indent) {
            Ok(pretty) if pretty == self.state.buffer => BeautifyOutcome::Unchanged,
            Ok(pretty) => {
                self.state.buffer = pretty;
                self.present_buffer();
                BeautifyOutcome::Applied
            }
            Err(err) => {
                tracing::debug!(error = %err, "beautify skipped");
                BeautifyOutcome::Malformed
            }
        }
    }

    fn present_buffer(&mut self) {
        if self.state.mode.is_editable_surface() {
            if self.widget.value() != self.state.buffer {
                self.widget.set_value(&self.state.buffer);
            }
        } else {
            self.renderer.render(&self.state.buffer);
        }
    }
}
