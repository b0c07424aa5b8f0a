//! Editor document view.
//!
//! A document buffer can be shown three ways: as editable text, as
//! formatted read-only text, or handed to a preview renderer. The
//! controller keeps an externally owned editor widget in line with the
//! chosen mode; the widget and the renderer are reached only through the
//! traits in `widget`.

mod controller;
mod widget;

pub use controller::{BeautifyOutcome, DocumentViewController, ReconcileOutcome, Reconciliation};
pub use widget::{DisplayOptions, EditorWidget, PreviewRenderer};

/// How the document buffer is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    RawEditable,
    FormattedReadOnly,
    /// The renderer owns the display; the widget is not the visible surface.
    RenderedPreview,
}

impl ViewMode {
    pub fn is_editable_surface(self) -> bool {
        !matches!(self, ViewMode::RenderedPreview)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Request bodies are edited by the user and never auto-reformatted on
    /// mode changes.
    pub is_request_context: bool,
    pub buffer: String,
    pub language: String,
}
