//! Capabilities the view controller needs from the UI toolkit.

use super::ViewMode;

/// Partial option update for an editor widget. `None` leaves the current
/// setting alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub read_only: Option<bool>,
    pub line_numbers: Option<bool>,
}

impl DisplayOptions {
    /// Lets the widget's own formatter rewrite the text.
    pub const UNLOCKED: DisplayOptions = DisplayOptions {
        read_only: Some(false),
        line_numbers: None,
    };

    pub const EDITABLE: DisplayOptions = DisplayOptions {
        read_only: Some(false),
        line_numbers: Some(true),
    };

    pub const READ_ONLY: DisplayOptions = DisplayOptions {
        read_only: Some(true),
        line_numbers: None,
    };

    /// Options a widget should end up with after reconciling into `mode`.
    pub fn for_mode(mode: ViewMode) -> DisplayOptions {
        match mode {
            ViewMode::RawEditable => DisplayOptions::EDITABLE,
            ViewMode::FormattedReadOnly | ViewMode::RenderedPreview => DisplayOptions::READ_ONLY,
        }
    }
}

/// An editable text widget owned by the UI.
#[allow(async_fn_in_trait)]
pub trait EditorWidget {
    fn value(&self) -> String;

    fn set_value(&mut self, text: &str);

    fn update_display_options(&mut self, options: &DisplayOptions);

    /// Run the widget's "format document" action.
    async fn format_document(&mut self);
}

/// Displays a buffer as rendered output (e.g. an HTML response).
pub trait PreviewRenderer {
    fn render(&mut self, source: &str);
}
