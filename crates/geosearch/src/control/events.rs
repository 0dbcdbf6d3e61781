use std::fmt;

use crate::{
    dispatch::RequestToken,
    geo::LatLng,
    map::{DragEndEvent, MarkerId},
    view::ViewTarget,
};

/// Keys the control distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Shift,
    Control,
    Alt,
    Meta,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Char(char),
}

impl Key {
    /// Navigation and modifier keys, which never trigger a search.
    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Backspace | Self::Delete | Self::Char(_))
    }
}

/// User interaction delivered to the control by the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// A key was released in the input; `value` is the input text afterwards.
    Input { key: Key, value: String },
    /// A key was pressed in the input, before the text changes.
    KeyDown(Key),
    /// The pointer entered the search form.
    PointerEnter,
    /// The pointer left the search form.
    PointerLeave,
    /// A candidate in the result list was clicked.
    ResultClick(usize),
    /// The reset action was used.
    Reset,
    /// The activator button was clicked.
    Toggle,
    /// The host finished a drag on one of the control's markers.
    MarkerDragEnd { location: LatLng, event: DragEndEvent },
}

impl ControlEvent {
    /// Convenience for a typed character: `value` is the text including it.
    pub fn typed(c: char, value: impl Into<String>) -> Self {
        Self::Input {
            key: Key::Char(c),
            value: value.into(),
        }
    }
}

/// Logical state of the search interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    /// No active query and no candidates shown
    #[default]
    Idle,
    /// Debounce pending
    Typing,
    /// Provider call in flight
    AwaitingResult,
    /// Candidate list non-empty
    ShowingCandidates,
    /// A selection was submitted and placed
    Committed,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Typing => "typing",
            Self::AwaitingResult => "awaiting-result",
            Self::ShowingCandidates => "showing-candidates",
            Self::Committed => "committed",
        };
        f.write_str(name)
    }
}

/// What one turn of the event loop did.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    /// The debounce settled and a suggestion search was sent.
    Dispatched { token: RequestToken, query: String },
    /// Suggestions were rendered into the result list.
    Suggested { token: RequestToken, count: usize },
    /// A committed search was placed on the map.
    Located {
        token: RequestToken,
        marker: Option<MarkerId>,
        view: Option<ViewTarget>,
    },
    /// The search found nothing or failed; `reason` carries the failure.
    NotFound {
        token: RequestToken,
        reason: Option<String>,
    },
    /// A response arrived for a superseded request and was dropped.
    Discarded { token: RequestToken },
    /// The transient message timed out.
    MessageDismissed,
}
