//! Geosearch - Interactive Location Search Control
//!
//! Geosearch is the coordination core of a search overlay for map applications.
//! A user types a free-text query, a pluggable geocoding [`Provider`] returns
//! ranked candidates, the user picks one with the mouse or keyboard, and the
//! control places a marker and recenters the map.
//!
//! The crate does not geocode and does not render. It sequences everything in
//! between:
//!
//! - **Debounced dispatch**: keystrokes are coalesced into one trailing provider
//!   call per debounce window, and out-of-order responses never overwrite
//!   fresher candidates
//! - **Keyboard navigation**: cyclic Up/Down through the candidate list, Enter
//!   or click to commit
//! - **Bounded markers**: at most `max_markers` placed at once, oldest evicted
//!   first
//! - **View centring**: result bounds, then marker bounds, then point and zoom
//! - **Handler suspension**: map gestures are disabled while the pointer is
//!   over the form and restored exactly afterwards
//!
//! # Quick Start
//!
//! ```rust
//! use async_trait::async_trait;
//! use geosearch::{
//!     Control, ControlEvent, HeadlessMap, Key, Options, Provider, ProviderError, SearchControl,
//!     SearchResult, Selection,
//! };
//!
//! struct Gazetteer;
//!
//! #[async_trait]
//! impl Provider for Gazetteer {
//!     async fn search(&self, selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
//!         Ok(match selection.query.as_str() {
//!             "Paris" | "Paris, France" => vec![SearchResult::new("Paris, France", 2.35, 48.85)],
//!             _ => Vec::new(),
//!         })
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build()?.block_on(async {
//! let options = Options::builder().provider(Gazetteer).zoom_level(12.0).build()?;
//! let mut control = SearchControl::new(options, HeadlessMap::new());
//! control.on_add();
//!
//! control.handle(ControlEvent::typed('s', "Paris"));
//! control.settle().await;
//! assert_eq!(control.candidate_labels(), ["Paris, France"]);
//!
//! control.handle(ControlEvent::KeyDown(Key::ArrowDown));
//! control.handle(ControlEvent::KeyDown(Key::Enter));
//! control.settle().await;
//! assert_eq!(control.map().marker_count(), 1);
//! # Ok::<(), geosearch::error::GeoSearchError>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod control;
mod dispatch;
pub mod error;
mod geo;
mod map;
mod markers;
mod provider;
mod results;
mod suspension;
mod view;

#[cfg(test)]
mod test_support;

pub use config::{
    ClassNames, ConfigError, MarkerOptions, Options, OptionsBuilder, PopupFormat, Position,
    ResultFormat, Style,
};
pub use control::{Activity, Control, ControlEvent, ControlState, Key, Message, SearchControl};
pub use dispatch::{InputOutcome, QueryDispatcher, RequestKind, RequestToken};
pub use geo::{LatLng, LatLngBounds};
pub use map::{
    DragEndEvent, GeoSearchEvent, Handler, HeadlessMap, HostMap, MarkerId, MarkerSpec,
    PlacedMarker,
};
pub use markers::{MarkerSet, SearchMarker};
pub use provider::{Provider, ProviderError, SearchResult, Selection};
pub use results::{ResultList, Step};
pub use suspension::{HandlerSnapshot, HandlerSuspension, SuspendOutcome};
pub use view::{ViewTarget, center_on};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Geosearch library.
///
/// This sets up structured logging with configurable levels and filtering.
/// `RUST_LOG` takes precedence over `level` when set. Calling it again is a
/// no-op.
///
/// # Examples
///
/// ```rust
/// use geosearch::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geosearch::error::GeoSearchError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeoSearchError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(anyhow::Error::msg)?;
        Ok(())
    })
}
