//! The search control: the state machine tying input, provider, list, markers and map together.
//!
//! [`SearchControl`] is driven from a single task. UI interaction arrives as
//! [`ControlEvent`]s through [`SearchControl::handle`], which never blocks.
//! Time-based and asynchronous work (debounce windows, provider calls, message
//! expiry) is advanced by [`SearchControl::step`], or by [`SearchControl::run`]
//! which interleaves both from a channel.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use geosearch::{
//!     Control, ControlEvent, HeadlessMap, Key, Options, Provider, ProviderError, SearchControl,
//!     SearchResult, Selection,
//! };
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl Provider for Fixed {
//!     async fn search(&self, _: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
//!         Ok(vec![SearchResult::new("Paris, France", 2.35, 48.85)])
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build()?.block_on(async {
//! let options = Options::builder().provider(Fixed).build()?;
//! let mut control = SearchControl::new(options, HeadlessMap::new());
//! control.on_add();
//!
//! control.handle(ControlEvent::typed('P', "P"));
//! control.settle().await;
//! assert_eq!(control.results().count(), 1);
//!
//! control.handle(ControlEvent::KeyDown(Key::Enter));
//! control.settle().await;
//! assert_eq!(control.map().marker_count(), 1);
//! # Ok::<(), geosearch::error::GeoSearchError>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod events;
mod form;

use std::sync::Arc;

pub use events::{Activity, ControlEvent, ControlState, Key};
use form::FormState;
pub use form::Message;
use futures::{FutureExt, StreamExt, future::BoxFuture, stream::FuturesUnordered};
use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};
use tracing::{Instrument, debug, debug_span, info, instrument, trace, warn};

use crate::{
    config::{ConfigError, Options, OptionsBuilder, Style},
    dispatch::{InputOutcome, QueryDispatcher, RequestKind, RequestToken},
    map::{GeoSearchEvent, HostMap},
    markers::MarkerSet,
    provider::{ProviderError, SearchResult, Selection},
    results::{ResultList, Step},
    suspension::{HandlerSuspension, SuspendOutcome},
    view,
};

/// Lifecycle hooks through which a host attaches and detaches a control.
pub trait Control {
    /// The control was added to its host map.
    fn on_add(&mut self);
    /// The control is being removed from its host map.
    fn on_remove(&mut self);
    fn is_attached(&self) -> bool;
}

/// A resolved provider call.
struct Completion {
    token: RequestToken,
    kind: RequestKind,
    selection: Selection,
    outcome: Result<Vec<SearchResult>, ProviderError>,
}

/// What woke [`SearchControl::step`].
enum Wake {
    Completed(Completion),
    Debounce,
    MessageExpiry,
}

/// Interactive geocoding search control for a host map `M`.
///
/// The control owns its [`Options`], the candidate list, the marker set and the
/// handler snapshot. Dropping it while the pointer is still inside the form
/// restores the suspended map handlers.
pub struct SearchControl<M: HostMap> {
    options: Options,
    map: M,
    attached: bool,
    state: ControlState,
    form: FormState,
    results: ResultList,
    markers: MarkerSet,
    suspension: HandlerSuspension,
    dispatcher: QueryDispatcher,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<M: HostMap> SearchControl<M> {
    /// Create a control for `map`. It ignores events until [`Control::on_add`].
    pub fn new(options: Options, map: M) -> Self {
        Self {
            markers: MarkerSet::new(options.max_markers),
            dispatcher: QueryDispatcher::new(options.auto_complete_delay),
            options,
            map,
            attached: false,
            state: ControlState::Idle,
            form: FormState::default(),
            results: ResultList::new(),
            suspension: HandlerSuspension::new(),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Validate `builder` and create a control from it.
    pub fn from_builder(builder: OptionsBuilder, map: M) -> Result<Self, ConfigError> {
        Ok(Self::new(builder.build()?, map))
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }

    pub const fn state(&self) -> ControlState {
        self.state
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn input(&self) -> &str {
        &self.form.input
    }

    pub const fn is_open(&self) -> bool {
        self.form.open
    }

    /// The transient message currently shown, if any.
    pub fn message(&self) -> Option<&str> {
        self.form.message().map(|message| message.text.as_str())
    }

    pub const fn results(&self) -> &ResultList {
        &self.results
    }

    /// Candidate labels as the list renders them.
    pub fn candidate_labels(&self) -> Vec<String> {
        self.results.labels(|result| self.options.result_label(result))
    }

    pub const fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub const fn handlers_suspended(&self) -> bool {
        self.suspension.is_active()
    }

    /// Number of provider calls not yet resolved, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Class list of the container element, including `active` when open.
    pub fn container_class(&self) -> String {
        let base = &self.options.class_names.container;
        if self.form.open {
            format!("{base} active")
        } else {
            base.clone()
        }
    }

    /// Whether anything is waiting on time or on a provider.
    pub fn has_pending_work(&self) -> bool {
        self.dispatcher.has_pending()
            || !self.in_flight.is_empty()
            || self.form.message().is_some()
    }

    /// Apply one UI event.
    #[instrument(level = "debug", skip(self), fields(state = %self.state))]
    pub fn handle(&mut self, event: ControlEvent) {
        if !self.attached {
            trace!("Ignoring event for detached control");
            return;
        }
        match event {
            ControlEvent::Input { key, value } => self.on_input(key, value),
            ControlEvent::KeyDown(key) => self.on_key_down(key),
            ControlEvent::PointerEnter => {
                if self.suspension.suspend(&mut self.map) == SuspendOutcome::AlreadySuspended {
                    debug!("Pointer re-entered form while handlers are suspended");
                }
            }
            ControlEvent::PointerLeave => {
                self.suspension.restore(&mut self.map);
            }
            ControlEvent::ResultClick(index) => self.on_result_click(index),
            ControlEvent::Reset => self.clear_results(true),
            ControlEvent::Toggle => self.toggle(),
            ControlEvent::MarkerDragEnd { location, event } => {
                if !self.markers.drag_end(&mut self.map, location, event) {
                    trace!(marker = %event.marker, "Ignoring drag of foreign or fixed marker");
                }
            }
        }
    }

    /// Wait for the next debounce settle, provider response or message expiry and apply it.
    ///
    /// Returns `None` straight away when nothing is pending.
    pub async fn step(&mut self) -> Option<Activity> {
        if !self.has_pending_work() {
            return None;
        }
        let now = Instant::now();
        let debounce = self.dispatcher.deadline();
        let expiry = self.form.message_expiry();

        let wake = tokio::select! {
            Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                Wake::Completed(completion)
            }
            () = sleep_until(debounce.unwrap_or(now)), if debounce.is_some() => Wake::Debounce,
            () = sleep_until(expiry.unwrap_or(now)), if expiry.is_some() => Wake::MessageExpiry,
            else => return None,
        };
        match wake {
            Wake::Completed(completion) => Some(self.complete(completion)),
            Wake::Debounce => self.on_debounce_settled(),
            Wake::MessageExpiry => self.on_message_expired(),
        }
    }

    /// Step until nothing is pending, returning everything that happened.
    pub async fn settle(&mut self) -> Vec<Activity> {
        let mut activities = Vec::new();
        while let Some(activity) = self.step().await {
            activities.push(activity);
        }
        activities
    }

    /// Drive the control from `events` until the sender side closes.
    ///
    /// The control is attached first if needed and always detached on the way
    /// out, so suspended handlers are restored.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<ControlEvent>) {
        if !self.attached {
            self.on_add();
        }
        info!("Search control event loop started");
        loop {
            let has_work = self.has_pending_work();
            let event = tokio::select! {
                event = events.recv() => event,
                activity = self.step(), if has_work => {
                    trace!(?activity, "Event loop step");
                    continue;
                }
            };
            match event {
                Some(event) => self.handle(event),
                None => break,
            }
        }
        self.on_remove();
        info!("Search control event loop stopped");
    }

    fn transition(&mut self, to: ControlState) {
        if self.state != to {
            debug!(from = %self.state, %to, "State transition");
            self.state = to;
        }
    }

    /// A pending debounce reads as `Typing`, then a visible list as `ShowingCandidates`.
    fn resting_state(&self, otherwise: ControlState) -> ControlState {
        if self.dispatcher.has_pending() {
            ControlState::Typing
        } else if !self.results.is_empty() {
            ControlState::ShowingCandidates
        } else {
            otherwise
        }
    }

    fn on_input(&mut self, key: Key, value: String) {
        self.form.input = value;
        if key == Key::Escape {
            self.clear_results(false);
            return;
        }
        if !self.options.auto_complete || key.is_special() {
            return;
        }
        match self.dispatcher.input(&self.form.input, Instant::now()) {
            InputOutcome::Scheduled { deadline } => {
                trace!(query = %self.form.input, ?deadline, "Search scheduled");
                self.transition(ControlState::Typing);
            }
            InputOutcome::Cleared => {
                self.results.clear();
                self.transition(ControlState::Idle);
            }
        }
    }

    fn on_key_down(&mut self, key: Key) {
        let step = match key {
            Key::Enter => {
                let selection = Selection {
                    query: self.form.input.clone(),
                    data: self.results.selected().cloned(),
                };
                if selection.query.is_empty() && selection.data.is_none() {
                    trace!("Ignoring submit of empty query");
                    return;
                }
                self.submit(selection);
                return;
            }
            Key::ArrowDown => Step::Next,
            Key::ArrowUp => Step::Previous,
            _ => return,
        };
        if let Some(item) = self.results.step(step) {
            self.form.input.clone_from(&item.label);
        }
    }

    fn on_result_click(&mut self, index: usize) {
        let Some(item) = self.results.select(index).cloned() else {
            warn!(index, "Click on a result that is no longer listed");
            return;
        };
        self.submit(Selection::with_data(item.label.clone(), item));
    }

    /// Commit `selection`: clear the list and run the authoritative search.
    #[instrument(level = "debug", skip_all, fields(query = %selection.query))]
    fn submit(&mut self, selection: Selection) {
        self.results.clear();
        let token = self.dispatcher.issue(RequestKind::Submit);
        self.spawn_search(token, RequestKind::Submit, selection);
        self.transition(ControlState::AwaitingResult);
    }

    fn on_debounce_settled(&mut self) -> Option<Activity> {
        let query = self.dispatcher.settle(Instant::now())?;
        let token = self.dispatcher.issue(RequestKind::Suggest);
        self.spawn_search(token, RequestKind::Suggest, Selection::query(query.clone()));
        self.transition(ControlState::AwaitingResult);
        Some(Activity::Dispatched { token, query })
    }

    fn spawn_search(&mut self, token: RequestToken, kind: RequestKind, selection: Selection) {
        let provider = Arc::clone(&self.options.provider);
        let span = debug_span!("provider_search", %token, ?kind, query = %selection.query);
        self.in_flight.push(
            async move {
                let outcome = provider.search(&selection).await;
                Completion {
                    token,
                    kind,
                    selection,
                    outcome,
                }
            }
            .instrument(span)
            .boxed(),
        );
    }

    fn complete(&mut self, completion: Completion) -> Activity {
        let Completion {
            token,
            kind,
            selection,
            outcome,
        } = completion;

        if !self.dispatcher.is_current(token, kind) {
            debug!(%token, ?kind, "Discarding stale response");
            return Activity::Discarded { token };
        }

        let results = match outcome {
            Ok(results) => results,
            Err(err) => {
                warn!(%token, query = %selection.query, error = %err, "Provider search failed");
                return self.not_found(token, Some(err.to_string()));
            }
        };

        match kind {
            RequestKind::Suggest => {
                if results.is_empty() {
                    return self.not_found(token, None);
                }
                let mut results = results;
                results.truncate(self.options.max_suggestions.max(1));
                let count = results.len();
                self.results.render(results);
                self.transition(self.resting_state(ControlState::ShowingCandidates));
                Activity::Suggested { token, count }
            }
            RequestKind::Submit => match results.into_iter().next() {
                Some(best) => self.show_result(token, &best, &selection),
                None => self.not_found(token, None),
            },
        }
    }

    /// Place the committed result: marker, view, `showlocation` event.
    fn show_result(
        &mut self,
        token: RequestToken,
        result: &SearchResult,
        selection: &Selection,
    ) -> Activity {
        let marker = self
            .options
            .show_marker
            .then(|| self.markers.add(&mut self.map, result, selection, &self.options));
        let view = self.options.update_map.then(|| {
            view::center_on(&mut self.map, result, self.markers.bounds(), &self.options)
        });

        self.map.fire(GeoSearchEvent::ShowLocation {
            location: result.clone(),
            marker,
        });
        info!(label = %result.label, position = %result.latlng(), "Showing location");

        if self.options.auto_close {
            self.close_results();
        }
        self.transition(self.resting_state(ControlState::Committed));
        Activity::Located {
            token,
            marker,
            view,
        }
    }

    fn not_found(&mut self, token: RequestToken, reason: Option<String>) -> Activity {
        self.results.clear();
        if !self.options.not_found_message.is_empty() {
            let expires = Instant::now() + self.options.message_hide_delay;
            self.form.show_message(&self.options.not_found_message, expires);
        }
        self.transition(self.resting_state(ControlState::Idle));
        Activity::NotFound { token, reason }
    }

    fn on_message_expired(&mut self) -> Option<Activity> {
        self.form
            .expire_message(Instant::now())
            .then_some(Activity::MessageDismissed)
    }

    /// Dismiss the list. Input and markers go too when `force` or without `keep_result`.
    fn clear_results(&mut self, force: bool) {
        if force || !self.options.keep_result {
            self.form.input.clear();
            self.markers.clear(&mut self.map);
        }
        self.results.clear();
        self.dispatcher.cancel();
        self.dispatcher.cancel_submit();
        self.transition(ControlState::Idle);
    }

    /// Collapse the form after a committed search, keeping what was placed.
    fn close_results(&mut self) {
        if self.options.style == Style::Button {
            self.form.open = false;
        }
        self.results.clear();
        self.dispatcher.cancel();
    }

    fn toggle(&mut self) {
        if self.options.style == Style::Bar {
            return;
        }
        if self.form.open {
            self.form.open = false;
            self.clear_results(true);
        } else {
            self.form.open = true;
        }
    }
}

impl<M: HostMap> Control for SearchControl<M> {
    fn on_add(&mut self) {
        self.attached = true;
        self.form.open = self.options.style == Style::Bar;
        debug!(style = %self.options.style, "Search control added to map");
    }

    fn on_remove(&mut self) {
        self.suspension.restore(&mut self.map);
        self.markers.clear(&mut self.map);
        self.results.clear();
        self.dispatcher.cancel();
        self.in_flight = FuturesUnordered::new();
        self.form.reset();
        self.attached = false;
        self.transition(ControlState::Idle);
        debug!("Search control removed from map");
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl<M: HostMap> Drop for SearchControl<M> {
    fn drop(&mut self) {
        if self.suspension.restore(&mut self.map) {
            debug!("Restored map handlers on drop");
        }
    }
}
