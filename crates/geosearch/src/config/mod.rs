//! Control options and the builder that assembles them.
//!
//! [`Options`] is fixed once the control is constructed. Callers only set what
//! they care about on an [`OptionsBuilder`]; everything else falls back to the
//! documented defaults.

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use thiserror::Error;

use crate::provider::{Provider, SearchResult};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A search provider is required")]
    MissingProvider,
    #[error("max_markers must be at least 1")]
    InvalidMaxMarkers,
    #[error("Unknown control style '{0}', expected 'button' or 'bar'")]
    InvalidStyle(String),
    #[error("Unknown control position '{0}'")]
    InvalidPosition(String),
}

/// Builds the popup label from the committed query and the placed result.
pub type PopupFormat = Arc<dyn Fn(&str, &SearchResult) -> String + Send + Sync>;
/// Builds the label shown for a candidate in the result list.
pub type ResultFormat = Arc<dyn Fn(&SearchResult) -> String + Send + Sync>;

/// How the control presents itself.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Collapsed behind an activator button until clicked
    #[default]
    Button,
    /// Always-visible search bar
    Bar,
}

impl Style {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Bar => "bar",
        }
    }
}

impl FromStr for Style {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "button" => Ok(Self::Button),
            "bar" => Ok(Self::Bar),
            other => Err(ConfigError::InvalidStyle(other.to_owned())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corner of the map the control is anchored to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topleft" => Ok(Self::TopLeft),
            "topright" => Ok(Self::TopRight),
            "bottomleft" => Ok(Self::BottomLeft),
            "bottomright" => Ok(Self::BottomRight),
            other => Err(ConfigError::InvalidPosition(other.to_owned())),
        }
    }
}

/// Styling of the markers placed for committed searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerOptions {
    /// Icon identifier understood by the host, `None` for the host default
    pub icon: Option<String>,
    /// Allow the user to drag placed markers
    pub draggable: bool,
}

/// CSS class names for each element of the rendered form.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub container: String,
    pub button: String,
    pub reset_button: String,
    pub msgbox: String,
    pub form: String,
    pub input: String,
    pub result_list: String,
    pub item: String,
    pub not_found: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            container: "leaflet-bar leaflet-control leaflet-control-geosearch".into(),
            button: "leaflet-bar-part leaflet-bar-part-single".into(),
            reset_button: "reset".into(),
            msgbox: "leaflet-bar message".into(),
            form: String::new(),
            input: String::new(),
            result_list: String::new(),
            item: String::new(),
            not_found: "leaflet-bar-notfound".into(),
        }
    }
}

/// Configuration of a search control.
///
/// Use [`Options::builder`] to create one; a provider is the only required
/// setting.
#[derive(Clone)]
pub struct Options {
    pub provider: Arc<dyn Provider>,
    pub position: Position,
    pub style: Style,
    pub show_marker: bool,
    pub show_popup: bool,
    pub popup_format: PopupFormat,
    pub result_format: ResultFormat,
    pub marker: MarkerOptions,
    /// Upper bound on simultaneously placed markers (at least 1)
    pub max_markers: usize,
    /// Upper bound on candidates rendered in the result list
    pub max_suggestions: usize,
    /// Recenter the map on committed results
    pub update_map: bool,
    /// Keep the current zoom level when recentering
    pub retain_zoom_level: bool,
    pub animate_zoom: bool,
    pub zoom_level: f64,
    pub search_label: String,
    /// Message shown when a search finds nothing; empty disables it
    pub not_found_message: String,
    pub message_hide_delay: Duration,
    pub class_names: ClassNames,
    pub auto_complete: bool,
    pub auto_complete_delay: Duration,
    /// Close the result list after a result is shown
    pub auto_close: bool,
    /// Keep the input text and markers when the list is dismissed
    pub keep_result: bool,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    pub fn popup_label(&self, query: &str, result: &SearchResult) -> String {
        (self.popup_format)(query, result)
    }

    pub fn result_label(&self, result: &SearchResult) -> String {
        (self.result_format)(result)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("position", &self.position)
            .field("style", &self.style)
            .field("show_marker", &self.show_marker)
            .field("show_popup", &self.show_popup)
            .field("marker", &self.marker)
            .field("max_markers", &self.max_markers)
            .field("max_suggestions", &self.max_suggestions)
            .field("update_map", &self.update_map)
            .field("retain_zoom_level", &self.retain_zoom_level)
            .field("animate_zoom", &self.animate_zoom)
            .field("zoom_level", &self.zoom_level)
            .field("auto_complete", &self.auto_complete)
            .field("auto_complete_delay", &self.auto_complete_delay)
            .field("auto_close", &self.auto_close)
            .field("keep_result", &self.keep_result)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Options`] with the documented defaults.
///
/// ```rust
/// use geosearch::{ConfigError, Options};
///
/// // A provider is mandatory.
/// assert_eq!(
///     Options::builder().build().unwrap_err(),
///     ConfigError::MissingProvider
/// );
/// ```
#[derive(Clone)]
pub struct OptionsBuilder {
    provider: Option<Arc<dyn Provider>>,
    position: Position,
    style: Style,
    show_marker: bool,
    show_popup: bool,
    popup_format: PopupFormat,
    result_format: ResultFormat,
    marker: MarkerOptions,
    max_markers: usize,
    max_suggestions: usize,
    update_map: bool,
    retain_zoom_level: bool,
    animate_zoom: bool,
    zoom_level: f64,
    search_label: String,
    not_found_message: String,
    message_hide_delay: Duration,
    class_names: ClassNames,
    auto_complete: bool,
    auto_complete_delay: Duration,
    auto_close: bool,
    keep_result: bool,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            position: Position::TopLeft,
            style: Style::Button,
            show_marker: true,
            show_popup: false,
            popup_format: Arc::new(|_query, result| result.label.clone()),
            result_format: Arc::new(|result| result.label.clone()),
            marker: MarkerOptions::default(),
            max_markers: 1,
            max_suggestions: 5,
            update_map: true,
            retain_zoom_level: false,
            animate_zoom: true,
            zoom_level: 18.0,
            search_label: "Enter address".into(),
            not_found_message: "Sorry, that address could not be found.".into(),
            message_hide_delay: Duration::from_millis(3000),
            class_names: ClassNames::default(),
            auto_complete: true,
            auto_complete_delay: Duration::from_millis(250),
            auto_close: false,
            keep_result: false,
        }
    }

    /// Always-visible bar that closes itself after each committed search.
    pub fn bar() -> Self {
        Self::new().style(Style::Bar).auto_close(true)
    }

    /// Collapsible button that keeps the last result on the map.
    pub fn button() -> Self {
        Self::new().style(Style::Button).keep_result(true)
    }

    pub fn provider(mut self, provider: impl Provider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn shared_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn show_marker(mut self, enabled: bool) -> Self {
        self.show_marker = enabled;
        self
    }

    pub fn show_popup(mut self, enabled: bool) -> Self {
        self.show_popup = enabled;
        self
    }

    pub fn popup_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&str, &SearchResult) -> String + Send + Sync + 'static,
    {
        self.popup_format = Arc::new(format);
        self
    }

    pub fn result_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&SearchResult) -> String + Send + Sync + 'static,
    {
        self.result_format = Arc::new(format);
        self
    }

    pub fn marker(mut self, marker: MarkerOptions) -> Self {
        self.marker = marker;
        self
    }

    pub fn draggable_markers(mut self, draggable: bool) -> Self {
        self.marker.draggable = draggable;
        self
    }

    /// Set the marker bound; `0` is rejected by [`OptionsBuilder::build`].
    pub fn max_markers(mut self, max: usize) -> Self {
        self.max_markers = max;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn update_map(mut self, enabled: bool) -> Self {
        self.update_map = enabled;
        self
    }

    pub fn retain_zoom_level(mut self, enabled: bool) -> Self {
        self.retain_zoom_level = enabled;
        self
    }

    pub fn animate_zoom(mut self, enabled: bool) -> Self {
        self.animate_zoom = enabled;
        self
    }

    pub fn zoom_level(mut self, zoom: f64) -> Self {
        self.zoom_level = zoom;
        self
    }

    pub fn search_label(mut self, label: impl Into<String>) -> Self {
        self.search_label = label.into();
        self
    }

    pub fn not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found_message = message.into();
        self
    }

    pub fn message_hide_delay(mut self, delay: Duration) -> Self {
        self.message_hide_delay = delay;
        self
    }

    pub fn class_names(mut self, class_names: ClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    pub fn auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    pub fn auto_complete_delay(mut self, delay: Duration) -> Self {
        self.auto_complete_delay = delay;
        self
    }

    pub fn auto_close(mut self, enabled: bool) -> Self {
        self.auto_close = enabled;
        self
    }

    pub fn keep_result(mut self, enabled: bool) -> Self {
        self.keep_result = enabled;
        self
    }

    /// Validate the settings and produce the final [`Options`].
    pub fn build(self) -> Result<Options, ConfigError> {
        let provider = self.provider.ok_or(ConfigError::MissingProvider)?;
        if self.max_markers == 0 {
            return Err(ConfigError::InvalidMaxMarkers);
        }

        let mut class_names = self.class_names;
        class_names.container = format!(
            "{} leaflet-geosearch-{}",
            class_names.container,
            self.style.as_str()
        )
        .trim_start()
        .to_owned();

        Ok(Options {
            provider,
            position: self.position,
            style: self.style,
            show_marker: self.show_marker,
            show_popup: self.show_popup,
            popup_format: self.popup_format,
            result_format: self.result_format,
            marker: self.marker,
            max_markers: self.max_markers,
            max_suggestions: self.max_suggestions,
            update_map: self.update_map,
            retain_zoom_level: self.retain_zoom_level,
            animate_zoom: self.animate_zoom,
            zoom_level: self.zoom_level,
            search_label: self.search_label,
            not_found_message: self.not_found_message,
            message_hide_delay: self.message_hide_delay,
            class_names,
            auto_complete: self.auto_complete,
            auto_complete_delay: self.auto_complete_delay,
            auto_close: self.auto_close,
            keep_result: self.keep_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NullProvider;

    #[test]
    fn test_defaults() {
        let options = Options::builder().provider(NullProvider).build().unwrap();

        assert_eq!(options.style, Style::Button);
        assert_eq!(options.position, Position::TopLeft);
        assert!(options.show_marker);
        assert!(!options.show_popup);
        assert!(!options.marker.draggable);
        assert_eq!(options.max_markers, 1);
        assert_eq!(options.max_suggestions, 5);
        assert!(options.update_map);
        assert!(!options.retain_zoom_level);
        assert!(options.animate_zoom);
        assert_eq!(options.zoom_level, 18.0);
        assert!(options.auto_complete);
        assert_eq!(options.auto_complete_delay, Duration::from_millis(250));
        assert!(!options.auto_close);
        assert!(!options.keep_result);
        assert_eq!(options.search_label, "Enter address");
        assert_eq!(
            options.not_found_message,
            "Sorry, that address could not be found."
        );
        assert_eq!(options.message_hide_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_style_class_appended_once() {
        let options = OptionsBuilder::bar().provider(NullProvider).build().unwrap();
        assert_eq!(
            options.class_names.container,
            "leaflet-bar leaflet-control leaflet-control-geosearch leaflet-geosearch-bar"
        );
        assert_eq!(
            options
                .class_names
                .container
                .matches("leaflet-geosearch-")
                .count(),
            1
        );
    }

    #[test]
    fn test_presets() {
        let bar = OptionsBuilder::bar().provider(NullProvider).build().unwrap();
        assert_eq!(bar.style, Style::Bar);
        assert!(bar.auto_close);

        let button = OptionsBuilder::button()
            .provider(NullProvider)
            .build()
            .unwrap();
        assert_eq!(button.style, Style::Button);
        assert!(button.keep_result);
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            Options::builder().max_markers(3).build().unwrap_err(),
            ConfigError::MissingProvider
        );
        assert_eq!(
            Options::builder()
                .provider(NullProvider)
                .max_markers(0)
                .build()
                .unwrap_err(),
            ConfigError::InvalidMaxMarkers
        );
    }

    #[test]
    fn test_parse_style_and_position() {
        assert_eq!(" Bar ".parse::<Style>(), Ok(Style::Bar));
        assert_eq!(
            "floating".parse::<Style>(),
            Err(ConfigError::InvalidStyle("floating".into()))
        );
        assert_eq!("bottomRight".parse::<Position>(), Ok(Position::BottomRight));
        assert!("middle".parse::<Position>().is_err());
    }

    #[test]
    fn test_formatters() {
        let options = Options::builder()
            .provider(NullProvider)
            .result_format(|result| result.label.to_uppercase())
            .build()
            .unwrap();
        let paris = SearchResult::new("Paris", 2.35, 48.85);
        assert_eq!(options.result_label(&paris), "PARIS");
        assert_eq!(options.popup_label("par", &paris), "Paris");
    }
}
