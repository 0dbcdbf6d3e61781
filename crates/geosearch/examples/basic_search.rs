//! Basic search control usage
//!
//! This example demonstrates the fundamental interaction loop:
//! - Plugging a geocoding provider into the control
//! - Typing a query and reading back the debounced suggestions
//! - Committing a candidate and inspecting what landed on the map

use std::time::Duration;

use async_trait::async_trait;
use geosearch::{
    Control, ControlEvent, HeadlessMap, Key, Options, Provider, ProviderError, SearchControl,
    SearchResult, Selection,
};

/// A tiny offline gazetteer standing in for a real geocoding service.
struct Gazetteer(Vec<SearchResult>);

#[async_trait]
impl Provider for Gazetteer {
    async fn search(&self, selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
        if let Some(data) = &selection.data {
            return Ok(vec![data.clone()]);
        }
        // Pretend to hit the network
        tokio::time::sleep(Duration::from_millis(120)).await;
        let needle = selection.query.to_lowercase();
        Ok(self
            .0
            .iter()
            .filter(|place| place.label.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    geosearch::init_logging(tracing::Level::INFO)?;

    let gazetteer = Gazetteer(vec![
        SearchResult::new("London, United Kingdom", -0.1276, 51.5072),
        SearchResult::new("London, Ontario, Canada", -81.2453, 42.9849),
        SearchResult::new("Londonderry, Northern Ireland", -7.3086, 54.9966),
    ]);
    let options = Options::builder()
        .provider(gazetteer)
        .show_popup(true)
        .popup_format(|query, result| format!("{} (searched for '{query}')", result.label))
        .build()?;

    let mut control = SearchControl::new(options, HeadlessMap::new());
    control.on_add();

    // Type "london" one key at a time
    let mut value = String::new();
    for c in "london".chars() {
        value.push(c);
        control.handle(ControlEvent::typed(c, value.clone()));
    }
    control.settle().await;

    println!("Suggestions for '{}':", control.input());
    for (i, label) in control.candidate_labels().iter().enumerate() {
        println!("  {}. {label}", i + 1);
    }

    // Pick the second candidate with the keyboard
    control.handle(ControlEvent::KeyDown(Key::ArrowDown));
    control.handle(ControlEvent::KeyDown(Key::ArrowDown));
    control.handle(ControlEvent::KeyDown(Key::Enter));
    control.settle().await;

    println!("\nMap after committing '{}':", control.input());
    for (id, marker) in control.map().markers() {
        println!(
            "  {id} at {} with popup \"{}\"",
            marker.spec.position, marker.spec.popup
        );
    }
    if let Some(view) = control.map().last_view() {
        println!("  view: {view:?}");
    }
    for event in control.map().events() {
        println!("  fired {}", event.name());
    }

    control.on_remove();
    Ok(())
}
