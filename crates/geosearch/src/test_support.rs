//! Providers used by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::provider::{Provider, ProviderError, SearchResult, Selection};

pub struct NullProvider;

#[async_trait]
impl Provider for NullProvider {
    async fn search(&self, _selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Canned answers per query, each with its own latency.
///
/// Unknown queries resolve to an empty list. Every call is recorded.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    answers: Arc<Mutex<HashMap<String, (Duration, Result<Vec<SearchResult>, String>)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    count: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, query: &str, delay: Duration, results: Vec<SearchResult>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(query.to_owned(), (delay, Ok(results)));
        self
    }

    pub fn fail(self, query: &str, delay: Duration, reason: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(query.to_owned(), (delay, Err(reason.to_owned())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn search(&self, selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(selection.query.clone());
        let answer = self.answers.lock().unwrap().get(&selection.query).cloned();

        let Some((delay, answer)) = answer else {
            return Ok(Vec::new());
        };
        tokio::time::sleep(delay).await;
        answer.map_err(ProviderError::Request)
    }
}
