//! The candidate list shown under the search input.

use crate::provider::SearchResult;

/// Direction of a keyboard step through the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Ordered candidates (provider relevance order) plus a selection cursor.
///
/// `selected` is `None` when nothing is highlighted. The list is rebuilt
/// wholesale on every [`ResultList::render`].
#[derive(Debug, Default)]
pub struct ResultList {
    results: Vec<SearchResult>,
    selected: Option<usize>,
}

impl ResultList {
    pub const fn new() -> Self {
        Self {
            results: Vec::new(),
            selected: None,
        }
    }

    /// Replace the contents and reset the cursor.
    pub fn render(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.selected = None;
    }

    /// Move the cursor to `index` and return the item there.
    ///
    /// Out-of-range indices return `None` and leave the cursor where it was.
    pub fn select(&mut self, index: usize) -> Option<&SearchResult> {
        if index >= self.results.len() {
            return None;
        }
        self.selected = Some(index);
        self.results.get(index)
    }

    /// Move the cursor one step with wraparound at both ends.
    ///
    /// From no selection, [`Step::Next`] lands on the first item and
    /// [`Step::Previous`] on the last. An empty list stays untouched.
    pub fn step(&mut self, step: Step) -> Option<&SearchResult> {
        let len = self.results.len();
        if len == 0 {
            return None;
        }
        let last = len - 1;
        let index = match (step, self.selected) {
            (Step::Next, None) => 0,
            (Step::Next, Some(i)) if i >= last => 0,
            (Step::Next, Some(i)) => i + 1,
            (Step::Previous, None | Some(0)) => last,
            (Step::Previous, Some(i)) => (i - 1).min(last),
        };
        self.select(index)
    }

    pub fn next(&mut self) -> Option<&SearchResult> {
        self.step(Step::Next)
    }

    pub fn previous(&mut self) -> Option<&SearchResult> {
        self.step(Step::Previous)
    }

    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.selected.and_then(|index| self.results.get(index))
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.results.iter()
    }

    /// Display labels in list order, built with `format`.
    pub fn labels<F>(&self, format: F) -> Vec<String>
    where
        F: Fn(&SearchResult) -> String,
    {
        self.results.iter().map(format).collect()
    }
}
