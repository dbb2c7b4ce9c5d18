use std::future::Future;

use tracing::warn;

use crate::client::api::FeedbackApi;
use crate::models::{FeedbackEntry, LATEST_WINDOW};

/// Placeholder cards shown while the first load is pending.
pub const SKELETON_PLACEHOLDERS: usize = 6;
pub const EMPTY_MESSAGE: &str = "No feedback yet.";
pub const LOAD_ERROR_MESSAGE: &str = "Couldn't load feedback. Try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<FeedbackEntry>),
    LoadError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackCard<'a> {
    /// First letter of the name, uppercased; `?` for an empty name.
    pub initial: String,
    pub name: &'a str,
    pub subtitle: String,
    pub message: &'a str,
}

impl<'a> FeedbackCard<'a> {
    pub fn from_entry(entry: &'a FeedbackEntry) -> Self {
        let initial = entry
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string());

        Self {
            initial,
            name: &entry.name,
            subtitle: format!("{} · ⭐ {}", entry.course, entry.rating),
            message: &entry.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    Skeleton(usize),
    Empty(&'static str),
    Cards(Vec<FeedbackCard<'a>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// Torn down before the response arrived; nothing was applied.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FeedbackList {
    state: ListState,
}

impl Default for FeedbackList {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackList {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        match &self.state {
            ListState::Loaded(entries) => entries,
            ListState::Loading | ListState::LoadError => &[],
        }
    }

    /// Inline error shown above the list. Stays until new data replaces it.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.state {
            ListState::LoadError => Some(LOAD_ERROR_MESSAGE),
            _ => None,
        }
    }

    pub fn view(&self) -> ListView<'_> {
        if self.state == ListState::Loading {
            return ListView::Skeleton(SKELETON_PLACEHOLDERS);
        }

        let entries = self.entries();
        if entries.is_empty() {
            return ListView::Empty(EMPTY_MESSAGE);
        }

        ListView::Cards(
            entries
                .iter()
                .take(LATEST_WINDOW as usize)
                .map(FeedbackCard::from_entry)
                .collect(),
        )
    }

    pub fn replace(&mut self, entries: Vec<FeedbackEntry>) {
        self.state = ListState::Loaded(entries);
    }

    /// Fetches the latest entries unless `teardown` resolves first, in which
    /// case the in-flight request is dropped and the state is left alone.
    pub async fn load<A, T>(&mut self, api: &A, teardown: T) -> LoadOutcome
    where
        A: FeedbackApi + ?Sized,
        T: Future<Output = ()>,
    {
        let result = tokio::select! {
            biased;
            _ = teardown => return LoadOutcome::Cancelled,
            result = api.list_recent() => result,
        };

        match result {
            Ok(entries) => {
                self.replace(entries);
                LoadOutcome::Loaded
            }
            Err(e) => {
                warn!("failed to load feedback: {}", e);
                self.state = ListState::LoadError;
                LoadOutcome::Failed
            }
        }
    }
}
