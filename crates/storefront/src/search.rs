//! Search input wired through the debouncer to the `keyword` query key.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::debounce::Debouncer;
use crate::filter::{self, KEYWORD_KEY};
use crate::query::Location;

/// Search box state: the raw input plus its pending commit.
#[derive(Debug)]
pub struct SearchBox {
    input: String,
    debouncer: Debouncer<String>,
    commits: mpsc::UnboundedReceiver<String>,
}

impl SearchBox {
    /// Create a search box prefilled from the current `keyword`.
    ///
    /// Must be used from within a tokio runtime.
    #[must_use]
    pub fn new(location: &Location, delay: Duration) -> Self {
        let (debouncer, commits) = Debouncer::new(delay);
        Self {
            input: location
                .query
                .get(KEYWORD_KEY)
                .unwrap_or_default()
                .to_string(),
            debouncer,
            commits,
        }
    }

    /// Current text in the box.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.input
    }

    /// Delay between the last keystroke and the commit.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Record a keystroke; the commit is rescheduled.
    pub fn input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.debouncer.schedule(self.input.clone());
    }

    /// Drop the pending commit, e.g. when leaving the page.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Wait for the next committed keyword and return the location to
    /// navigate to. Built against `location` as it is at commit time.
    pub async fn next_commit(&mut self, location: &Location) -> Option<Location> {
        let keyword = self.commits.recv().await?;
        tracing::debug!(keyword = %keyword, "Search committed");
        Some(filter::apply_keyword(location, &keyword))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_typing_commits_last_keyword() {
        let location = Location::parse("/products?category=phones&sortby=asc&keyword=apple");
        let mut search = SearchBox::new(&location, Duration::from_millis(700));
        assert_eq!(search.value(), "apple");

        search.input("i");
        search.input("ip");
        search.input("iphone");
        assert_eq!(search.value(), "iphone");

        let target = search.next_commit(&location).await.unwrap();
        assert_eq!(
            target.href(),
            "/products?category=phones&sortby=asc&keyword=iphone"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_removes_keyword() {
        let location = Location::parse("/products?category=phones&sortby=asc&keyword=apple");
        let mut search = SearchBox::new(&location, Duration::from_millis(700));

        search.input("");
        let target = search.next_commit(&location).await.unwrap();
        assert_eq!(target.href(), "/products?category=phones&sortby=asc");
    }
}
