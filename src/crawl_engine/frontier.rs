//! BFS frontier bookkeeping.
//!
//! Tracks rendered URLs, the depth each URL was first seen at, the FIFO of
//! pending work and the discovery order used for reporting.

use std::collections::{HashMap, HashSet, VecDeque};

use super::crawl_types::CrawlQueue;

#[derive(Debug, Clone, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    depth_of: HashMap<String, u32>,
    discovered: Vec<String>,
    pending: VecDeque<String>,
}

impl Frontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root URL at depth 0.
    pub fn seed(&mut self, url: impl Into<String>) -> bool {
        self.enqueue(url, 0)
    }

    /// Queue `url` at `depth` unless it has been seen before.
    ///
    /// The first depth recorded for a URL is kept for good; a later, shorter
    /// path to it does not revise it.
    pub fn enqueue(&mut self, url: impl Into<String>, depth: u32) -> bool {
        let url = url.into();
        if self.depth_of.contains_key(&url) {
            return false;
        }
        self.depth_of.insert(url.clone(), depth);
        self.discovered.push(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Pop the next batch.
    ///
    /// At most `min(workers, pending, max_pages - visited)` URLs are popped.
    /// Popped URLs that were already rendered or sit deeper than `max_depth`
    /// are dropped.
    pub fn next_batch(&mut self, workers: usize, max_pages: usize, max_depth: u32) -> Vec<CrawlQueue> {
        let take = workers
            .min(self.pending.len())
            .min(max_pages.saturating_sub(self.visited.len()));

        let mut batch = Vec::with_capacity(take);
        for _ in 0..take {
            let Some(url) = self.pending.pop_front() else {
                break;
            };
            if self.visited.contains(&url) {
                continue;
            }
            let depth = self.depth_of.get(&url).copied().unwrap_or(0);
            if depth > max_depth {
                continue;
            }
            batch.push(CrawlQueue { url, depth });
        }
        batch
    }

    /// Record a successful render. Returns `false` if `url` was already visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_owned())
    }

    /// No pending work, or the page budget is spent.
    #[must_use]
    pub fn is_exhausted(&self, max_pages: usize) -> bool {
        self.pending.is_empty() || self.visited.len() >= max_pages
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    #[must_use]
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    #[must_use]
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.depth_of.get(url).copied()
    }

    /// Every URL ever queued, in first-seen order.
    #[must_use]
    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }

    #[must_use]
    pub fn into_discovered(self) -> Vec<String> {
        self.discovered
    }
}
