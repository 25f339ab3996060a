//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::pattern::PatternRule;
use crate::core::sitemap::{NavigationMap, SiteNode};
use crate::core::state::Clock;
use crate::host::Host;

/// A clock that only moves when told to.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// `/` ← `/hub.html` ← `/hub/leaf1.html`
pub fn hub_map() -> NavigationMap {
    NavigationMap::new([
        ("/", SiteNode::Terminal),
        ("/hub.html", SiteNode::Parent("/".into())),
        ("/hub/leaf1.html", SiteNode::Parent("/hub.html".into())),
    ])
    .unwrap()
}

pub fn hub_rules() -> Vec<PatternRule> {
    vec![PatternRule::contains("/hub/", "/hub.html")]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Navigate(String),
    Toast(String),
    Exit,
}

/// A host that records every call and follows navigations.
pub struct RecordingHost {
    pub location: String,
    pub history: usize,
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn at(location: &str) -> Self {
        Self {
            location: location.to_string(),
            history: 0,
            calls: Vec::new(),
        }
    }
}

impl Host for RecordingHost {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn history_depth(&self) -> usize {
        self.history
    }

    fn navigate(&mut self, path: &str) {
        self.location = path.to_string();
        self.history += 1;
        self.calls.push(HostCall::Navigate(path.to_string()));
    }

    fn exit(&mut self) {
        self.calls.push(HostCall::Exit);
    }

    fn show_toast(&mut self, message: &str) {
        self.calls.push(HostCall::Toast(message.to_string()));
    }
}
