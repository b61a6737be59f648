//! Test doubles for the clock and the HTTP seam

use crate::crawler::fetcher::PageSource;
use crate::crawler::scheduler::Clock;
use crate::url::PagePath;
use crate::CrawlError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct FakeClockState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// Manually advanced clock; sleeping advances it instantly
#[derive(Debug, Clone)]
pub struct FakeClock {
    state: Arc<Mutex<FakeClockState>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeClockState {
                now: Instant::now(),
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.state.lock().unwrap().now += duration;
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.state.lock().unwrap().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.now += duration;
        state.sleeps.push(duration);
    }
}

/// In-memory site that records every request with its start time
pub struct FakeSource {
    clock: FakeClock,
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl FakeSource {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            pages: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(path.to_string(), body.to_string());
        self
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn request_times(&self) -> Vec<Instant> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn get_text(&self, path: &PagePath) -> crate::Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), self.clock.now()));

        self.pages
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| CrawlError::HttpStatus {
                url: path.to_string(),
                status: 404,
            })
    }
}
