//! Artificial-delay handler, used to exercise concurrent sessions.

use std::collections::HashMap;
use std::time::Duration;

use super::Handler;
use crate::http::{Request, Response};

const SLEEP_SECS: u64 = 3;

pub struct SleepHandler;

impl SleepHandler {
    pub fn create(_args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        Some(Box::new(SleepHandler))
    }
}

impl Handler for SleepHandler {
    /// Blocks its session for three seconds, then responds. Other sessions
    /// must be unaffected; the session engine runs handlers on blocking
    /// threads.
    fn handle(&self, _req: &Request) -> Response {
        std::thread::sleep(Duration::from_secs(SLEEP_SECS));
        Response::plain_text(200, "OK", "Slept for 3 seconds")
    }
}
