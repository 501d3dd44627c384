use super::{PublishedRelease, ReleaseHost, ReleaseRequest};
use crate::error::{ReleaseError, Result};
use std::cell::RefCell;

/// Release host for testing; records every request instead of sending it.
#[derive(Default)]
pub struct MockReleaseHost {
    requests: RefCell<Vec<ReleaseRequest>>,
    failure: Option<String>,
}

impl MockReleaseHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose every call fails with a `Publish` error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        MockReleaseHost {
            requests: RefCell::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn requests(&self) -> Vec<ReleaseRequest> {
        self.requests.borrow().clone()
    }
}

impl ReleaseHost for MockReleaseHost {
    fn create_release(&self, request: &ReleaseRequest) -> Result<PublishedRelease> {
        if let Some(message) = &self.failure {
            return Err(ReleaseError::publish(message.clone()));
        }
        let mut requests = self.requests.borrow_mut();
        requests.push(request.clone());
        Ok(PublishedRelease {
            id: requests.len() as u64,
            html_url: format!("https://github.invalid/releases/tag/{}", request.tag),
        })
    }
}
