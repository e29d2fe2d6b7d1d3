use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{FileDownloader, Response};

/// Answers from queued responses per URL and remembers every request.
pub struct MockFetcher {
    responses: RefCell<HashMap<String, VecDeque<Response>>>,
    requests: RefCell<Vec<String>>,
}

impl FileDownloader for MockFetcher {
    fn fetch(&self, url: &str) -> Response {
        self.requests.borrow_mut().push(url.to_string());

        let mut responses = self.responses.borrow_mut();

        responses
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Response::network_error("connection refused"))
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_response(self, url: &str, response: Response) -> Self {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(response);

        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}
