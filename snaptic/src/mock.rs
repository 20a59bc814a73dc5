//! In-memory transport for unit tests.

use crate::error::Result;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Replays queued responses in order and records every request it sees.
///
/// Clones share the same queue and log, so a test can keep one handle while
/// the client owns another. Runs out of responses → answers 599.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Rc<RefCell<VecDeque<HttpResponse>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(HttpResponse {
                status: 599,
                body: b"no canned response".to_vec(),
            }))
    }
}
