//! Helpers shared by the generated-client tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use shapegen::prelude::*;

/// Answers every request with one canned response and records what was sent.
#[derive(Debug, Clone, Default)]
pub struct StubDispatcher {
    response: HttpResponse,
    requests: Arc<Mutex<Vec<ServiceRequest>>>,
}

impl StubDispatcher {
    pub fn answering(response: HttpResponse) -> Self {
        Self {
            response,
            requests: Arc::default(),
        }
    }

    pub fn last_request(&self) -> ServiceRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was dispatched")
    }
}

impl DispatchRequest for StubDispatcher {
    fn dispatch(
        &self,
        request: &ServiceRequest,
    ) -> impl Future<Output = Result<HttpResponse, DispatchError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let response = self.response.clone();
        async move { Ok(response) }
    }
}
