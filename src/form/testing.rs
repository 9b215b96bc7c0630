//! In-memory API fakes for controller and screen tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{ApiError, ApplicationSink, InstitutionDirectory};
use crate::model::{DonorSignup, Institution, StudentApplication};

pub(crate) fn institution(id: &str, name: &str) -> Institution {
    Institution {
        id: id.into(),
        name: name.into(),
        city: "Stanford".into(),
        state: "CA".into(),
        full_name: None,
    }
}

fn server_error(endpoint: &'static str) -> ApiError {
    ApiError::Status {
        endpoint,
        status: 500,
    }
}

enum Behavior {
    Respond(Vec<Institution>),
    Fail,
    Hang,
    Gated,
}

type Gate = (String, oneshot::Sender<Vec<Institution>>);

/// Directory fake that records every query it receives.
pub(crate) struct FakeDirectory {
    behavior: Behavior,
    calls: Mutex<Vec<String>>,
    gates: Mutex<Vec<Gate>>,
    hung_dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl FakeDirectory {
    fn with(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(Vec::new()),
            hung_dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Answers every query immediately with `results`.
    pub(crate) fn responding(results: Vec<Institution>) -> Arc<Self> {
        Self::with(Behavior::Respond(results))
    }

    /// Fails every query with an HTTP 500.
    pub(crate) fn failing() -> Arc<Self> {
        Self::with(Behavior::Fail)
    }

    /// Never answers.
    pub(crate) fn hanging() -> Arc<Self> {
        Self::with(Behavior::Hang)
    }

    /// Holds every query until the test calls [`resolve`](Self::resolve).
    pub(crate) fn gated() -> Arc<Self> {
        Self::with(Behavior::Gated)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether a hanging request was dropped before completing.
    pub(crate) fn hung_request_dropped(&self) -> bool {
        self.hung_dropped.load(Ordering::SeqCst)
    }

    /// Yields until at least `n` queries have arrived.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        while self.calls.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Yields until at least `n` gated queries are waiting.
    pub(crate) async fn wait_for_pending(&self, n: usize) {
        while self.gates.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Releases the oldest waiting query for `query` with `results`.
    pub(crate) fn resolve(&self, query: &str, results: Vec<Institution>) {
        let mut gates = self.gates.lock().unwrap();
        let pos = gates
            .iter()
            .position(|(q, _)| q == query)
            .unwrap_or_else(|| panic!("no pending lookup for {query:?}"));
        let (_, sender) = gates.remove(pos);
        sender.send(results).unwrap();
    }
}

#[async_trait]
impl InstitutionDirectory for FakeDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Institution>, ApiError> {
        self.calls.lock().unwrap().push(query.to_string());
        match &self.behavior {
            Behavior::Respond(results) => Ok(results.clone()),
            Behavior::Fail => Err(server_error("/api/universities/search")),
            Behavior::Hang => {
                let _flag = DropFlag(Arc::clone(&self.hung_dropped));
                std::future::pending().await
            }
            Behavior::Gated => {
                let (tx, rx) = oneshot::channel();
                self.gates.lock().unwrap().push((query.to_string(), tx));
                rx.await
                    .map_err(|_| server_error("/api/universities/search"))
            }
        }
    }
}

/// Sink fake that records every payload it receives.
pub(crate) struct FakeSink {
    fail: bool,
    applications: Mutex<Vec<StudentApplication>>,
    signups: Mutex<Vec<DonorSignup>>,
}

impl FakeSink {
    fn with(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            applications: Mutex::new(Vec::new()),
            signups: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn succeeding() -> Arc<Self> {
        Self::with(false)
    }

    pub(crate) fn failing() -> Arc<Self> {
        Self::with(true)
    }

    pub(crate) fn applications(&self) -> Vec<StudentApplication> {
        self.applications.lock().unwrap().clone()
    }

    pub(crate) fn signups(&self) -> Vec<DonorSignup> {
        self.signups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApplicationSink for FakeSink {
    async fn submit_application(&self, application: &StudentApplication) -> Result<(), ApiError> {
        self.applications.lock().unwrap().push(application.clone());
        if self.fail {
            Err(server_error("/api/students"))
        } else {
            Ok(())
        }
    }

    async fn join_waitlist(&self, signup: &DonorSignup) -> Result<(), ApiError> {
        self.signups.lock().unwrap().push(signup.clone());
        if self.fail {
            Err(server_error("/api/donors"))
        } else {
            Ok(())
        }
    }
}
