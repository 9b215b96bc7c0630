//! Clients for the platform's HTTP API.
//!
//! Controllers talk to the API through the [`InstitutionDirectory`] and
//! [`ApplicationSink`] traits; [`ApiClient`] implements both over `reqwest`.

mod client;
mod error;

use async_trait::async_trait;

use crate::model::{DonorSignup, Institution, StudentApplication};

pub use client::ApiClient;
pub use error::ApiError;

/// Search-as-you-type lookup of institutions.
#[async_trait]
pub trait InstitutionDirectory: Send + Sync {
    /// Returns institutions matching `query`, in the directory's order.
    ///
    /// An empty vector is a valid answer, not an error.
    async fn search(&self, query: &str) -> Result<Vec<Institution>, ApiError>;
}

/// Destination for completed forms.
#[async_trait]
pub trait ApplicationSink: Send + Sync {
    /// Submits a student application.
    async fn submit_application(&self, application: &StudentApplication) -> Result<(), ApiError>;

    /// Adds a donor to the launch waitlist.
    async fn join_waitlist(&self, signup: &DonorSignup) -> Result<(), ApiError>;
}
