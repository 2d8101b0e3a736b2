//! Trait abstraction for the persistence client to enable mocking in tests

use super::client::ApiError;
use super::payload::{
    ClientEnrollmentRequest, ClientRecord, ClientRegistrationRequest, HealthProgramRequest,
};
use async_trait::async_trait;

/// Operations against the hosted database endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceClientTrait: Send + Sync {
    /// Check if the endpoints are reachable
    async fn check_connection(&self) -> bool;

    /// Insert a client registration
    async fn register_client(&mut self, request: &ClientRegistrationRequest)
        -> Result<(), ApiError>;

    /// Insert a program enrollment
    async fn enroll_client(&mut self, request: &ClientEnrollmentRequest) -> Result<(), ApiError>;

    /// Insert a health program
    async fn create_health_program(
        &mut self,
        request: &HealthProgramRequest,
    ) -> Result<(), ApiError>;

    /// Registered clients, newest first
    async fn list_clients(&mut self) -> Result<Vec<ClientRecord>, ApiError>;
}
