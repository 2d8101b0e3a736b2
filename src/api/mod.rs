//! Client side of the hosted database REST endpoints

mod client;
mod payload;
mod pipeline;
mod traits;

pub use client::ApiClient;
pub use payload::ClientRecord;
pub use pipeline::{SubmissionPipeline, SubmitOutcome};
pub use traits::PersistenceClientTrait;

#[cfg(test)]
pub use client::ApiError;
#[cfg(test)]
pub use payload::RecordId;
#[cfg(test)]
pub use traits::MockPersistenceClientTrait;
