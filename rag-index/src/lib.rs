//! Read-only access to the topic's Qdrant vector index.
//!
//! The index is built and maintained elsewhere; this crate only connects,
//! reports stats, and runs namespace-filtered k-NN searches:
//! - [`IndexConfig`] — endpoint/collection/namespace configuration from env.
//! - [`QdrantFacade`] — thin adapter over `qdrant-client`.
//! - [`retrieve_context`] — embed a query and return normalized hits.

mod config;
mod errors;
mod filters;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DistanceKind, IndexConfig};
pub use errors::RagIndexError;
pub use filters::{equals_filter, namespace_filter};
pub use qdrant_facade::{IndexStats, QdrantFacade};
pub use record::{ContextHit, ContextQuery};
pub use retrieve::{retrieve_context, search_by_vector};
