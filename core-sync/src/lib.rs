//! # Collection Sync Core
//!
//! Keeps a named collection's membership equal to the live result set of a
//! stored search.
//!
//! ## Overview
//!
//! For each sync configuration `(name, query, filters)`:
//! 1. Parse the filter expression into facet filters
//! 2. Run the search and normalize results into document descriptors
//! 3. Create the collection, or locate it when the name is already taken
//! 4. Diff the target id set against the collection's current members
//! 5. Apply additions, then removals, one remote call per document
//!
//! Configurations in a batch are independent and run concurrently; each one
//! yields a [`SyncResult`].
//!
//! ## Components
//!
//! - **Filter Parser** (`filter`): `key:value` tokens to grouped equality clauses
//! - **Query Executor** (`query`): search request construction and result normalization
//! - **Collection Locator** (`locator`): create-or-find by exact name
//! - **Reconciler** (`reconciler`): id-set diff and ordered application
//! - **Orchestrator** (`orchestrator`): batch fan-out and failure policy

pub mod error;
pub mod filter;
pub mod locator;
pub mod models;
pub mod orchestrator;
pub mod query;
pub mod reconciler;

#[cfg(test)]
mod testing;

pub use error::{ApplyPhase, Result, SyncError};
pub use filter::{FilterClause, FilterParseError, FilterSet};
pub use locator::{CollectionLocator, EnsuredCollection};
pub use models::{BatchReport, BatchSummary, DocumentDescriptor, SyncConfig, SyncResult};
pub use orchestrator::SyncOrchestrator;
pub use query::{build_search_request, normalize_results, QueryExecutor, PAGE_SIZE};
pub use reconciler::{Reconciler, SyncPlan};
