//! Search disambiguation.
//!
//! A query resolves to no match, a single record, or a list of candidates the
//! user has to pick from. Candidate tokens are plain record ids, so a later
//! selection is resolved by fetching the id again instead of keeping state.

use crate::error::CoreError;
use crate::reply::location_label;
use log::debug;
use ohmytime_protocol::{InlineOption, LocationIndex, LocationRecord};
use std::sync::Arc;

/// Maximum number of options in one row of a candidate list.
pub const OPTIONS_PER_ROW: usize = 3;

/// Result of resolving a free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No record matched.
    NoMatch,
    /// Exactly one record matched.
    Direct(LocationRecord),
    /// Several records matched; rows of selectable candidates in search order.
    Ambiguous(Vec<Vec<InlineOption>>),
}

/// Resolves queries and selection tokens against a location index.
#[derive(Clone)]
pub struct Resolver {
    index: Arc<dyn LocationIndex>,
}

impl Resolver {
    pub fn new(index: Arc<dyn LocationIndex>) -> Self {
        Self { index }
    }

    /// Search the index and classify the hits.
    pub async fn resolve(&self, query: &str) -> Result<Outcome, CoreError> {
        let hits = self.index.search(query).await.map_err(CoreError::Search)?;
        debug!(
            "resolved query (query_len={}, hits={})",
            query.len(),
            hits.len()
        );
        match hits.as_slice() {
            [] => Ok(Outcome::NoMatch),
            [only] => Ok(Outcome::Direct(self.fetch(only).await?)),
            _ => {
                let mut candidates = Vec::with_capacity(hits.len());
                for id in &hits {
                    let record = self.fetch(id).await?;
                    candidates.push(InlineOption::new(location_label(&record), id.clone()));
                }
                Ok(Outcome::Ambiguous(into_rows(candidates)))
            }
        }
    }

    /// Fetch the record a correlation token refers to.
    pub async fn fetch(&self, token: &str) -> Result<LocationRecord, CoreError> {
        self.index
            .fetch(token)
            .await
            .map_err(|source| CoreError::Fetch {
                id: token.to_string(),
                source,
            })
    }
}

/// Group options into rows of at most [`OPTIONS_PER_ROW`], keeping order.
pub fn into_rows(options: Vec<InlineOption>) -> Vec<Vec<InlineOption>> {
    options
        .chunks(OPTIONS_PER_ROW)
        .map(<[InlineOption]>::to_vec)
        .collect()
}
