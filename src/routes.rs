//! Repository → build-job routing.
//!
//! An explicit allow-list of which repositories may trigger production
//! jobs. An unmapped repository yields no route, never a fallback; that
//! is the point of the table.

use crate::JobConfig;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct JobRouter {
    jobs: HashMap<String, String>,
}

impl JobRouter {
    /// Builds the routing table from configured entries. A duplicate repo
    /// entry keeps the last template, matching TOML reading order.
    pub fn from_config(entries: &[JobConfig]) -> Self {
        let jobs = entries
            .iter()
            .map(|j| (j.repo.clone(), j.template.clone()))
            .collect();
        Self { jobs }
    }

    /// Returns the job invocation template for a repository, or `None`
    /// if the repository is not registered.
    pub fn lookup(&self, repository_name: &str) -> Option<&str> {
        self.jobs.get(repository_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
