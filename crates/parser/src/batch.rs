//! Sequential multi-document processing
//!
//! Documents are fetched, parsed and handed to a sink one at a time. Each
//! document gets a fresh parser, so no definitions leak from one document
//! into the next.

use crate::swagger::SwaggerParser;
use restgen_common::{ApiModel, GeneratorError, Result};
use std::fs;

/// Where batch documents are read from
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource {
    /// Raw text of the document at `location`
    fn fetch(&self, location: &str) -> Result<String>;
}

/// Reads documents from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl DocumentSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String> {
        fs::read_to_string(location).map_err(|e| {
            GeneratorError::Fetch(format!("Failed to read document {}: {}", location, e))
        })
    }
}

/// What to do when one document of a batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop and return the failure
    #[default]
    Abort,
    /// Record the failure and start the next document
    Continue,
}

impl FailurePolicy {
    pub fn from_continue_flag(continue_on_error: bool) -> Self {
        if continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }
}

/// A document that failed under [`FailurePolicy::Continue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub location: String,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Locations handed to the sink successfully, in order
    pub processed: Vec<String>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Process `locations` strictly in order
///
/// A document is complete (fetched, both passes run, sink returned) before
/// the next one is fetched. Fetch, parse and sink errors all count as a
/// failure of that document.
pub fn run_batch<S, F>(
    source: &S,
    locations: &[String],
    policy: FailurePolicy,
    mut sink: F,
) -> Result<BatchReport>
where
    S: DocumentSource + ?Sized,
    F: FnMut(ApiModel) -> Result<()>,
{
    let mut report = BatchReport::default();

    for location in locations {
        tracing::debug!(location = %location, "processing document");

        let outcome = source
            .fetch(location)
            .and_then(|content| SwaggerParser::from_content(&content, location))
            .and_then(|parser| parser.parse())
            .and_then(&mut sink);

        match outcome {
            Ok(()) => report.processed.push(location.clone()),
            Err(e) => match policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Continue => {
                    tracing::warn!(location = %location, error = %e, "document failed, continuing");
                    report.failures.push(BatchFailure {
                        location: location.clone(),
                        error: e.to_string(),
                    });
                }
            },
        }
    }

    Ok(report)
}
