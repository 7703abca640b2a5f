//! Parallel transform over the named fields of one record.
//!
//! Each present field runs on its own task; results are joined before any
//! of them is inspected. The caller gets every output or a single
//! [`CryptoError::Record`] listing each failing field, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::{CryptoError, FieldError, FieldFailure, FieldOp};

/// One field handed to [`transform_fields`].
#[derive(Debug, Clone)]
pub struct FieldInput {
    name: &'static str,
    value: Option<String>,
    required: bool,
}

impl FieldInput {
    /// Absent or empty is a hard error.
    pub fn required(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(value.into()),
            required: true,
        }
    }

    /// Absent or empty passes through as `None` without a crypto call.
    pub fn optional(name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            value,
            required: false,
        }
    }
}

/// Transformed values keyed by field name.
#[derive(Debug, Default)]
pub struct FieldOutputs {
    values: HashMap<&'static str, Option<String>>,
}

impl FieldOutputs {
    /// Removes and returns the output for `name`; `None` for absent optionals.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.values.remove(name).flatten()
    }

    /// Output of a required field. A name that was never submitted, or was
    /// already taken, is an error rather than an empty value.
    pub fn take_required(&mut self, name: &'static str) -> Result<String, CryptoError> {
        self.take(name).ok_or(CryptoError::MissingOutput(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Applies `transform` to every present field concurrently.
///
/// Cancelling `cancel` aborts the outstanding tasks and returns
/// [`CryptoError::Cancelled`] without waiting for them.
pub async fn transform_fields<F>(
    op: FieldOp,
    fields: Vec<FieldInput>,
    transform: F,
    cancel: &CancellationToken,
) -> Result<FieldOutputs, CryptoError>
where
    F: Fn(&str) -> Result<String, FieldError> + Send + Sync + 'static,
{
    if cancel.is_cancelled() {
        return Err(CryptoError::Cancelled);
    }

    let transform = Arc::new(transform);
    let mut outputs = FieldOutputs::default();
    let mut failures = Vec::new();
    let mut names = HashMap::new();
    let mut tasks = JoinSet::new();

    for field in fields {
        match field.value.filter(|v| !v.is_empty()) {
            Some(value) => {
                let transform = Arc::clone(&transform);
                let name = field.name;
                let handle = tasks.spawn(async move { (name, transform(&value)) });
                names.insert(handle.id(), name);
            }
            None if field.required => failures.push(FieldFailure {
                field: field.name,
                error: FieldError::Missing,
            }),
            None => {
                outputs.values.insert(field.name, None);
            }
        }
    }

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tasks.abort_all();
                return Err(CryptoError::Cancelled);
            }
            joined = tasks.join_next() => joined,
        };

        match joined {
            None => break,
            Some(Ok((name, Ok(value)))) => {
                outputs.values.insert(name, Some(value));
            }
            Some(Ok((name, Err(error)))) => failures.push(FieldFailure { field: name, error }),
            Some(Err(join_err)) => failures.push(FieldFailure {
                field: names.get(&join_err.id()).copied().unwrap_or("unknown"),
                error: FieldError::Aborted,
            }),
        }
    }

    if failures.is_empty() {
        Ok(outputs)
    } else {
        failures.sort_by_key(|f| f.field);
        Err(CryptoError::Record { op, failures })
    }
}
