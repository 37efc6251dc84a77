//! GQL request executor.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::GqlError;
use crate::retry::{AttemptOutcome, AttemptStrategy};
use crate::session::{ClientSession, GQL_URL};
use crate::transport::{HttpTransport, Transport};

/// Executor for named GQL operations.
///
/// Drives request bodies built from the shared templates through the
/// [`AttemptStrategy`], decoding single or positionally batched transport
/// responses. Callers only ever see the final value or a terminal
/// [`GqlError::Retry`] carrying the full attempt history.
#[derive(Clone)]
pub struct GqlClient {
    url: String,
    session: ClientSession,
    strategy: AttemptStrategy,
    transport: Arc<dyn Transport>,
}

impl GqlClient {
    /// Create a client for the production endpoint with default retries.
    #[must_use]
    pub fn new(session: ClientSession) -> Self {
        Self {
            url: GQL_URL.to_string(),
            session,
            strategy: AttemptStrategy::default(),
            transport: Arc::new(HttpTransport::default()),
        }
    }

    /// Override the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the attempt strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: AttemptStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Override the transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    async fn post_once(&self, body: &Value) -> Result<Value, GqlError> {
        let reply = self
            .transport
            .post(&self.url, body, self.session.headers())
            .await?;
        debug!(
            payload = %body,
            status = %reply.status,
            response = %reply.body,
            "GQL request attempt"
        );
        if !reply.status.is_success() {
            return Err(GqlError::HttpStatus {
                status: reply.status,
                body: truncate_body(&reply.body),
            });
        }
        let value: Value = serde_json::from_str(&reply.body)?;
        Ok(value)
    }

    /// Execute a single (non-batched) operation.
    ///
    /// The transport must return one JSON object; `parse` converts it to the
    /// typed result, and a shape mismatch inside `parse` is itself subject to
    /// the retryability test. On exhaustion this raises [`GqlError::Retry`]
    /// with the ordered attempt history.
    pub async fn execute_single<T, P>(
        &self,
        operation_name: &str,
        body: Value,
        parse: P,
    ) -> Result<T, GqlError>
    where
        P: Fn(Value) -> Result<T, GqlError>,
    {
        let body = &body;
        let parse = &parse;
        let outcome = self
            .strategy
            .run(
                move || async move {
                    let value = self.post_once(body).await?;
                    if value.is_array() {
                        return Err(GqlError::InvalidShape {
                            path: Vec::new(),
                            message: "expected a single response object, got an array".to_string(),
                        });
                    }
                    parse(value)
                },
                validate_response,
                GqlError::recoverable,
                GqlError::diagnostic,
            )
            .await;
        Self::handle_outcome(outcome, operation_name)
    }

    /// Execute a positionally batched operation.
    ///
    /// The transport response must be a JSON array aligned with `bodies`;
    /// anything else is an immediate shape error for that attempt. `parse`
    /// is applied to each element in order.
    pub async fn execute_batch<T, P>(
        &self,
        operation_name: &str,
        bodies: Vec<Value>,
        parse: P,
    ) -> Result<Vec<T>, GqlError>
    where
        P: Fn(Value) -> Result<T, GqlError>,
    {
        let body = Value::Array(bodies);
        let body = &body;
        let parse = &parse;
        let outcome = self
            .strategy
            .run(
                move || async move {
                    let value = self.post_once(body).await?;
                    let items = match value {
                        Value::Array(items) => items,
                        other => {
                            return Err(GqlError::InvalidShape {
                                path: Vec::new(),
                                message: format!(
                                    "expected a batched response array, got {}",
                                    json_type_name(&other)
                                ),
                            })
                        }
                    };
                    items.into_iter().map(parse).collect()
                },
                validate_response,
                GqlError::recoverable,
                GqlError::diagnostic,
            )
            .await;
        Self::handle_outcome(outcome, operation_name)
    }

    fn handle_outcome<T>(
        outcome: AttemptOutcome<T, GqlError>,
        operation_name: &str,
    ) -> Result<T, GqlError> {
        match outcome {
            AttemptOutcome::Success { errors, value } => {
                if !errors.is_empty() {
                    debug!(
                        operation = operation_name,
                        attempts = errors.len() + 1,
                        "operation succeeded after retries"
                    );
                }
                Ok(value)
            }
            AttemptOutcome::Failure { errors } => {
                debug!(
                    operation = operation_name,
                    attempts = errors.len(),
                    "operation failed all attempts"
                );
                Err(GqlError::Retry {
                    operation_name: operation_name.to_string(),
                    errors,
                })
            }
        }
    }
}

// Parsed responses are already validated structurally; nothing further to
// check before accepting an attempt.
fn validate_response<T>(_: &T) -> Result<(), GqlError> {
    Ok(())
}

/// Random 16-byte hex token attached to mutating requests so the server can
/// deduplicate retried submissions. Generated exactly once per logical call,
/// never per attempt.
pub(crate) fn transaction_id() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 4096;
    if body.len() > MAX_LEN {
        let mut truncated: String = body.chars().take(MAX_LEN).collect();
        truncated.push('…');
        truncated
    } else {
        body.to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
