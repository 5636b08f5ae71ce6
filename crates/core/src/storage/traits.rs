use async_trait::async_trait;
use serde_json::Value;

use super::{BackendKind, MutateResult, Result, Row};

/// Uniform statement execution across database engines.
///
/// Statements are plain SQL text with `?` positional placeholders and are
/// passed through unchanged apart from placeholder binding. Each call is an
/// independent unit of work against the shared connection or pool: there
/// are no transactions and no ordering guarantee between concurrent calls.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// The engine behind this executor.
    fn kind(&self) -> BackendKind;

    /// Runs an INSERT, UPDATE, DELETE or DDL statement.
    async fn mutate(&self, stmt: &str, args: &[Value]) -> Result<MutateResult>;

    /// Runs a query and returns every row, in the order the engine yields them.
    async fn fetch_many(&self, stmt: &str, args: &[Value]) -> Result<Vec<Row>>;

    /// Runs a query and returns its first row, or `None` when nothing matched.
    async fn fetch_one(&self, stmt: &str, args: &[Value]) -> Result<Option<Row>>;
}
