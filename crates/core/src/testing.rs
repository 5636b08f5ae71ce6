//! Scripted executor for exercising the mapper without a database.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::storage::{BackendKind, MutateResult, OrmError, QueryExecutor, Result, Row};

/// A statement the executor received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub stmt: String,
    pub args: Vec<Value>,
}

#[derive(Debug)]
enum Response {
    Rows(Vec<Row>),
    Mutate(MutateResult),
    Error(OrmError),
}

/// Replays queued responses in order and records every call.
///
/// When the queue is empty, reads return no rows and mutations report
/// zero affected rows.
pub struct ScriptedExecutor {
    kind: BackendKind,
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExecutor {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn push_rows(&self, rows: Vec<Row>) {
        self.responses.lock().await.push_back(Response::Rows(rows));
    }

    pub async fn push_mutate(&self, result: MutateResult) {
        self.responses
            .lock()
            .await
            .push_back(Response::Mutate(result));
    }

    pub async fn push_error(&self, error: OrmError) {
        self.responses.lock().await.push_back(Response::Error(error));
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn next(&self, stmt: &str, args: &[Value]) -> Option<Response> {
        self.calls.lock().await.push(Call {
            stmt: stmt.to_string(),
            args: args.to_vec(),
        });
        self.responses.lock().await.pop_front()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn mutate(&self, stmt: &str, args: &[Value]) -> Result<MutateResult> {
        match self.next(stmt, args).await {
            Some(Response::Mutate(result)) => Ok(result),
            Some(Response::Error(error)) => Err(error),
            Some(Response::Rows(_)) | None => Ok(MutateResult::default()),
        }
    }

    async fn fetch_many(&self, stmt: &str, args: &[Value]) -> Result<Vec<Row>> {
        match self.next(stmt, args).await {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Error(error)) => Err(error),
            Some(Response::Mutate(_)) | None => Ok(Vec::new()),
        }
    }

    async fn fetch_one(&self, stmt: &str, args: &[Value]) -> Result<Option<Row>> {
        Ok(self.fetch_many(stmt, args).await?.into_iter().next())
    }
}

/// Builds a row from a JSON object literal.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
