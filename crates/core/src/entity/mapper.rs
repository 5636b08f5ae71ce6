use std::sync::Arc;

use serde_json::Value;

use crate::storage::{MutateResult, QueryExecutor, Result, Row};

use super::loader::load_relations;
use super::relations::{self, Relation};
use super::statements::{self, validate_identifier};

/// Maps one table to plain rows and hydrates its relations on every read.
///
/// Mappers are built and wired together once at startup, then shared
/// read-only (typically behind an `Arc`). Relation registration takes
/// `&mut self`, so it can only happen before the mapper is shared.
pub struct EntityMapper {
    executor: Arc<dyn QueryExecutor>,
    table: String,
    fields: Vec<String>,
    relations: Vec<Relation>,
}

impl std::fmt::Debug for EntityMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityMapper")
            .field("backend", &self.executor.kind())
            .field("table", &self.table)
            .field("fields", &self.fields)
            .field("relations", &self.relations)
            .finish()
    }
}

impl EntityMapper {
    /// Creates a mapper for `table` with its ordered field list.
    ///
    /// A field named `id` is the identity column; every other field is
    /// stored as text.
    pub fn new<I, S>(executor: Arc<dyn QueryExecutor>, table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executor,
            table: table.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            relations: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    /// Rows of `target` carry `foreign_key` pointing at this entity.
    pub fn has_many(&mut self, target: &EntityMapper, foreign_key: impl Into<String>) -> &mut Self {
        relations::register(
            &mut self.relations,
            Relation::has_many(target.table(), foreign_key),
        );
        self
    }

    /// Rows of this entity carry `foreign_key` pointing at `target`.
    pub fn belongs_to(
        &mut self,
        target: &EntityMapper,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        relations::register(
            &mut self.relations,
            Relation::belongs_to(target.table(), foreign_key),
        );
        self
    }

    /// Rows of this entity and `target` are linked through `pivot_table`.
    ///
    /// The pivot table is not created here; it must already exist, or be
    /// bootstrapped through a mapper of its own.
    pub fn many_to_many(
        &mut self,
        target: &EntityMapper,
        pivot_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        relations::register(
            &mut self.relations,
            Relation::many_to_many(target.table(), pivot_table, local_key, foreign_key),
        );
        self
    }

    /// Creates the table if it does not exist yet.
    pub async fn bootstrap(&self) -> Result<()> {
        validate_identifier(&self.table)?;
        for field in &self.fields {
            validate_identifier(field)?;
        }
        for relation in &self.relations {
            for name in relation.identifiers() {
                validate_identifier(name)?;
            }
        }

        let stmt = statements::create_table(self.executor.kind(), &self.table, &self.fields);
        self.executor.mutate(&stmt, &[]).await?;

        tracing::info!(table = %self.table, backend = %self.executor.kind(), "Bootstrapped table");
        Ok(())
    }

    /// Inserts exactly the supplied fields.
    ///
    /// The identity is assigned by the engine and must not be supplied.
    /// Fields outside the declared list are not rejected here; the engine
    /// reports them.
    pub async fn create(&self, record: &Row) -> Result<MutateResult> {
        let (keys, args) = split_record(record)?;
        let stmt = statements::insert(&self.table, &keys);
        self.executor.mutate(&stmt, &args).await
    }

    /// Fetches every row with its relations attached.
    pub async fn all(&self) -> Result<Vec<Row>> {
        let rows = self
            .executor
            .fetch_many(&statements::select_all(&self.table), &[])
            .await?;
        load_relations(self.executor.as_ref(), &self.relations, rows).await
    }

    /// Fetches one row by identity with its relations attached.
    pub async fn find(&self, id: i64) -> Result<Option<Row>> {
        let Some(row) = self
            .executor
            .fetch_one(&statements::select_by_id(&self.table), &[Value::from(id)])
            .await?
        else {
            return Ok(None);
        };

        let mut hydrated = load_relations(self.executor.as_ref(), &self.relations, vec![row])
            .await?;
        Ok(hydrated.pop())
    }

    /// Sets exactly the supplied fields on the row with identity `id`.
    ///
    /// A missing row is not an error: the result reports zero affected rows.
    pub async fn update(&self, id: i64, record: &Row) -> Result<MutateResult> {
        let (keys, mut args) = split_record(record)?;
        args.push(Value::from(id));
        let stmt = statements::update_by_id(&self.table, &keys);
        self.executor.mutate(&stmt, &args).await
    }

    /// Deletes the row with identity `id`.
    pub async fn delete(&self, id: i64) -> Result<MutateResult> {
        self.executor
            .mutate(&statements::delete_by_id(&self.table), &[Value::from(id)])
            .await
    }
}

/// Splits a record into column names and positional arguments, in the
/// same order.
fn split_record(record: &Row) -> Result<(Vec<&str>, Vec<Value>)> {
    let mut keys = Vec::with_capacity(record.len());
    let mut args = Vec::with_capacity(record.len());
    for (key, value) in record {
        validate_identifier(key)?;
        keys.push(key.as_str());
        args.push(value.clone());
    }
    Ok((keys, args))
}
