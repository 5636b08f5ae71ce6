//! Eager relation loading.
//!
//! Given rows of one entity and its relation registry, attaches related
//! rows to each of them. Loading is exactly one level deep: related rows
//! come back bare, their own relations are not followed. This bounds
//! mutually-referencing entities without any cycle bookkeeping.
//!
//! Every (row, relation) pair is one independent statement, run in order.
//! There is no batching, caching or isolation, and the first failure aborts
//! the whole batch.

use serde_json::Value;

use crate::storage::{QueryExecutor, Result, Row};

use super::relations::{Relation, RelationKind};
use super::statements::{self, IDENTITY_FIELD};

/// Attaches every relation in `relations` to every row in `rows`.
pub async fn load_relations(
    executor: &dyn QueryExecutor,
    relations: &[Relation],
    mut rows: Vec<Row>,
) -> Result<Vec<Row>> {
    if relations.is_empty() {
        return Ok(rows);
    }

    for row in &mut rows {
        for relation in relations {
            let related = load_relation(executor, relation, row).await?;
            row.insert(relation.target.clone(), related);
        }
    }

    tracing::debug!(
        rows = rows.len(),
        relations = relations.len(),
        "Loaded relations"
    );

    Ok(rows)
}

async fn load_relation(
    executor: &dyn QueryExecutor,
    relation: &Relation,
    row: &Row,
) -> Result<Value> {
    match &relation.kind {
        RelationKind::HasMany { foreign_key } => {
            let stmt = statements::select_by_foreign_key(&relation.target, foreign_key);
            let related = executor
                .fetch_many(&stmt, &[foreign_key_arg(row.get(IDENTITY_FIELD))])
                .await?;
            Ok(rows_to_value(related))
        }
        RelationKind::BelongsTo { foreign_key } => {
            let key = match row.get(foreign_key) {
                Some(value) if !value.is_null() => identity_arg(value),
                _ => return Ok(Value::Null),
            };
            let stmt = statements::select_by_id(&relation.target);
            let related = executor.fetch_one(&stmt, &[key]).await?;
            Ok(related.map(Value::Object).unwrap_or(Value::Null))
        }
        RelationKind::ManyToMany {
            pivot_table,
            local_key,
            foreign_key,
        } => {
            let stmt = statements::select_through_pivot(
                &relation.target,
                pivot_table,
                local_key,
                foreign_key,
            );
            let related = executor
                .fetch_many(&stmt, &[foreign_key_arg(row.get(IDENTITY_FIELD))])
                .await?;
            Ok(rows_to_value(related))
        }
    }
}

fn rows_to_value(rows: Vec<Row>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}

/// Normalizes a key compared against a foreign-key or pivot column.
///
/// Non-identity columns are text, so numeric keys are bound as their
/// decimal text. Engines with strict comparison typing reject a
/// text-to-integer comparison otherwise.
pub(crate) fn foreign_key_arg(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) => Value::String(n.to_string()),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

/// Normalizes a key compared against an identity column.
///
/// Foreign keys are stored as text; they are bound as integers whenever
/// they parse as one.
pub(crate) fn identity_arg(value: &Value) -> Value {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BackendKind, OrmError};
    use crate::testing::{row, ScriptedExecutor};
    use serde_json::json;

    #[test]
    fn test_foreign_key_arg_stringifies_numbers() {
        assert_eq!(foreign_key_arg(Some(&json!(1))), json!("1"));
        assert_eq!(foreign_key_arg(Some(&json!("7"))), json!("7"));
        assert_eq!(foreign_key_arg(None), Value::Null);
    }

    #[test]
    fn test_identity_arg_parses_numeric_text() {
        assert_eq!(identity_arg(&json!("1")), json!(1));
        assert_eq!(identity_arg(&json!(" 12 ")), json!(12));
        assert_eq!(identity_arg(&json!(3)), json!(3));
        assert_eq!(identity_arg(&json!("abc")), json!("abc"));
    }

    #[tokio::test]
    async fn test_no_relations_issues_no_statements() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        let rows = vec![row(json!({"id": 1}))];

        let loaded = load_relations(&executor, &[], rows.clone()).await.unwrap();

        assert_eq!(loaded, rows);
        assert!(executor.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_has_many_attaches_array_under_target_name() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        executor
            .push_rows(vec![
                row(json!({"id": 10, "title": "Hi", "user_id": "1"})),
                row(json!({"id": 11, "title": "Again", "user_id": "1"})),
            ])
            .await;
        let relations = [Relation::has_many("posts", "user_id")];

        let loaded = load_relations(&executor, &relations, vec![row(json!({"id": 1}))])
            .await
            .unwrap();

        assert_eq!(loaded[0]["posts"].as_array().unwrap().len(), 2);
        assert_eq!(loaded[0]["posts"][0]["title"], "Hi");

        let calls = executor.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].stmt, "SELECT * FROM posts WHERE user_id = ?");
        assert_eq!(calls[0].args, vec![json!("1")]);
    }

    #[tokio::test]
    async fn test_belongs_to_attaches_single_row() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        executor
            .push_rows(vec![row(json!({"id": 1, "name": "Ann"}))])
            .await;
        let relations = [Relation::belongs_to("users", "user_id")];

        let loaded = load_relations(
            &executor,
            &relations,
            vec![row(json!({"id": 5, "user_id": "1"}))],
        )
        .await
        .unwrap();

        assert_eq!(loaded[0]["users"], json!({"id": 1, "name": "Ann"}));
        let calls = executor.calls().await;
        assert_eq!(calls[0].stmt, "SELECT * FROM users WHERE id = ?");
        assert_eq!(calls[0].args, vec![json!(1)]);
    }

    #[tokio::test]
    async fn test_belongs_to_missing_target_attaches_null() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        executor.push_rows(Vec::new()).await;
        let relations = [Relation::belongs_to("users", "user_id")];

        let loaded = load_relations(
            &executor,
            &relations,
            vec![row(json!({"id": 5, "user_id": "99"}))],
        )
        .await
        .unwrap();

        assert_eq!(loaded[0]["users"], Value::Null);
    }

    #[tokio::test]
    async fn test_belongs_to_without_foreign_key_skips_round_trip() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        let relations = [Relation::belongs_to("users", "user_id")];

        let loaded = load_relations(
            &executor,
            &relations,
            vec![
                row(json!({"id": 5})),
                row(json!({"id": 6, "user_id": null})),
            ],
        )
        .await
        .unwrap();

        assert_eq!(loaded[0]["users"], Value::Null);
        assert_eq!(loaded[1]["users"], Value::Null);
        assert!(executor.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_many_to_many_queries_through_pivot() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        executor
            .push_rows(vec![row(json!({"id": 1, "name": "go"}))])
            .await;
        let relations = [Relation::many_to_many(
            "tags",
            "post_tags",
            "post_id",
            "tag_id",
        )];

        let loaded = load_relations(&executor, &relations, vec![row(json!({"id": 1}))])
            .await
            .unwrap();

        assert_eq!(loaded[0]["tags"], json!([{"id": 1, "name": "go"}]));
        let calls = executor.calls().await;
        assert!(calls[0]
            .stmt
            .contains("JOIN post_tags ON post_tags.tag_id = CAST(tags.id AS CHAR(20))"));
        assert!(calls[0].stmt.ends_with("WHERE post_tags.post_id = ?"));
        assert_eq!(calls[0].args, vec![json!("1")]);
    }

    #[tokio::test]
    async fn test_many_to_many_statement_is_backend_independent() {
        let relations = [Relation::many_to_many(
            "tags",
            "post_tags",
            "post_id",
            "tag_id",
        )];

        let mut statements = Vec::new();
        for kind in [BackendKind::Sqlite, BackendKind::MySql, BackendKind::Postgres] {
            let executor = ScriptedExecutor::new(kind);
            load_relations(&executor, &relations, vec![row(json!({"id": 3}))])
                .await
                .unwrap();
            let calls = executor.calls().await;
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].args, vec![json!("3")]);
            statements.push(calls[0].stmt.clone());
        }

        assert_eq!(statements[0], statements[1]);
        assert_eq!(statements[1], statements[2]);
        // No text = integer comparison reaches the engine.
        assert!(!statements[0].contains("= tags.id"));
    }

    #[tokio::test]
    async fn test_one_statement_per_row_and_relation_in_order() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        let relations = [
            Relation::has_many("posts", "user_id"),
            Relation::has_many("comments", "user_id"),
        ];
        let rows = vec![row(json!({"id": 1})), row(json!({"id": 2}))];

        let loaded = load_relations(&executor, &relations, rows).await.unwrap();

        let calls = executor.calls().await;
        let issued: Vec<_> = calls
            .iter()
            .map(|c| (c.stmt.as_str(), c.args[0].clone()))
            .collect();
        assert_eq!(
            issued,
            vec![
                ("SELECT * FROM posts WHERE user_id = ?", json!("1")),
                ("SELECT * FROM comments WHERE user_id = ?", json!("1")),
                ("SELECT * FROM posts WHERE user_id = ?", json!("2")),
                ("SELECT * FROM comments WHERE user_id = ?", json!("2")),
            ]
        );
        assert_eq!(loaded[1]["comments"], json!([]));
    }

    #[tokio::test]
    async fn test_failure_aborts_the_batch() {
        let executor = ScriptedExecutor::new(BackendKind::Sqlite);
        executor.push_rows(Vec::new()).await;
        executor
            .push_error(OrmError::QueryFailed("no such table: posts".to_string()))
            .await;
        let relations = [Relation::has_many("posts", "user_id")];
        let rows = vec![row(json!({"id": 1})), row(json!({"id": 2}))];

        let result = load_relations(&executor, &relations, rows).await;

        assert_eq!(
            result,
            Err(OrmError::QueryFailed("no such table: posts".to_string()))
        );
    }
}
