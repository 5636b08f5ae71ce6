//! Entity wiring for the demo schema.
//!
//! Users write posts, posts carry tags through the `post_tags` pivot. The
//! pivot has a mapper of its own so it is bootstrapped like any other table
//! and can be written through the API.

use std::sync::Arc;

use minorm_core::entity::EntityMapper;
use minorm_core::storage::{QueryExecutor, Result};

/// Every mapper the application serves, wired and ready to share.
#[derive(Debug, Clone)]
pub struct Models {
    pub users: Arc<EntityMapper>,
    pub posts: Arc<EntityMapper>,
    pub tags: Arc<EntityMapper>,
    pub post_tags: Arc<EntityMapper>,
}

impl Models {
    /// Looks a mapper up by its table name.
    pub fn get(&self, name: &str) -> Option<&Arc<EntityMapper>> {
        self.iter().find(|mapper| mapper.table() == name)
    }

    /// Mappers in bootstrap order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityMapper>> {
        [&self.users, &self.posts, &self.tags, &self.post_tags].into_iter()
    }
}

/// Builds the mappers and registers their relations.
pub fn define_models(executor: Arc<dyn QueryExecutor>) -> Models {
    let mut users = EntityMapper::new(executor.clone(), "users", ["id", "name", "email"]);
    let mut posts = EntityMapper::new(
        executor.clone(),
        "posts",
        ["id", "title", "content", "user_id"],
    );
    let mut tags = EntityMapper::new(executor.clone(), "tags", ["id", "name"]);
    let post_tags = EntityMapper::new(executor, "post_tags", ["post_id", "tag_id"]);

    users.has_many(&posts, "user_id");
    posts
        .belongs_to(&users, "user_id")
        .many_to_many(&tags, "post_tags", "post_id", "tag_id");
    tags.many_to_many(&posts, "post_tags", "tag_id", "post_id");

    Models {
        users: Arc::new(users),
        posts: Arc::new(posts),
        tags: Arc::new(tags),
        post_tags: Arc::new(post_tags),
    }
}

/// Creates every table that does not exist yet.
pub async fn migrate(models: &Models) -> Result<()> {
    for mapper in models.iter() {
        mapper.bootstrap().await?;
    }
    tracing::info!("Schema is up to date");
    Ok(())
}
