/// How rows of one entity relate to rows of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// Target rows hold `foreign_key` pointing at this entity's identity.
    HasMany { foreign_key: String },
    /// This entity's rows hold `foreign_key` pointing at the target's identity.
    BelongsTo { foreign_key: String },
    /// Association through `pivot_table`, whose `local_key` column references
    /// this entity and whose `foreign_key` column references the target.
    ManyToMany {
        pivot_table: String,
        local_key: String,
        foreign_key: String,
    },
}

/// A relation from one entity mapper to the table of another.
///
/// Loaded rows are attached under the target table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub target: String,
    pub kind: RelationKind,
}

impl Relation {
    pub fn has_many(target: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: RelationKind::HasMany {
                foreign_key: foreign_key.into(),
            },
        }
    }

    pub fn belongs_to(target: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: RelationKind::BelongsTo {
                foreign_key: foreign_key.into(),
            },
        }
    }

    pub fn many_to_many(
        target: impl Into<String>,
        pivot_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            kind: RelationKind::ManyToMany {
                pivot_table: pivot_table.into(),
                local_key: local_key.into(),
                foreign_key: foreign_key.into(),
            },
        }
    }

    /// Every identifier this relation splices into statement text.
    pub(crate) fn identifiers(&self) -> Vec<&str> {
        let mut names = vec![self.target.as_str()];
        match &self.kind {
            RelationKind::HasMany { foreign_key } | RelationKind::BelongsTo { foreign_key } => {
                names.push(foreign_key.as_str());
            }
            RelationKind::ManyToMany {
                pivot_table,
                local_key,
                foreign_key,
            } => {
                names.extend([pivot_table.as_str(), local_key.as_str(), foreign_key.as_str()]);
            }
        }
        names
    }
}

/// Inserts `relation`, replacing any earlier relation to the same target.
///
/// A replaced relation keeps its original position so load order stays
/// the order in which targets were first registered.
pub fn register(relations: &mut Vec<Relation>, relation: Relation) {
    match relations.iter_mut().find(|r| r.target == relation.target) {
        Some(existing) => *existing = relation,
        None => relations.push(relation),
    }
}
