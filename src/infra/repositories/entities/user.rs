//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Condition, LikeExpr};
use sea_orm::{QueryFilter, Select};

use domain::validation::{fold_name, normalize_email};
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// `name` folded to lowercase, kept in step by every write
    pub name_lower: String,
    /// Unique among active rows only (partial index `ux_users_email_active`)
    pub email: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft delete flag (false = deleted)
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// All rows that have not been soft deleted
    pub fn find_active() -> Select<Entity> {
        Self::find().filter(Column::IsActive.eq(true))
    }

    pub fn find_active_by_id(id: i32) -> Select<Entity> {
        Self::find_by_id(id).filter(Column::IsActive.eq(true))
    }

    /// The email is normalized before matching.
    pub fn find_active_by_email(email: &str) -> Select<Entity> {
        Self::find_active().filter(Column::Email.eq(normalize_email(email)))
    }
}

const LIKE_ESCAPE: char = '\\';

/// Case-insensitive substring match on name or email.
///
/// Both sides are folded in Rust: names through `name_lower`, emails at
/// normalization. The term is matched literally.
pub fn matching(select: Select<Entity>, term: &str) -> Select<Entity> {
    let pattern = format!("%{}%", escape_like(&fold_name(term)));
    select.filter(
        Condition::any()
            .add(Column::NameLower.like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)))
            .add(Column::Email.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))),
    )
}

/// Escape LIKE wildcards so they match themselves.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
            is_active: model.is_active,
        }
    }
}
