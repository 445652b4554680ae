use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::Set, ConnectionTrait, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// User's unique email address. Contests and participations refer to users by email.
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub photo_url: Option<String>,
    pub role: Role,
    /// Number of contests this user has won.
    pub win_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform-wide role of a user.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "user")]
    User,

    #[sea_orm(string_value = "creator")]
    Creator,

    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Creators and admins may manage contests.
    pub fn can_create_contests(self) -> bool {
        matches!(self, Role::Creator | Role::Admin)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical form of an email: trimmed and lowercased. Every stored or
/// queried email goes through here so lookups and ownership checks agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
}

impl Model {
    pub async fn create(
        db: &DbConn,
        name: &str,
        email: &str,
        password: &str,
        photo_url: Option<&str>,
        role: Role,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            name: Set(name.to_owned()),
            email: Set(normalize_email(email)),
            password_hash: Set(hash_password(password)?),
            photo_url: Set(photo_url.map(str::to_owned)),
            role: Set(role),
            win_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn find(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn count_all(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(normalize_email(email)))
            .one(db)
            .await
    }

    /// Checks a plaintext password against the stored hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(user_id = self.id, error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    /// Looks up a user by email and checks the password.
    ///
    /// Returns `Ok(None)` for an unknown email or a wrong password.
    pub async fn verify_credentials(
        db: &DbConn,
        email: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_email(db, email)
            .await?
            .filter(|user| user.verify_password(password)))
    }

    /// Role of the user with the given email, `Role::User` when no such user exists.
    pub async fn role_for_email(db: &DbConn, email: &str) -> Result<Role, DbErr> {
        Ok(Self::find_by_email(db, email)
            .await?
            .map(|user| user.role)
            .unwrap_or_default())
    }

    pub async fn set_role(db: &DbConn, id: i64, role: Role) -> Result<Model, DbErr> {
        let user = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User not found".to_string()))?;

        let mut active: ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    /// Adds one win to the user with `email`. Returns the number of rows touched,
    /// which is zero when the winner has no account.
    pub async fn increment_wins<C>(db: &C, email: &str) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = Entity::update_many()
            .col_expr(Column::WinCount, Expr::col(Column::WinCount).add(1))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Email.eq(normalize_email(email)))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// One page of users with at least one win, best first.
    ///
    /// `page` is 1-based. Returns the page and the total number of ranked users.
    pub async fn leaderboard(
        db: &DbConn,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let paginator = Entity::find()
            .filter(Column::WinCount.gt(0))
            .order_by_desc(Column::WinCount)
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(db, per_page.max(1));

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users, total))
    }
}
