use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{ActiveValue::Set, ConnectionTrait, PaginatorTrait, QueryOrder, QuerySelect, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    /// Lowercased `name`, kept in step with it for case-insensitive search.
    #[serde(skip)]
    pub search_name: String,
    pub image: Option<String>,
    pub description: String,
    /// Entry fee.
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub category: String,
    pub deadline: DateTime<Utc>,

    pub creator_email: String,
    pub creator_name: String,

    pub status: ContestStatus,
    pub participation_count: i64,

    pub winner_email: Option<String>,
    pub winner_name: Option<String>,
    pub winner_photo: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review lifecycle of a contest: created `Pending`, then `Accepted` or `Rejected`
/// by an admin, and `Completed` once a winner is declared.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contest_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContestStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "accepted")]
    Accepted,

    #[sea_orm(string_value = "rejected")]
    Rejected,

    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participation::Entity")]
    Participations,
}

impl Related<super::participation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields supplied when a creator submits a contest.
#[derive(Debug, Clone)]
pub struct NewContest {
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub category: String,
    pub deadline: DateTime<Utc>,
    pub creator_email: String,
    pub creator_name: String,
}

/// Partial update of the editable contest fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ContestChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub prize_money: Option<f64>,
    pub task_instruction: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Ordering for the public contest listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Filters for the public listing of accepted contests.
#[derive(Debug, Clone)]
pub struct ContestSearch {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: ListingSort,
    /// 1-based page number.
    pub page: u64,
    pub size: u64,
}

/// Result of trying to declare a winner.
#[derive(Debug, Clone, PartialEq)]
pub enum WinnerOutcome {
    Declared(Model),
    AlreadyDeclared,
    ContestNotFound,
}

/// `LIKE` pattern matching `text` anywhere, with `%`, `_` and `\` escaped so
/// they only match themselves.
fn contains_pattern(text: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

impl Model {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.creator_email == user::normalize_email(email)
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline <= now
    }

    /// Stripe-style amount in minor units (cents) for the entry fee.
    pub fn price_minor_units(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }

    pub async fn create(db: &DbConn, new: NewContest) -> Result<Model, DbErr> {
        let now = Utc::now();
        let contest = ActiveModel {
            search_name: Set(new.name.to_lowercase()),
            name: Set(new.name),
            image: Set(new.image),
            description: Set(new.description),
            price: Set(new.price),
            prize_money: Set(new.prize_money),
            task_instruction: Set(new.task_instruction),
            category: Set(new.category),
            deadline: Set(new.deadline),
            creator_email: Set(user::normalize_email(&new.creator_email)),
            creator_name: Set(new.creator_name),
            status: Set(ContestStatus::Pending),
            participation_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        contest.insert(db).await
    }

    pub async fn find(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// All contests, newest first, optionally only those of one creator.
    pub async fn find_by_creator(
        db: &DbConn,
        creator_email: Option<&str>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();
        if let Some(email) = creator_email {
            query = query.filter(Column::CreatorEmail.eq(user::normalize_email(email)));
        }
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn update_details(
        db: &DbConn,
        id: i64,
        changes: ContestChanges,
    ) -> Result<Model, DbErr> {
        let contest = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Contest not found".to_string()))?;

        let mut active: ActiveModel = contest.into();
        if let Some(name) = changes.name {
            active.search_name = Set(name.to_lowercase());
            active.name = Set(name);
        }
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(prize_money) = changes.prize_money {
            active.prize_money = Set(prize_money);
        }
        if let Some(task_instruction) = changes.task_instruction {
            active.task_instruction = Set(task_instruction);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(deadline) = changes.deadline {
            active.deadline = Set(deadline);
        }
        active.updated_at = Set(Utc::now());

        active.update(db).await
    }

    pub async fn set_status(db: &DbConn, id: i64, status: ContestStatus) -> Result<Model, DbErr> {
        let contest = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Contest not found".to_string()))?;

        let mut active: ActiveModel = contest.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    pub async fn increment_participation<C>(db: &C, id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = Entity::update_many()
            .col_expr(
                Column::ParticipationCount,
                Expr::col(Column::ParticipationCount).add(1),
            )
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Marks the contest completed with the given winner and credits the winner's
    /// `win_count`, both in one transaction.
    ///
    /// A contest that is already `Completed` is left untouched.
    pub async fn declare_winner(
        db: &DbConn,
        id: i64,
        winner_email: &str,
        winner_name: &str,
        winner_photo: Option<&str>,
    ) -> Result<WinnerOutcome, DbErr> {
        let txn = db.begin().await?;

        let Some(contest) = Entity::find_by_id(id).one(&txn).await? else {
            return Ok(WinnerOutcome::ContestNotFound);
        };
        if contest.status == ContestStatus::Completed {
            return Ok(WinnerOutcome::AlreadyDeclared);
        }

        let mut active: ActiveModel = contest.into();
        active.winner_email = Set(Some(winner_email.to_owned()));
        active.winner_name = Set(Some(winner_name.to_owned()));
        active.winner_photo = Set(winner_photo.map(str::to_owned));
        active.status = Set(ContestStatus::Completed);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        let credited = user::Model::increment_wins(&txn, winner_email).await?;
        if credited == 0 {
            tracing::warn!(contest_id = id, winner_email, "winner has no user account to credit");
        }

        txn.commit().await?;
        Ok(WinnerOutcome::Declared(updated))
    }

    /// One page of accepted contests for the public listing, plus the total match count.
    pub async fn search_accepted(
        db: &DbConn,
        params: &ContestSearch,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let mut query = Entity::find().filter(Column::Status.eq(ContestStatus::Accepted));

        if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(Column::SearchName.like(contains_pattern(&search.to_lowercase())));
        }
        if let Some(category) = params
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "All")
        {
            query = query.filter(Column::Category.eq(category));
        }

        query = match params.sort {
            ListingSort::Newest => query.order_by_desc(Column::CreatedAt),
            ListingSort::PriceAsc => query.order_by_asc(Column::Price),
            ListingSort::PriceDesc => query.order_by_desc(Column::Price),
        }
        .order_by_desc(Column::Id);

        let paginator = query.paginate(db, params.size.max(1));
        let total = paginator.num_items().await?;
        let contests = paginator.fetch_page(params.page.saturating_sub(1)).await?;
        Ok((contests, total))
    }

    /// Accepted contests with the most participants.
    pub async fn popular(db: &DbConn, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(ContestStatus::Accepted))
            .order_by_desc(Column::ParticipationCount)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn count_all(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    pub async fn count_accepted(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(ContestStatus::Accepted))
            .count(db)
            .await
    }

    pub async fn count_with_winner(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::WinnerName.is_not_null())
            .filter(Column::WinnerName.ne(""))
            .count(db)
            .await
    }
}
