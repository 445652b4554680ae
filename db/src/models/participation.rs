use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait, QueryOrder, QuerySelect, SqlErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::contest;
use crate::models::user::normalize_email;

/// A paid entry of one user into one contest.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub contest_id: i64,
    pub contest_name: String,
    pub user_email: String,

    /// Payment intent id reported by the payment provider.
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub price: f64,

    pub status: ParticipationStatus,
    pub deadline: Option<DateTime<Utc>>,

    pub submitted_task: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,

    pub payment_date: DateTime<Utc>,
}

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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "participation_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ParticipationStatus {
    #[default]
    #[sea_orm(string_value = "paid")]
    Paid,

    #[sea_orm(string_value = "submitted")]
    Submitted,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contest::Entity",
        from = "Column::ContestId",
        to = "super::contest::Column::Id",
        on_delete = "Cascade"
    )]
    Contest,
}

impl Related<super::contest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A verified payment to be recorded as a participation.
#[derive(Debug, Clone)]
pub struct NewParticipation {
    pub contest_id: i64,
    pub contest_name: String,
    pub user_email: String,
    pub transaction_id: String,
    pub price: f64,
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of recording a verified payment.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Recorded(Model),
    /// A participation with this transaction id already exists.
    AlreadyRecorded,
}

impl Model {
    pub fn has_submission(&self) -> bool {
        self.submitted_task.is_some()
    }

    pub async fn find(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_transaction(
        db: &DbConn,
        transaction_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TransactionId.eq(transaction_id))
            .one(db)
            .await
    }

    /// Whether `email` already holds a participation in the contest.
    pub async fn exists_for_user(
        db: &DbConn,
        contest_id: i64,
        email: &str,
    ) -> Result<bool, DbErr> {
        let count = Entity::find()
            .filter(Column::ContestId.eq(contest_id))
            .filter(Column::UserEmail.eq(normalize_email(email)))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_for_user(db: &DbConn, email: &str) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserEmail.eq(normalize_email(email)))
            .order_by_desc(Column::PaymentDate)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Participations of a contest that carry a submitted task.
    pub async fn submissions_for_contest(
        db: &DbConn,
        contest_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ContestId.eq(contest_id))
            .filter(Column::SubmittedTask.is_not_null())
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Inserts the participation and bumps the contest's participation counter in
    /// one transaction.
    ///
    /// A transaction id that is already present, whether found up front or
    /// rejected by the unique index, yields `AlreadyRecorded` and writes nothing.
    pub async fn record_payment(
        db: &DbConn,
        new: NewParticipation,
    ) -> Result<RecordOutcome, DbErr> {
        if Self::find_by_transaction(db, &new.transaction_id).await?.is_some() {
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        let txn = db.begin().await?;

        let participation = ActiveModel {
            contest_id: Set(new.contest_id),
            contest_name: Set(new.contest_name),
            user_email: Set(normalize_email(&new.user_email)),
            transaction_id: Set(new.transaction_id),
            price: Set(new.price),
            status: Set(ParticipationStatus::Paid),
            deadline: Set(new.deadline),
            submitted_task: Set(None),
            submitted_at: Set(None),
            payment_date: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = match participation.insert(&txn).await {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::info!("payment already recorded by a concurrent request");
                return Ok(RecordOutcome::AlreadyRecorded);
            }
            Err(e) => return Err(e),
        };

        contest::Model::increment_participation(&txn, inserted.contest_id).await?;

        txn.commit().await?;
        Ok(RecordOutcome::Recorded(inserted))
    }

    /// Stores a task link; re-submitting overwrites the previous link.
    pub async fn submit_task(db: &DbConn, id: i64, task_link: &str) -> Result<Model, DbErr> {
        let participation = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Participation not found".to_string()))?;

        let mut active: ActiveModel = participation.into();
        active.submitted_task = Set(Some(task_link.to_owned()));
        active.status = Set(ParticipationStatus::Submitted);
        active.submitted_at = Set(Some(Utc::now()));
        active.update(db).await
    }

    pub async fn count_all(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// Sum of all participation prices, rounded to cents.
    pub async fn total_revenue(db: &DbConn) -> Result<f64, DbErr> {
        let prices: Vec<f64> = Entity::find()
            .select_only()
            .column(Column::Price)
            .into_tuple()
            .all(db)
            .await?;
        let total: f64 = prices.iter().sum();
        Ok((total * 100.0).round() / 100.0)
    }
}
