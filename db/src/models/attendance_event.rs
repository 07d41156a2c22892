use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// A single gate movement in the `attendance_events` table.
///
/// The table is an append-only log: rows are never updated or deleted
/// (other than by cascade when a student is removed from the roster), and
/// the auto-incremented `id` is the append order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,

    pub direction: Direction,
    pub recorded_at: DateTime<Utc>,
    /// Reason for leaving; check-out events only.
    pub reason: Option<String>,
    /// Free-text expected return time; check-out events only.
    pub expected_return: Option<String>,
}

/// Whether the event records the student entering or leaving the hostel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_direction")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    #[sea_orm(string_value = "check_in")]
    CheckIn,
    #[sea_orm(string_value = "check_out")]
    CheckOut,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Errors raised by the check-in/check-out state machine.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("You are already checked in. Please check out before checking in again.")]
    AlreadyCheckedIn,
    #[error("You are already checked out. Cannot check out again.")]
    AlreadyCheckedOut,
    #[error("Expected return time is required for checking out.")]
    MissingExpectedReturn,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// In/out state derived from the most recent event; never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    #[default]
    Unknown,
    CheckedIn,
    CheckedOut { reason: Option<String> },
}

impl Status {
    /// Derives the state from the last event in append order.
    pub fn from_latest(latest: Option<&Model>) -> Self {
        match latest {
            None => Status::Unknown,
            Some(ev) => match ev.direction {
                Direction::CheckIn => Status::CheckedIn,
                Direction::CheckOut => Status::CheckedOut {
                    reason: ev.reason.clone(),
                },
            },
        }
    }

    /// Display label shown verbatim on the parent view.
    ///
    /// A checked-out student is labelled with the stored reason, falling
    /// back to "OUT" when no reason was given.
    pub fn label(&self) -> String {
        match self {
            Status::Unknown => "Unknown".to_string(),
            Status::CheckedIn => "HOSTEL".to_string(),
            Status::CheckedOut { reason } => match reason {
                Some(r) if !r.is_empty() => r.clone(),
                _ => "OUT".to_string(),
            },
        }
    }
}

impl Model {
    /// Latest event for a student, by append order.
    ///
    /// Indexed lookup over (`student_id`, `id`); never scans the log.
    pub async fn latest_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Id)
            .one(db)
            .await
    }

    /// Full event history for a student, in insertion order.
    pub async fn history_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn current_status(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Status, DbErr> {
        let latest = Self::latest_for_student(db, student_id).await?;
        Ok(Status::from_latest(latest.as_ref()))
    }

    /// Appends a check-in event.
    ///
    /// Callers must hold the per-student gate lock so that the status read
    /// and the append are one critical section.
    pub async fn check_in(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Self, AttendanceError> {
        if let Status::CheckedIn = Self::current_status(db, student_id).await? {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        Self::append(db, student_id, Direction::CheckIn, None, None)
            .await
            .map_err(Into::into)
    }

    /// Appends a check-out event.
    ///
    /// The sentinel reason "Other" is replaced by the free-text
    /// `other_reason`; an empty substitution stores no reason at all.
    /// Callers must hold the per-student gate lock.
    pub async fn check_out(
        db: &DatabaseConnection,
        student_id: i64,
        reason: Option<&str>,
        other_reason: Option<&str>,
        expected_return: Option<&str>,
    ) -> Result<Self, AttendanceError> {
        if let Status::CheckedOut { .. } = Self::current_status(db, student_id).await? {
            return Err(AttendanceError::AlreadyCheckedOut);
        }

        let expected = expected_return
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AttendanceError::MissingExpectedReturn)?;

        let reason = match reason.map(str::trim) {
            Some("Other") => other_reason
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            Some(r) if !r.is_empty() => Some(r.to_owned()),
            _ => None,
        };

        Self::append(
            db,
            student_id,
            Direction::CheckOut,
            reason,
            Some(expected.to_owned()),
        )
        .await
        .map_err(Into::into)
    }

    async fn append(
        db: &DatabaseConnection,
        student_id: i64,
        direction: Direction,
        reason: Option<String>,
        expected_return: Option<String>,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            id: NotSet,
            student_id: Set(student_id),
            direction: Set(direction),
            recorded_at: Set(Utc::now()),
            reason: Set(reason),
            expected_return: Set(expected_return),
        };
        active.insert(db).await
    }
}
