use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

/// Represents a roster entry in the `students` table.
///
/// The roster is the authoritative directory linking a student to the
/// parent email that may view their attendance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student's full name.
    pub full_name: String,
    /// Unique hostel roll number.
    pub roll_no: String,
    /// Class / year group the student belongs to.
    pub class_name: String,
    /// Student's unique email address (login identity).
    pub student_email: String,
    /// Linked parent email address (login identity for the parent view).
    pub parent_email: String,
    /// Timestamp when the roster entry was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the roster entry was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_event::Entity")]
    Events,
}

impl Related<super::attendance_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        full_name: &str,
        roll_no: &str,
        class_name: &str,
        student_email: &str,
        parent_email: &str,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            full_name: Set(full_name.to_owned()),
            roll_no: Set(roll_no.to_owned()),
            class_name: Set(class_name.to_owned()),
            student_email: Set(student_email.to_owned()),
            parent_email: Set(parent_email.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_roll_no(
        db: &DatabaseConnection,
        roll_no: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::RollNo.eq(roll_no))
            .one(db)
            .await
    }

    pub async fn find_by_student_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::StudentEmail.eq(email))
            .one(db)
            .await
    }

    /// Resolves a parent email to their child's roster entry.
    ///
    /// First match wins when several students share a parent email.
    pub async fn find_by_parent_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::ParentEmail.eq(email))
            .order_by_asc(Column::Id)
            .one(db)
            .await
    }

    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    /// Updates the editable roster fields. The roll number is the stable
    /// identifier and is not editable.
    pub async fn update_details(
        db: &DatabaseConnection,
        id: i64,
        full_name: &str,
        class_name: &str,
        student_email: &str,
        parent_email: &str,
    ) -> Result<Option<Self>, DbErr> {
        let Some(existing) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.full_name = Set(full_name.to_owned());
        active.class_name = Set(class_name.to_owned());
        active.student_email = Set(student_email.to_owned());
        active.parent_email = Set(parent_email.to_owned());
        active.updated_at = Set(Utc::now());

        active.update(db).await.map(Some)
    }

    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
