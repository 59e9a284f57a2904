use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: Decimal,
    pub date_paid: Date,
    pub reference: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::StudentId)
                .to(student::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    student_id: Uuid,
    amount: Decimal,
    date_paid: Date,
    reference: &str,
) -> Result<Model, ModelError> {
    if amount <= Decimal::ZERO {
        return Err(ModelError::Validation("amount must be greater than zero".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        amount: Set(amount),
        date_paid: Set(date_paid),
        reference: Set(reference.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
