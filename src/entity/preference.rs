//! Preference entity model for Sea-ORM database interaction.
//!
//! Maps the `preference` table that backs [`DatabaseStore`](crate::store::DatabaseStore).

use sea_orm::entity::prelude::*;

/// One stored key-value entry.
///
/// | Column     | Type               | Description                           |
/// |------------|--------------------|---------------------------------------|
/// | key        | TEXT (Primary Key) | Namespaced entry key                  |
/// | value      | TEXT               | Entry value (token or JSON profile)   |
/// | updated_at | TIMESTAMPTZ        | Time of the last write                |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "preference")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub key: String,

    #[sea_orm(column_type = "Text")]
    pub value: String,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
