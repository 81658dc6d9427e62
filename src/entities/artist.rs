use sea_orm::entity::prelude::*;

use super::Genres;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub genres: Genres,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show::Entity")]
    Show,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        super::show::Relation::Venue.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::show::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
