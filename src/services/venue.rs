use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{
    ServiceError, ServiceResult, ShowsPartition, WithUpcomingShows, like_pattern,
    upcoming_show_counts,
};
use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::ports::clock::Clock;

/// Validated values for creating or editing a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueFields {
    fn apply(self, mut venue: venue::ActiveModel) -> venue::ActiveModel {
        venue.name = Set(self.name);
        venue.city = Set(self.city);
        venue.state = Set(self.state);
        venue.address = Set(self.address);
        venue.phone = Set(self.phone);
        venue.image_link = Set(self.image_link);
        venue.genres = Set(self.genres.into());
        venue.facebook_link = Set(self.facebook_link);
        venue.website_link = Set(self.website_link);
        venue.seeking_talent = Set(self.seeking_talent);
        venue.seeking_description = Set(self.seeking_description);
        venue
    }
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<WithUpcomingShows<venue::Model>>,
}

pub struct VenueService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl VenueService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// All venues grouped by area, areas in the order their first venue was listed.
    pub async fn list_areas(&self) -> ServiceResult<Vec<VenueArea>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let counts =
            upcoming_show_counts(&self.db.conn, show::Column::VenueId, self.clock.now()).await?;

        Ok(group_by_area(venues, &counts))
    }

    /// Case-insensitive substring search on the venue name.
    pub async fn search(&self, term: &str) -> ServiceResult<Vec<WithUpcomingShows<venue::Model>>> {
        let mut query = venue::Entity::find();
        if !term.is_empty() {
            query = query.filter(
                Func::lower(Expr::col(venue::Column::Name))
                    .like(LikeExpr::new(like_pattern(term)).escape('\\')),
            );
        }

        let venues = query
            .order_by_asc(venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let counts =
            upcoming_show_counts(&self.db.conn, show::Column::VenueId, self.clock.now()).await?;

        log::debug!("Venue search '{}' matched {} venues", term, venues.len());
        Ok(venues
            .into_iter()
            .map(|model| WithUpcomingShows {
                num_upcoming_shows: counts.get(&model.id).copied().unwrap_or(0),
                model,
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<venue::Model> {
        venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Venue",
                id,
            })
    }

    /// Shows booked at the venue with their artists, split around now.
    pub async fn shows(&self, id: i64) -> ServiceResult<ShowsPartition<artist::Model>> {
        let rows = show::Entity::find()
            .filter(show::Column::VenueId.eq(id))
            .order_by_asc(show::Column::StartTime)
            .find_also_related(artist::Entity)
            .all(&self.db.conn)
            .await?;

        let rows = rows
            .into_iter()
            .filter_map(|(show, artist)| artist.map(|artist| (show, artist)));
        Ok(ShowsPartition::split(rows, self.clock.now()))
    }

    pub async fn create(&self, fields: VenueFields) -> ServiceResult<venue::Model> {
        log::debug!("Creating venue: '{}'", fields.name);
        let model = fields.apply(Default::default()).insert(&self.db.conn).await?;

        log::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn update(&self, id: i64, fields: VenueFields) -> ServiceResult<venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, venue::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = venue::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound {
                            entity: "Venue",
                            id,
                        })?;

                    Ok(fields.apply(venue.into()).update(txn).await?)
                })
            })
            .await?;

        log::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Delete the venue and every show booked at it.
    pub async fn delete(&self, id: i64) -> ServiceResult<venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, venue::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = venue::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound {
                            entity: "Venue",
                            id,
                        })?;

                    show::Entity::delete_many()
                        .filter(show::Column::VenueId.eq(id))
                        .exec(txn)
                        .await?;
                    venue::Entity::delete_by_id(id).exec(txn).await?;

                    Ok(venue)
                })
            })
            .await?;

        log::info!("Venue deleted: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }
}

fn group_by_area(venues: Vec<venue::Model>, counts: &HashMap<i64, u64>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for venue in venues {
        let position = *positions
            .entry((venue.city.clone(), venue.state.clone()))
            .or_insert_with(|| {
                areas.push(VenueArea {
                    city: venue.city.clone(),
                    state: venue.state.clone(),
                    venues: Vec::new(),
                });
                areas.len() - 1
            });

        areas[position].venues.push(WithUpcomingShows {
            num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
            model: venue,
        });
    }

    areas
}
