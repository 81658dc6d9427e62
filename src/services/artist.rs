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

/// Validated values for creating or editing an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistFields {
    fn apply(self, mut artist: artist::ActiveModel) -> artist::ActiveModel {
        artist.name = Set(self.name);
        artist.city = Set(self.city);
        artist.state = Set(self.state);
        artist.phone = Set(self.phone);
        artist.image_link = Set(self.image_link);
        artist.genres = Set(self.genres.into());
        artist.facebook_link = Set(self.facebook_link);
        artist.website_link = Set(self.website_link);
        artist.seeking_venue = Set(self.seeking_venue);
        artist.seeking_description = Set(self.seeking_description);
        artist
    }
}

pub struct ArtistService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn list(&self) -> ServiceResult<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Id)
            .all(&self.db.conn)
            .await?)
    }

    /// Case-insensitive substring search on the artist name.
    pub async fn search(
        &self,
        term: &str,
    ) -> ServiceResult<Vec<WithUpcomingShows<artist::Model>>> {
        let mut query = artist::Entity::find();
        if !term.is_empty() {
            query = query.filter(
                Func::lower(Expr::col(artist::Column::Name))
                    .like(LikeExpr::new(like_pattern(term)).escape('\\')),
            );
        }

        let artists = query
            .order_by_asc(artist::Column::Id)
            .all(&self.db.conn)
            .await?;
        let counts =
            upcoming_show_counts(&self.db.conn, show::Column::ArtistId, self.clock.now()).await?;

        log::debug!("Artist search '{}' matched {} artists", term, artists.len());
        Ok(artists
            .into_iter()
            .map(|model| WithUpcomingShows {
                num_upcoming_shows: counts.get(&model.id).copied().unwrap_or(0),
                model,
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<artist::Model> {
        artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Artist",
                id,
            })
    }

    /// Shows the artist is booked for with their venues, split around now.
    pub async fn shows(&self, id: i64) -> ServiceResult<ShowsPartition<venue::Model>> {
        let rows = show::Entity::find()
            .filter(show::Column::ArtistId.eq(id))
            .order_by_asc(show::Column::StartTime)
            .find_also_related(venue::Entity)
            .all(&self.db.conn)
            .await?;

        let rows = rows
            .into_iter()
            .filter_map(|(show, venue)| venue.map(|venue| (show, venue)));
        Ok(ShowsPartition::split(rows, self.clock.now()))
    }

    pub async fn create(&self, fields: ArtistFields) -> ServiceResult<artist::Model> {
        log::debug!("Creating artist: '{}'", fields.name);
        let model = fields.apply(Default::default()).insert(&self.db.conn).await?;

        log::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn update(&self, id: i64, fields: ArtistFields) -> ServiceResult<artist::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, artist::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let artist = artist::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound {
                            entity: "Artist",
                            id,
                        })?;

                    Ok(fields.apply(artist.into()).update(txn).await?)
                })
            })
            .await?;

        log::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::test_utils::{fixed_clock, insert_artist, insert_show, insert_venue, test_db};

    fn fields(name: &str) -> ArtistFields {
        ArtistFields {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("326-123-5000".to_string()),
            image_link: Some("https://images.example.com/petals.jpg".to_string()),
            genres: vec!["Rock n Roll".to_string()],
            facebook_link: Some("https://www.facebook.com/GunsNPetals".to_string()),
            website_link: None,
            seeking_venue: true,
            seeking_description: Some("Looking for shows in the Bay Area".to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let db = test_db().await;
        let first = insert_artist(&db, "Guns N Petals").await;
        let second = insert_artist(&db, "Matt Quevedo").await;
        let service = ArtistService::new(db, fixed_clock());

        let ids: Vec<i64> = service.list().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_search_artists() {
        let db = test_db().await;
        insert_artist(&db, "Guns N Petals").await;
        insert_artist(&db, "Matt Quevedo").await;
        insert_artist(&db, "The Wild Sax Band").await;
        let service = ArtistService::new(db, fixed_clock());

        let a = service.search("A").await.unwrap();
        assert_eq!(a.len(), 3);

        let band = service.search("band").await.unwrap();
        let names: Vec<&str> = band.iter().map(|a| a.model.name.as_str()).collect();
        assert_eq!(names, vec!["The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_shows_partitioned_into_past_and_upcoming() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let past = insert_show(&db, venue.id, artist.id, Duration::minutes(-1)).await;
        let upcoming = insert_show(&db, venue.id, artist.id, Duration::minutes(1)).await;
        let service = ArtistService::new(db, fixed_clock());

        let shows = service.shows(artist.id).await.unwrap();

        let past_ids: Vec<i64> = shows.past.iter().map(|(s, _)| s.id).collect();
        let upcoming_ids: Vec<i64> = shows.upcoming.iter().map(|(s, _)| s.id).collect();
        assert_eq!(past_ids, vec![past.id]);
        assert_eq!(upcoming_ids, vec![upcoming.id]);
        assert_eq!(shows.upcoming[0].1.name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_update_name_replaces_old_name() {
        let db = test_db().await;
        let service = ArtistService::new(db, fixed_clock());
        let created = service.create(fields("Guns N Petals")).await.unwrap();

        service
            .update(created.id, fields("Guns N Roses"))
            .await
            .unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Guns N Roses");
        assert!(service.search("Petals").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_artist_is_not_found() {
        let db = test_db().await;
        let service = ArtistService::new(db, fixed_clock());

        assert!(matches!(
            service.get(3).await,
            Err(ServiceError::NotFound {
                entity: "Artist",
                id: 3
            })
        ));
    }
}
