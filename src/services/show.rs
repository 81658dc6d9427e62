use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{ServiceError, ServiceResult};
use crate::database::Database;
use crate::entities::{artist, show, venue};

/// Validated values for booking a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowFields {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// A show with both sides of the booking loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub show: show::Model,
    pub venue: venue::Model,
    pub artist: artist::Model,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show joined with its venue and artist, in insertion order.
    pub async fn list(&self) -> ServiceResult<Vec<ShowListing>> {
        let shows = show::Entity::find()
            .order_by_asc(show::Column::Id)
            .find_also_related(venue::Entity)
            .all(&self.db.conn)
            .await?;

        let artist_ids: Vec<i64> = shows.iter().map(|(show, _)| show.artist_id).collect();
        let artists: HashMap<i64, artist::Model> = artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|artist| (artist.id, artist))
            .collect();

        Ok(shows
            .into_iter()
            .filter_map(|(show, venue)| {
                let venue = venue?;
                let artist = artists.get(&show.artist_id)?.clone();
                Some(ShowListing {
                    show,
                    venue,
                    artist,
                })
            })
            .collect())
    }

    /// Book a show. Both the venue and the artist must already exist.
    pub async fn create(&self, fields: ShowFields) -> ServiceResult<show::Model> {
        log::debug!(
            "Creating show: venue_id={}, artist_id={}, start_time={}",
            fields.venue_id,
            fields.artist_id,
            fields.start_time
        );

        let model = self
            .db
            .conn
            .transaction::<_, show::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    if venue::Entity::find_by_id(fields.venue_id)
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(ServiceError::InvalidReference(format!(
                            "Venue {} does not exist",
                            fields.venue_id
                        )));
                    }
                    if artist::Entity::find_by_id(fields.artist_id)
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(ServiceError::InvalidReference(format!(
                            "Artist {} does not exist",
                            fields.artist_id
                        )));
                    }

                    let show = show::ActiveModel {
                        venue_id: Set(fields.venue_id),
                        artist_id: Set(fields.artist_id),
                        start_time: Set(fields.start_time),
                        ..Default::default()
                    };
                    Ok(show.insert(txn).await?)
                })
            })
            .await?;

        log::info!(
            "Show created: venue_id={}, artist_id={} (ID: {})",
            model.venue_id,
            model.artist_id,
            model.id
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::test_utils::{fixed_now, insert_artist, insert_show, insert_venue, test_db};

    #[tokio::test]
    async fn test_list_joins_venue_and_artist() {
        let db = test_db().await;
        let hop = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let park = insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        let petals = insert_artist(&db, "Guns N Petals").await;
        let sax = insert_artist(&db, "The Wild Sax Band").await;
        insert_show(&db, hop.id, petals.id, Duration::days(-1)).await;
        insert_show(&db, park.id, sax.id, Duration::days(1)).await;
        let service = ShowService::new(db);

        let listings = service.list().await.unwrap();

        let pairs: Vec<(&str, &str)> = listings
            .iter()
            .map(|l| (l.venue.name.as_str(), l.artist.name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("The Musical Hop", "Guns N Petals"),
                ("Park Square Live Music & Coffee", "The Wild Sax Band"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_empty() {
        let db = test_db().await;
        let service = ShowService::new(db);

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_show() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let service = ShowService::new(db);

        let start_time = fixed_now() + Duration::days(7);
        let show = service
            .create(ShowFields {
                venue_id: venue.id,
                artist_id: artist.id,
                start_time,
            })
            .await
            .unwrap();

        assert_eq!(show.venue_id, venue.id);
        assert_eq!(show.artist_id, artist.id);
        assert_eq!(show.start_time, start_time);
    }

    #[tokio::test]
    async fn test_create_show_with_unknown_venue_is_rejected() {
        let db = test_db().await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        let service = ShowService::new(db.clone());

        let result = service
            .create(ShowFields {
                venue_id: 42,
                artist_id: artist.id,
                start_time: fixed_now(),
            })
            .await;

        match result {
            Err(ServiceError::InvalidReference(reason)) => {
                assert_eq!(reason, "Venue 42 does not exist")
            }
            other => panic!("expected InvalidReference, got {:?}", other),
        }
        assert!(show::Entity::find().all(&db.conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_show_with_unknown_artist_is_rejected() {
        let db = test_db().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let service = ShowService::new(db);

        let result = service
            .create(ShowFields {
                venue_id: venue.id,
                artist_id: 8,
                start_time: fixed_now(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidReference(_))));
    }
}
