use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database as SeaDatabase, Set};

use crate::database::Database;
use crate::entities;
use crate::ports::clock::{Clock, MockClock};

pub async fn test_db() -> Arc<Database> {
    // A single pooled connection keeps every query on the same in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();
    migration::Migrator::up(&conn, None).await.unwrap();

    Arc::new(Database { conn })
}

/// 2024-06-01 20:00:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T20:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_now().returning(fixed_now);
    Arc::new(clock)
}

pub async fn insert_venue(
    db: &Database,
    name: &str,
    city: &str,
    state: &str,
) -> entities::venue::Model {
    entities::venue::ActiveModel {
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        state: Set(state.to_string()),
        address: Set("1015 Folsom Street".to_string()),
        phone: Set(Some("123-123-1234".to_string())),
        image_link: Set(Some("https://images.example.com/venue.jpg".to_string())),
        genres: Set(vec!["Jazz".to_string(), "Reggae".to_string()].into()),
        facebook_link: Set(None),
        website_link: Set(None),
        seeking_talent: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    }
    .insert(&db.conn)
    .await
    .unwrap()
}

pub async fn insert_artist(db: &Database, name: &str) -> entities::artist::Model {
    entities::artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set("CA".to_string()),
        phone: Set(Some("326-123-5000".to_string())),
        image_link: Set(Some("https://images.example.com/artist.jpg".to_string())),
        genres: Set(vec!["Rock n Roll".to_string()].into()),
        facebook_link: Set(None),
        website_link: Set(None),
        seeking_venue: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    }
    .insert(&db.conn)
    .await
    .unwrap()
}

/// Insert a show starting `offset` after [`fixed_now`].
pub async fn insert_show(
    db: &Database,
    venue_id: i64,
    artist_id: i64,
    offset: Duration,
) -> entities::show::Model {
    entities::show::ActiveModel {
        venue_id: Set(venue_id),
        artist_id: Set(artist_id),
        start_time: Set(fixed_now() + offset),
        ..Default::default()
    }
    .insert(&db.conn)
    .await
    .unwrap()
}
