use std::{any::Any, sync::Arc, time::Instant};

use axum::{
    Router,
    extract::Request,
    handler::HandlerWithoutStateExt,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use crate::{
    database::Database,
    http_server::{
        error::server_error_page,
        http_routes::{artists, pages, shows, venues},
        state::AppState,
    },
    ports::clock::SystemClock,
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Database,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/venues/{venue_id}",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/{venue_id}/edit",
            get(venues::edit_venue).post(venues::edit_venue_submission),
        )
        .route("/artists", get(artists::list_artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route("/artists/{artist_id}", get(artists::show_artist))
        .route(
            "/artists/{artist_id}/edit",
            get(artists::edit_artist).post(artists::edit_artist_submission),
        )
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )
        .nest_service(
            "/static",
            ServeDir::new("static").not_found_service(pages::not_found.into_service()),
        )
        .fallback(pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_requests))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(app_state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} in {:.1?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("Request handler panicked: {}", detail);
    server_error_page()
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
        clock: Arc::new(SystemClock),
    });
    let app = router(app_state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;
    log::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Duration;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use tower::ServiceExt;

    use super::*;
    use crate::entities::{show, venue};
    use crate::test_utils::{fixed_clock, insert_artist, insert_show, insert_venue, test_db};

    const MUSICAL_HOP: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA\
        &address=1015+Folsom+Street&phone=123-123-1234\
        &image_link=https%3A%2F%2Fimages.example.com%2Fhop.jpg\
        &genres=Jazz&genres=Reggae&genres=Swing\
        &facebook_link=&website_link=https%3A%2F%2Fwww.themusicalhop.com\
        &seeking_talent=y&seeking_description=We+are+on+the+lookout+for+a+local+artist";

    async fn app() -> (Router, Arc<Database>) {
        let db = test_db().await;
        let state = Arc::new(AppState {
            db: db.clone(),
            clock: fixed_clock(),
        });
        (router(state), db)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// `name=value` of the response's Set-Cookie header, ready to send back.
    fn returned_cookie(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _db) = app().await;
        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stylesheet_is_served() {
        let (app, _db) = app().await;
        let response = app
            .oneshot(get_request("/static/css/main.css"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_static_file_renders_not_found_page() {
        let (app, _db) = app().await;
        let response = app
            .oneshot(get_request("/static/css/missing.css"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let page = body_text(response).await;
        assert!(page.contains("The page you are looking for does not exist."));
    }

    #[tokio::test]
    async fn test_create_venue_then_show_it() {
        let (app, _db) = app().await;

        let response = app
            .clone()
            .oneshot(form_request("/venues/create", MUSICAL_HOP))
            .await
            .unwrap();
        // Swing is not a genre choice
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Errors occurred"));

        let body = MUSICAL_HOP.replace("&genres=Swing", "");
        let response = app
            .clone()
            .oneshot(form_request("/venues/create", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_text(response)
                .await
                .contains("Venue The Musical Hop was successfully listed!")
        );

        let response = app.oneshot(get_request("/venues/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        for expected in [
            "The Musical Hop",
            "San Francisco",
            "1015 Folsom Street",
            "123-123-1234",
            "Jazz",
            "Reggae",
            "We are on the lookout for a local artist",
        ] {
            assert!(page.contains(expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_invalid_venue_is_not_persisted() {
        let (app, db) = app().await;
        let body = MUSICAL_HOP.replace("name=The+Musical+Hop", "name=");

        let response = app
            .oneshot(form_request("/venues/create", &body))
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("name : This field is required."));
        assert_eq!(venue::Entity::find().count(&db.conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_records_answer_404() {
        let (app, _db) = app().await;

        for uri in ["/venues/999", "/venues/abc", "/artists/7/edit", "/nowhere"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_search_venues() {
        let (app, db) = app().await;
        insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        insert_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;

        let response = app
            .clone()
            .oneshot(form_request("/venues/search", "search_term=Hop"))
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("The Musical Hop"));
        assert!(!page.contains("Park Square"));

        let response = app
            .oneshot(form_request("/venues/search", "search_term=music"))
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("The Musical Hop"));
        assert!(page.contains("Park Square Live Music"));
        assert!(!page.contains("Dueling Pianos"));
    }

    #[tokio::test]
    async fn test_delete_venue_removes_it_from_listing() {
        let (app, db) = app().await;
        let hop = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, hop.id, artist.id, Duration::days(3)).await;

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/venues/{}", hop.id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = returned_cookie(&response);

        let request = Request::builder()
            .uri("/venues")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let page = body_text(app.oneshot(request).await.unwrap()).await;
        assert!(page.contains("Venue The Musical Hop was successfully deleted"));
        assert!(page.contains("Park Square Live Music"));
        assert!(!page.contains("href=\"/venues/1\""));
        assert_eq!(show::Entity::find().count(&db.conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_artist_name() {
        let (app, db) = app().await;
        let artist = insert_artist(&db, "Guns N Petals").await;

        let response = app
            .clone()
            .oneshot(get_request(&format!("/artists/{}/edit", artist.id)))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("value=\"Guns N Petals\""));

        let form = "name=The+Wild+Sax+Band&city=San+Francisco&state=CA\
            &phone=432-325-5432&genres=Jazz&genres=Classical";
        let response = app
            .clone()
            .oneshot(form_request(&format!("/artists/{}/edit", artist.id), form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            &format!("/artists/{}", artist.id)
        );
        let cookie = returned_cookie(&response);

        let request = Request::builder()
            .uri(format!("/artists/{}", artist.id))
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let page = body_text(app.oneshot(request).await.unwrap()).await;
        assert!(page.contains("Artist The Wild Sax Band was successfully updated!"));
        assert!(!page.contains("Guns N Petals"));
    }

    #[tokio::test]
    async fn test_show_with_unknown_venue_is_not_persisted() {
        let (app, db) = app().await;
        let artist = insert_artist(&db, "Guns N Petals").await;

        let form = format!(
            "artist_id={}&venue_id=42&start_time=2024-07-01+20%3A00%3A00",
            artist.id
        );
        let response = app
            .oneshot(form_request("/shows/create", &form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Venue 42 does not exist"));
        assert_eq!(show::Entity::find().count(&db.conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shows_split_on_venue_page() {
        let (app, db) = app().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let past = insert_artist(&db, "Guns N Petals").await;
        let upcoming = insert_artist(&db, "The Wild Sax Band").await;
        insert_show(&db, venue.id, past.id, -Duration::days(30)).await;
        insert_show(&db, venue.id, upcoming.id, Duration::days(30)).await;

        let response = app
            .clone()
            .oneshot(get_request(&format!("/venues/{}", venue.id)))
            .await
            .unwrap();
        let page = body_text(response).await;
        let upcoming_at = page.find("Upcoming Shows").unwrap();
        let past_at = page.find("Past Shows").unwrap();
        let petals_at = page.find("Guns N Petals").unwrap();
        let sax_at = page.find("The Wild Sax Band").unwrap();
        assert!(upcoming_at < sax_at && sax_at < past_at);
        assert!(past_at < petals_at);

        let page = body_text(app.oneshot(get_request("/shows")).await.unwrap()).await;
        assert!(page.contains("Guns N Petals"));
        assert!(page.contains("The Wild Sax Band"));
    }
}
