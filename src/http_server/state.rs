use std::sync::Arc;

use crate::database::Database;
use crate::ports::clock::Clock;
use crate::services::artist::ArtistService;
use crate::services::show::ShowService;
use crate::services::venue::VenueService;

pub struct AppState {
    pub db: Arc<Database>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn venues(&self) -> VenueService {
        VenueService::new(self.db.clone(), self.clock.clone())
    }

    pub fn artists(&self) -> ArtistService {
        ArtistService::new(self.db.clone(), self.clock.clone())
    }

    pub fn shows(&self) -> ShowService {
        ShowService::new(self.db.clone())
    }
}
