mod helpers;
mod member_api;
mod ride_api;

use std::sync::Arc;

use oso::Oso;

use crate::{
    api::{ZoneAPI, API},
    auth::authorizor,
    db::Store,
    error::Error,
    zones::{self, Zone},
};

pub struct Engine {
    store: Arc<dyn Store>,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new<S: Store + 'static>(store: S) -> Result<Self, Error> {
        Ok(Self {
            store: Arc::new(store),
            authorizor: authorizor::new()?,
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(Error::unauthorized_error())
    }
}

impl ZoneAPI for Engine {
    fn list_zones(&self) -> Vec<Zone> {
        zones::all().to_vec()
    }
}

impl API for Engine {}
