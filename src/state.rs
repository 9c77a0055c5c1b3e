use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    events::Hub,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: DbPool,
    pub orm: OrmConn,
    pub hub: Hub,
}
