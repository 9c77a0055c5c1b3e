use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{domain::ReservationStatus, models::Reservation};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub table_id: Uuid,
    pub customer_name: String,
    pub customer_contact: String,
    pub reservation_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub reservation_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<Reservation>,
}
