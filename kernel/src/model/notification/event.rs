use crate::model::id::ReservationId;
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateNotification {
    pub reservation_id: ReservationId,
    pub message: String,
}
