use super::GateAction;
use crate::model::id::ReservationId;
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateBarrierAction {
    pub reservation_id: ReservationId,
    pub action: GateAction,
}
