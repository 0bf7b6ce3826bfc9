use crate::model::{
    id::{PenaltyId, ReservationId},
    penalty::{
        event::{CreatePenalty, UpdatePenaltyStatus},
        Penalty,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait PenaltyRepository: Send + Sync {
    async fn create(&self, event: CreatePenalty) -> AppResult<Penalty>;
    async fn update_status(&self, event: UpdatePenaltyStatus) -> AppResult<Penalty>;
    async fn find_by_id(&self, penalty_id: PenaltyId) -> AppResult<Option<Penalty>>;
    async fn find_all(&self) -> AppResult<Vec<Penalty>>;
    async fn find_by_reservation_id(&self, reservation_id: ReservationId)
        -> AppResult<Vec<Penalty>>;
}
