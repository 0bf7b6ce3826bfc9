use crate::model::{
    barrier::{event::CreateBarrierAction, BarrierAction},
    id::ReservationId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BarrierRepository: Send + Sync {
    // 追記のみ。更新・削除の操作は提供しない
    async fn create(&self, event: CreateBarrierAction) -> AppResult<BarrierAction>;
    // 記録した順に返す
    async fn find_all(&self) -> AppResult<Vec<BarrierAction>>;
    async fn find_by_reservation_id(&self, reservation_id: ReservationId)
        -> AppResult<Vec<BarrierAction>>;
}
