use crate::model::{
    extension::{event::CreateExtension, Extension},
    id::ReservationId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ExtensionRepository: Send + Sync {
    // 延長後の時間帯についても重複チェックを行う
    async fn create(&self, event: CreateExtension) -> AppResult<Extension>;
    async fn find_by_reservation_id(&self, reservation_id: ReservationId)
        -> AppResult<Vec<Extension>>;
}
