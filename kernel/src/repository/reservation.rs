use crate::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{
        event::{CreateReservation, DeleteReservation, UpdateReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 重複チェックと予約の登録、スロット状態の更新を一つのトランザクションで行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    // 支払い・ペナルティ・延長の記録がある予約は削除できない
    async fn delete(&self, event: DeleteReservation) -> AppResult<()>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    async fn find_by_slot_id(&self, slot_id: SlotId) -> AppResult<Vec<Reservation>>;
}
