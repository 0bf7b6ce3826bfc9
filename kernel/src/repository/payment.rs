use crate::model::{
    id::{PaymentId, ReservationId},
    payment::{
        event::{CreatePayment, UpdatePaymentStatus},
        Payment,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, event: CreatePayment) -> AppResult<Payment>;
    // verified になった場合は予約の確定とペナルティの支払い済み化も同じトランザクションで行う
    async fn update_status(&self, event: UpdatePaymentStatus) -> AppResult<Payment>;
    async fn find_by_id(&self, payment_id: PaymentId) -> AppResult<Option<Payment>>;
    async fn find_all(&self) -> AppResult<Vec<Payment>>;
    async fn find_by_reservation_id(&self, reservation_id: ReservationId)
        -> AppResult<Vec<Payment>>;
}
