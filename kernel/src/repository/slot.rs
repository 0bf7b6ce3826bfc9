use crate::model::{
    id::SlotId,
    slot::{
        event::{CreateSlot, UpdateSlotStatus},
        Slot,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn create(&self, event: CreateSlot) -> AppResult<SlotId>;
    // 階数・スロット番号の順で全件を返す
    async fn find_all(&self) -> AppResult<Vec<Slot>>;
    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<Slot>>;
    // 管理者による状態の直接変更
    async fn update_status(&self, event: UpdateSlotStatus) -> AppResult<()>;
}
