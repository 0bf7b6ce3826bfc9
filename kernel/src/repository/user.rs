use crate::model::{
    id::UserId,
    user::{
        event::{CreateUser, DeleteUser, UpdateUser},
        User,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn update(&self, event: UpdateUser) -> AppResult<()>;
    // 予約が残っているユーザーは削除できない
    async fn delete(&self, event: DeleteUser) -> AppResult<()>;
    // 設定された管理者アカウントが無ければ作成する
    async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<()>;
}
