use super::parse_column;
use kernel::model::{id::UserId, user::User};
use shared::error::{AppError, AppResult};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub car_plate: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> AppResult<Self> {
        let UserRow {
            user_id,
            name,
            last_name,
            phone,
            email,
            car_plate,
            role,
        } = value;
        Ok(User {
            user_id,
            name,
            last_name,
            phone,
            email,
            car_plate,
            role: parse_column("role", &role)?,
        })
    }
}
