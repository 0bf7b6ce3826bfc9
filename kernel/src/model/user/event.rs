use crate::model::{id::UserId, role::Role};

pub struct CreateUser {
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub car_plate: String,
    pub role: Role,
}

#[derive(Debug, Default)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub car_plate: Option<String>,
}

pub struct DeleteUser {
    pub user_id: UserId,
}
