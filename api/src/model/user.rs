use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, UpdateUser},
        User,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

impl From<Vec<User>> for UsersResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            items: value.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub car_plate: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            name,
            last_name,
            phone,
            email,
            car_plate,
            role,
        } = value;
        Self {
            user_id,
            name,
            last_name,
            phone,
            email,
            car_plate,
            role: RoleName::from(role),
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    name: String,
    #[garde(length(min = 1))]
    last_name: String,
    #[garde(length(min = 1, max = 32))]
    phone: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 8))]
    password: String,
    #[garde(length(min = 1, max = 32))]
    car_plate: String,
}

// 自己登録ではロールを指定できない
impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            name,
            last_name,
            phone,
            email,
            password,
            car_plate,
        } = value;
        Self {
            name,
            last_name,
            phone,
            email,
            password,
            car_plate,
            role: Role::User,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[garde(length(min = 1))]
    name: Option<String>,
    #[garde(length(min = 1))]
    last_name: Option<String>,
    #[garde(length(min = 1, max = 32))]
    phone: Option<String>,
    #[garde(email)]
    email: Option<String>,
    #[garde(length(min = 8))]
    password: Option<String>,
    #[garde(length(min = 1, max = 32))]
    car_plate: Option<String>,
}

#[derive(new)]
pub struct UpdateUserRequestWithUserId(UserId, UpdateUserRequest);

impl From<UpdateUserRequestWithUserId> for UpdateUser {
    fn from(value: UpdateUserRequestWithUserId) -> Self {
        let UpdateUserRequestWithUserId(
            user_id,
            UpdateUserRequest {
                name,
                last_name,
                phone,
                email,
                password,
                car_plate,
            },
        ) = value;
        Self {
            user_id,
            name,
            last_name,
            phone,
            email,
            password,
            car_plate,
        }
    }
}
