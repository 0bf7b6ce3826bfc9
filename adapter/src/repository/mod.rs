pub mod auth;
pub mod barrier;
pub mod extension;
pub mod health;
pub mod notification;
pub mod payment;
pub mod penalty;
pub mod reservation;
pub mod slot;
pub mod user;

pub(crate) type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

#[cfg(test)]
pub(crate) mod fixture {
    use super::{slot::SlotRepositoryImpl, user::UserRepositoryImpl};
    use crate::database::ConnectionPool;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use kernel::model::{
        id::{SlotId, UserId},
        reservation::ReservationWindow,
        role::Role,
        slot::event::CreateSlot,
        user::event::CreateUser,
    };
    use kernel::repository::{slot::SlotRepository, user::UserRepository};

    pub async fn user(db: &ConnectionPool, suffix: &str) -> anyhow::Result<UserId> {
        let user = UserRepositoryImpl::new(db.clone())
            .create(CreateUser {
                name: "Taro".into(),
                last_name: "Yamada".into(),
                phone: format!("090-0000-{suffix}"),
                email: format!("taro{suffix}@example.com"),
                password: "secret-pass".into(),
                car_plate: format!("ABC-{suffix}"),
                role: Role::User,
            })
            .await?;
        Ok(user.user_id)
    }

    pub async fn slot(db: &ConnectionPool, slot_number: &str) -> anyhow::Result<SlotId> {
        let slot_id = SlotRepositoryImpl::new(db.clone())
            .create(CreateSlot {
                slot_number: slot_number.into(),
                floor: 1,
            })
            .await?;
        Ok(slot_id)
    }

    pub fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour as i64)
    }

    pub fn window(start_hour: u32, end_hour: u32) -> ReservationWindow {
        ReservationWindow::new(at(start_hour), at(end_hour)).unwrap()
    }
}
