use crate::database::{map_write_error, model::user::UserRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, DeleteUser, UpdateUser},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

const USER_COLUMNS: &str = "user_id, name, last_name, phone, email, car_plate, role";

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password = hash_password(&event.password)?;
        // phone / email の重複は一意制約違反として Conflict になる
        let row: UserRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO users
                (user_id, name, last_name, phone, email, password_hash, car_plate, role)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&event.name)
        .bind(&event.last_name)
        .bind(&event.phone)
        .bind(&event.email)
        .bind(hashed_password)
        .bind(&event.car_plate)
        .bind(event.role.as_ref())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_write_error)?;

        User::try_from(row)
    }

    async fn update(&self, event: UpdateUser) -> AppResult<()> {
        let hashed_password = event.password.as_deref().map(hash_password).transpose()?;
        let res = sqlx::query(
            r#"
                UPDATE users SET
                    name = COALESCE($2, name),
                    last_name = COALESCE($3, last_name),
                    phone = COALESCE($4, phone),
                    email = COALESCE($5, email),
                    password_hash = COALESCE($6, password_hash),
                    car_plate = COALESCE($7, car_plate)
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.name)
        .bind(event.last_name)
        .bind(event.phone)
        .bind(event.email)
        .bind(hashed_password)
        .bind(event.car_plate)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "user ({}) was not found",
                event.user_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let has_reservations: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reservations WHERE user_id = $1)")
                .bind(event.user_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if has_reservations {
            return Err(AppError::Conflict(format!(
                "user ({}) still has reservations",
                event.user_id
            )));
        }

        // 予約を持たないユーザーの通知だけが残っている可能性がある
        sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(event.user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(event.user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "user ({}) was not found",
                event.user_id
            )));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if exists {
            return Ok(());
        }

        self.create(CreateUser {
            name: "Admin".into(),
            last_name: "User".into(),
            phone: format!("admin-{}", &UserId::new().to_string()[..8]),
            email: email.into(),
            password: password.into(),
            car_plate: "-".into(),
            role: Role::Admin,
        })
        .await?;

        tracing::info!(email, "admin user created");

        Ok(())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixture;

    #[sqlx::test]
    async fn register_update_and_delete_user(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = UserRepositoryImpl::new(db.clone());
        let user_id = fixture::user(&db, "0401").await?;

        // 同じメールアドレスでは登録できない
        let res = repo
            .create(CreateUser {
                name: "Hanako".into(),
                last_name: "Sato".into(),
                phone: "090-1111-2222".into(),
                email: "taro0401@example.com".into(),
                password: "another-pass".into(),
                car_plate: "XYZ-1".into(),
                role: Role::User,
            })
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));

        repo.update(UpdateUser {
            user_id,
            car_plate: Some("NEW-0401".into()),
            ..Default::default()
        })
        .await?;
        let user = repo.find_current_user(user_id).await?.unwrap();
        assert_eq!(user.car_plate, "NEW-0401");
        assert_eq!(user.name, "Taro");
        assert_eq!(user.role, Role::User);

        repo.delete(DeleteUser { user_id }).await?;
        assert!(repo.find_current_user(user_id).await?.is_none());

        let res = repo.delete(DeleteUser { user_id }).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test]
    async fn ensure_admin_is_idempotent(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        repo.ensure_admin("admin@example.com", "admin-pass").await?;
        repo.ensure_admin("admin@example.com", "admin-pass").await?;

        let users = repo.find_all().await?;
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin());
        Ok(())
    }
}
