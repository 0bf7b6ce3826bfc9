use std::sync::Arc;

use adapter::redis::RedisClient;
use adapter::repository::{
    auth::AuthRepositoryImpl, barrier::BarrierRepositoryImpl,
    extension::ExtensionRepositoryImpl, health::HealthCheckRepositoryImpl,
    notification::NotificationRepositoryImpl, payment::PaymentRepositoryImpl,
    penalty::PenaltyRepositoryImpl, reservation::ReservationRepositoryImpl,
    slot::SlotRepositoryImpl, user::UserRepositoryImpl,
};
use adapter::database::ConnectionPool;
use kernel::model::tariff::Tariff;
use kernel::repository::{
    auth::AuthRepository, barrier::BarrierRepository, extension::ExtensionRepository,
    health::HealthCheckRepository, notification::NotificationRepository,
    payment::PaymentRepository, penalty::PenaltyRepository,
    reservation::ReservationRepository, slot::SlotRepository, user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    slot_repository: Arc<dyn SlotRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    payment_repository: Arc<dyn PaymentRepository>,
    penalty_repository: Arc<dyn PenaltyRepository>,
    extension_repository: Arc<dyn ExtensionRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
    barrier_repository: Arc<dyn BarrierRepository>,
    tariff: Tariff,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: AppConfig,
    ) -> Self {
        let tariff = Tariff::from(&app_config.tariff);

        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let slot_repository = Arc::new(SlotRepositoryImpl::new(pool.clone()));
        let reservation_repository =
            Arc::new(ReservationRepositoryImpl::new(pool.clone(), tariff.clone()));
        let payment_repository = Arc::new(PaymentRepositoryImpl::new(pool.clone()));
        let penalty_repository =
            Arc::new(PenaltyRepositoryImpl::new(pool.clone(), tariff.clone()));
        let extension_repository =
            Arc::new(ExtensionRepositoryImpl::new(pool.clone(), tariff.clone()));
        let notification_repository = Arc::new(NotificationRepositoryImpl::new(pool.clone()));
        let barrier_repository = Arc::new(BarrierRepositoryImpl::new(pool.clone()));

        Self {
            health_check_repository,
            auth_repository,
            user_repository,
            slot_repository,
            reservation_repository,
            payment_repository,
            penalty_repository,
            extension_repository,
            notification_repository,
            barrier_repository,
            tariff,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn slot_repository(&self) -> Arc<dyn SlotRepository> {
        self.slot_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn payment_repository(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repository.clone()
    }

    pub fn penalty_repository(&self) -> Arc<dyn PenaltyRepository> {
        self.penalty_repository.clone()
    }

    pub fn extension_repository(&self) -> Arc<dyn ExtensionRepository> {
        self.extension_repository.clone()
    }

    pub fn notification_repository(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repository.clone()
    }

    pub fn barrier_repository(&self) -> Arc<dyn BarrierRepository> {
        self.barrier_repository.clone()
    }

    // 見積もり API はリポジトリを介さずに料金表を直接使う
    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }
}
