use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub tariff: TariffConfig,
    pub http: HttpConfig,
    pub admin: Option<AdminConfig>,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse()?,
        };
        let auth = AuthConfig {
            ttl: var_or("AUTH_TOKEN_TTL", 86_400)?,
        };
        let tariff = TariffConfig {
            hourly_rate: var_or("PRICE_HOURLY", Decimal::from(50))?,
            daily_rate: var_or("PRICE_DAILY", Decimal::from(500))?,
            monthly_rate: var_or("PRICE_MONTHLY", Decimal::from(1000))?,
            min_monthly_term: var_or("MIN_MONTHLY_TERM", 3)?,
            overstay_hourly_rate: var_or("OVERSTAY_HOURLY_RATE", Decimal::from(100))?,
        };
        let http = HttpConfig {
            port: var_or("HTTP_PORT", 8080)?,
        };
        // 管理者アカウントは両方の値が揃っているときだけ作成する
        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminConfig { email, password }),
            _ => None,
        };

        Ok(Self {
            database,
            redis,
            auth,
            tariff,
            http,
            admin,
        })
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .parse()
            .with_context(|| format!("environment variable {key} has an invalid value")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub ttl: u64,
}

/// Rates used to price bookings and overstays.
#[derive(Debug, Clone)]
pub struct TariffConfig {
    pub hourly_rate: Decimal,
    pub daily_rate: Decimal,
    pub monthly_rate: Decimal,
    /// Monthly bookings are billed for at least this many months.
    pub min_monthly_term: u32,
    pub overstay_hourly_rate: Decimal,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::from(50),
            daily_rate: Decimal::from(500),
            monthly_rate: Decimal::from(1000),
            min_monthly_term: 3,
            overstay_hourly_rate: Decimal::from(100),
        }
    }
}

#[derive(Clone)]
pub struct HttpConfig {
    pub port: u16,
}

#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}
