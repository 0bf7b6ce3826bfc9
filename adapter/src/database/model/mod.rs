pub mod auth;
pub mod barrier;
pub mod extension;
pub mod notification;
pub mod payment;
pub mod penalty;
pub mod reservation;
pub mod slot;
pub mod user;

use shared::error::{AppError, AppResult};
use std::str::FromStr;

// TEXT カラムに保存している列挙値を kernel の型へ戻す
pub(crate) fn parse_column<T: FromStr>(column: &str, value: &str) -> AppResult<T> {
    value.parse().map_err(|_| {
        AppError::ConversionEntityError(format!("unexpected value '{value}' in column {column}"))
    })
}
