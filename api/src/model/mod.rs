use rust_decimal::Decimal;

pub mod auth;
pub mod barrier;
pub mod extension;
pub mod notification;
pub mod payment;
pub mod penalty;
pub mod reservation;
pub mod slot;
pub mod user;

pub(crate) fn positive_amount(value: &Decimal, _ctx: &()) -> garde::Result {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(garde::Error::new("amount must be greater than zero"))
    }
}

pub(crate) fn optional_positive_amount(value: &Option<Decimal>, ctx: &()) -> garde::Result {
    match value {
        Some(v) => positive_amount(v, ctx),
        None => Ok(()),
    }
}

pub(crate) fn optional_non_negative_amount(value: &Option<Decimal>, _ctx: &()) -> garde::Result {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => {
            Err(garde::Error::new("amount must not be negative"))
        }
        _ => Ok(()),
    }
}
