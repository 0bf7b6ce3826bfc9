use crate::model::reservation::{BookingType, ReservationWindow};
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use shared::{
    config::TariffConfig,
    error::{AppError, AppResult},
};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Pure pricing rules. The same function backs the quote endpoint and the
/// total recorded on a reservation, so a client preview always matches.
#[derive(Debug, Clone)]
pub struct Tariff {
    hourly_rate: Decimal,
    daily_rate: Decimal,
    monthly_rate: Decimal,
    min_monthly_term: u32,
    overstay_hourly_rate: Decimal,
}

impl From<&TariffConfig> for Tariff {
    fn from(value: &TariffConfig) -> Self {
        Self {
            hourly_rate: value.hourly_rate,
            daily_rate: value.daily_rate,
            monthly_rate: value.monthly_rate,
            min_monthly_term: value.min_monthly_term,
            overstay_hourly_rate: value.overstay_hourly_rate,
        }
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self::from(&TariffConfig::default())
    }
}

impl Tariff {
    pub fn price(&self, booking_type: BookingType, window: &ReservationWindow) -> Decimal {
        let millis = window.duration().num_milliseconds();
        match booking_type {
            BookingType::Hourly => Decimal::from(ceil_div(millis, MILLIS_PER_HOUR)) * self.hourly_rate,
            BookingType::Daily => Decimal::from(ceil_div(millis, MILLIS_PER_DAY)) * self.daily_rate,
            BookingType::Monthly => {
                let months = whole_months(window.start(), window.end()).max(self.min_monthly_term);
                Decimal::from(months) * self.monthly_rate
            }
        }
    }

    /// Overstay is billed per started hour past the booked end.
    pub fn overstay_fee(&self, end_time: DateTime<Utc>, actual_exit_time: DateTime<Utc>) -> Decimal {
        let millis = (actual_exit_time - end_time).num_milliseconds();
        if millis <= 0 {
            return Decimal::ZERO;
        }
        Decimal::from(ceil_div(millis, MILLIS_PER_HOUR)) * self.overstay_hourly_rate
    }

    // 金額の不一致はクライアント側の料金表が古い場合に起こる
    pub fn ensure_quote_matches(&self, quoted: Option<Decimal>, computed: Decimal) -> AppResult<()> {
        match quoted {
            Some(q) if q != computed => Err(AppError::InvalidRequest(format!(
                "quoted price {q} does not match the computed price {computed}"
            ))),
            _ => Ok(()),
        }
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}

// start に何ヶ月足せば end に届くか（端数は切り上げ）
fn whole_months(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let mut months = 1;
    while let Some(next) = start.checked_add_months(Months::new(months)) {
        if next >= end {
            break;
        }
        months += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn window(start: (u32, u32, u32, u32), end: (u32, u32, u32, u32)) -> ReservationWindow {
        let at = |(m, d, h, min): (u32, u32, u32, u32)| {
            Utc.with_ymd_and_hms(2025, m, d, h, min, 0).unwrap()
        };
        ReservationWindow::new(at(start), at(end)).unwrap()
    }

    #[test]
    fn hourly_rounds_partial_hours_up() {
        let tariff = Tariff::default();
        let w = window((3, 1, 10, 0), (3, 1, 12, 30));
        assert_eq!(tariff.price(BookingType::Hourly, &w), Decimal::from(3 * 50));
    }

    #[rstest]
    #[case((3, 1, 10, 0), (3, 1, 11, 0), 50)]
    #[case((3, 1, 10, 0), (3, 1, 10, 1), 50)]
    #[case((3, 1, 23, 0), (3, 2, 1, 0), 100)]
    fn hourly_cases(
        #[case] start: (u32, u32, u32, u32),
        #[case] end: (u32, u32, u32, u32),
        #[case] expected: i64,
    ) {
        let tariff = Tariff::default();
        assert_eq!(
            tariff.price(BookingType::Hourly, &window(start, end)),
            Decimal::from(expected)
        );
    }

    #[test]
    fn daily_charges_each_started_day() {
        let tariff = Tariff::default();
        let one_day = window((3, 1, 8, 0), (3, 2, 8, 0));
        let a_bit_more = window((3, 1, 8, 0), (3, 2, 9, 0));
        assert_eq!(tariff.price(BookingType::Daily, &one_day), Decimal::from(500));
        assert_eq!(tariff.price(BookingType::Daily, &a_bit_more), Decimal::from(1000));
    }

    #[test]
    fn monthly_uses_calendar_months_with_a_minimum_term() {
        let tariff = Tariff::default();
        let one_month = window((1, 31, 0, 0), (2, 28, 0, 0));
        let four_months = window((1, 15, 0, 0), (5, 15, 0, 0));
        let four_and_a_bit = window((1, 15, 0, 0), (5, 16, 0, 0));
        assert_eq!(tariff.price(BookingType::Monthly, &one_month), Decimal::from(3000));
        assert_eq!(tariff.price(BookingType::Monthly, &four_months), Decimal::from(4000));
        assert_eq!(tariff.price(BookingType::Monthly, &four_and_a_bit), Decimal::from(5000));
    }

    #[test]
    fn overstay_fee_is_zero_before_the_end() {
        let tariff = Tariff::default();
        let end = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(tariff.overstay_fee(end, end), Decimal::ZERO);
        assert_eq!(
            tariff.overstay_fee(end, end + chrono::Duration::minutes(61)),
            Decimal::from(200)
        );
    }

    #[test]
    fn mismatched_quotes_are_rejected() {
        let tariff = Tariff::default();
        assert!(tariff.ensure_quote_matches(None, Decimal::from(10)).is_ok());
        assert!(tariff
            .ensure_quote_matches(Some(Decimal::from(10)), Decimal::from(10))
            .is_ok());
        assert!(matches!(
            tariff.ensure_quote_matches(Some(Decimal::from(9)), Decimal::from(10)),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
