use crate::model::id::{ReservationId, SlotId, UserId};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot: ReservationSlot,
    pub window: ReservationWindow,
    pub booking_type: BookingType,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

// 予約時点でのスロット番号・階数のスナップショット
#[derive(Debug)]
pub struct ReservationSlot {
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingType {
    Hourly,
    Daily,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
}

impl ReservationStatus {
    /// Statuses that hold the slot for their window.
    pub const ACTIVE: [ReservationStatus; 2] =
        [ReservationStatus::Pending, ReservationStatus::Confirmed];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    /// pending -> confirmed -> completed. Staying put is allowed, anything
    /// else (going back or skipping confirmation) is not.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Confirmed, Confirmed)
                | (Completed, Completed)
                | (Pending, Confirmed)
                | (Confirmed, Completed)
        )
    }

    pub fn transition_to(self, next: ReservationStatus) -> AppResult<ReservationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::Conflict(format!(
                "reservation status cannot move from {} to {}",
                self.as_ref(),
                next.as_ref()
            )))
        }
    }
}

/// Half-open booking window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReservationWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidRequest(
                "start time must be before end time".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    // 終了時刻と開始時刻が一致するだけなら重複とはみなさない
    pub fn overlaps(&self, other: &ReservationWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn with_end(&self, end: DateTime<Utc>) -> AppResult<Self> {
        Self::new(self.start, end)
    }
}

/// Returns the first existing booking whose window overlaps `candidate`.
pub fn find_overlap<'a, I>(candidate: &ReservationWindow, existing: I) -> Option<ReservationId>
where
    I: IntoIterator<Item = &'a (ReservationId, ReservationWindow)>,
{
    existing
        .into_iter()
        .find(|(_, window)| window.overlaps(candidate))
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::Rng;
    use rstest::rstest;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, min, 0).unwrap()
    }

    fn window(from: (u32, u32), to: (u32, u32)) -> ReservationWindow {
        ReservationWindow::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn window_rejects_empty_and_inverted_ranges() {
        assert!(ReservationWindow::new(at(10, 0), at(10, 0)).is_err());
        assert!(ReservationWindow::new(at(12, 0), at(10, 0)).is_err());
    }

    #[rstest]
    #[case((10, 0), (12, 0), (11, 0), (13, 0), true)]
    #[case((10, 0), (12, 0), (12, 0), (13, 0), false)]
    #[case((10, 0), (12, 0), (8, 0), (10, 0), false)]
    #[case((10, 0), (12, 0), (10, 30), (11, 0), true)]
    #[case((10, 0), (12, 0), (9, 0), (14, 0), true)]
    fn overlap_cases(
        #[case] a_from: (u32, u32),
        #[case] a_to: (u32, u32),
        #[case] b_from: (u32, u32),
        #[case] b_to: (u32, u32),
        #[case] expected: bool,
    ) {
        let a = window(a_from, a_to);
        let b = window(b_from, b_to);
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn random_window_pairs_conflict_iff_they_intersect() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let a_start = rng.gen_range(0..96);
            let a_len = rng.gen_range(1..24);
            let b_start = rng.gen_range(0..96);
            let b_len = rng.gen_range(1..24);
            let base = at(0, 0);
            let minutes = |m: i64| base + Duration::minutes(m * 15);
            let a = ReservationWindow::new(minutes(a_start), minutes(a_start + a_len)).unwrap();
            let b = ReservationWindow::new(minutes(b_start), minutes(b_start + b_len)).unwrap();

            let existing = vec![(ReservationId::new(), a)];
            let conflict = find_overlap(&b, &existing).is_some();
            let intersects = (a_start..a_start + a_len).any(|q| (b_start..b_start + b_len).contains(&q));
            assert_eq!(conflict, intersects, "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn find_overlap_reports_the_conflicting_reservation() {
        let first = ReservationId::new();
        let second = ReservationId::new();
        let existing = vec![
            (first, window((8, 0), (9, 0))),
            (second, window((10, 0), (11, 0))),
        ];
        assert_eq!(find_overlap(&window((10, 30), (12, 0)), &existing), Some(second));
        assert_eq!(find_overlap(&window((9, 0), (10, 0)), &existing), None);
    }

    #[rstest]
    #[case(ReservationStatus::Pending, ReservationStatus::Confirmed, true)]
    #[case(ReservationStatus::Confirmed, ReservationStatus::Completed, true)]
    #[case(ReservationStatus::Pending, ReservationStatus::Pending, true)]
    #[case(ReservationStatus::Pending, ReservationStatus::Completed, false)]
    #[case(ReservationStatus::Confirmed, ReservationStatus::Pending, false)]
    #[case(ReservationStatus::Completed, ReservationStatus::Confirmed, false)]
    #[case(ReservationStatus::Completed, ReservationStatus::Pending, false)]
    fn status_transitions(
        #[case] from: ReservationStatus,
        #[case] to: ReservationStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
        assert_eq!(from.transition_to(to).is_ok(), allowed);
    }

    #[test]
    fn only_pending_and_confirmed_are_active() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::Confirmed.is_active());
        assert!(!ReservationStatus::Completed.is_active());
    }

    #[test]
    fn enum_values_round_trip_through_their_column_text() {
        assert_eq!("monthly".parse::<BookingType>().unwrap(), BookingType::Monthly);
        assert_eq!(ReservationStatus::Confirmed.as_ref(), "confirmed");
        assert!("weekly".parse::<BookingType>().is_err());
    }
}
