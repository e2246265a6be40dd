//! Employee and shift records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, EmployeeId, ShiftId, ShiftStatus, round_money};

/// A staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A worked (or in-progress) shift.
///
/// Open shifts have `end_time == None` and status `Active`; closing sets
/// `end_time`, computes `hours_worked`/`total_pay` and moves to `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub employee_id: EmployeeId,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Unpaid break minutes.
    #[serde(default)]
    pub break_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pay: Option<Decimal>,
    pub status: ShiftStatus,
}

impl Shift {
    /// Open a new shift.
    #[must_use]
    pub const fn open(
        id: ShiftId,
        employee_id: EmployeeId,
        start_time: DateTime<Utc>,
        hourly_rate: Option<Decimal>,
    ) -> Self {
        Self {
            id,
            employee_id,
            start_time,
            end_time: None,
            break_minutes: 0,
            hourly_rate,
            hours_worked: None,
            total_pay: None,
            status: ShiftStatus::Active,
        }
    }

    /// Whether the shift is still running.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Close the shift at `end_time`, computing hours and pay.
    pub fn close(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.status = ShiftStatus::Completed;
        self.recompute_totals();
    }

    /// Recompute `hours_worked` and `total_pay` from the recorded times.
    ///
    /// Hours are rounded to two decimals; break minutes are unpaid. Does
    /// nothing for open shifts.
    pub fn recompute_totals(&mut self) {
        let Some(end_time) = self.end_time else {
            return;
        };
        let worked_minutes = (end_time - self.start_time).num_minutes()
            - i64::from(self.break_minutes);
        let hours = (Decimal::from(worked_minutes.max(0)) / Decimal::from(60)).round_dp(2);
        self.hours_worked = Some(hours);
        self.total_pay = self
            .hourly_rate
            .map(|rate| round_money(rate * hours, CurrencyCode::USD));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    #[test]
    fn test_open_shift() {
        let shift = Shift::open(
            ShiftId::new("s-1"),
            EmployeeId::new("e-1"),
            start(),
            Some(Decimal::from(18)),
        );
        assert!(shift.is_open());
        assert_eq!(shift.status, ShiftStatus::Active);
        assert!(shift.hours_worked.is_none());
    }

    #[test]
    fn test_close_computes_hours_and_pay() {
        let mut shift = Shift::open(
            ShiftId::new("s-1"),
            EmployeeId::new("e-1"),
            start(),
            Some(Decimal::from(18)),
        );
        shift.break_minutes = 30;
        shift.close(start() + Duration::minutes(8 * 60 + 45));

        assert_eq!(shift.status, ShiftStatus::Completed);
        assert_eq!(shift.hours_worked, Some(Decimal::new(825, 2)));
        assert_eq!(shift.total_pay, Some(Decimal::new(14_850, 2)));
    }

    #[test]
    fn test_close_without_rate_leaves_pay_empty() {
        let mut shift = Shift::open(ShiftId::new("s-2"), EmployeeId::new("e-2"), start(), None);
        shift.close(start() + Duration::hours(4));
        assert_eq!(shift.hours_worked, Some(Decimal::from(4)));
        assert!(shift.total_pay.is_none());
    }
}
