//! Sales reporting.

use chrono::{DateTime, Duration, Utc};
use pos_bridge_adapters::{Adapter, PosAdapter};
use pos_bridge_core::ReportPeriod;

use super::{CommandError, emit};

/// Default report window when `--start` is omitted.
const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Resolve the report window. The start defaults to a week before the end.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` if the window is inverted.
pub fn window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CommandError> {
    let end = end.unwrap_or(now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));
    if start > end {
        return Err(CommandError::InvalidArgument(format!(
            "--start {start} is after --end {end}"
        )));
    }
    Ok((start, end))
}

/// Print aggregated sales for the window.
///
/// # Errors
///
/// Returns `CommandError` for an inverted window or a failed report.
pub async fn sales(
    adapter: &Adapter,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    period: ReportPeriod,
) -> Result<(), CommandError> {
    let (start, end) = window(start, end, Utc::now())?;
    tracing::info!(%start, %end, ?period, "Building sales report");
    emit(&adapter.get_sales_data(start, end, period).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_window_defaults_to_last_week() {
        let now = at("2026-05-08T12:00:00Z");
        let (start, end) = window(None, None, now).unwrap();
        assert_eq!(end, now);
        assert_eq!(start, at("2026-05-01T12:00:00Z"));
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let now = at("2026-05-08T12:00:00Z");
        let result = window(Some(now), Some(at("2026-05-01T00:00:00Z")), now);
        assert!(matches!(result, Err(CommandError::InvalidArgument(_))));
    }
}
