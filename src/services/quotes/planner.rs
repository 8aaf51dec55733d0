// File: src/services/quotes/planner.rs
use crate::services::quotes::errors::SyncError;
use chrono::{DateTime, Duration, Utc};

/// Максимальный горизонт загрузки: провайдер хранит минутные бары около месяца
pub const MAX_LOOKBACK_DAYS: u32 = 28;

/// Размер одного окна запроса. Жесткий лимит провайдера на span запроса
/// минутных баров составляет 8 дней, 7 оставляет запас в один день
pub const CHUNK_SPAN_DAYS: i64 = 7;

/// Одно ограниченное окно запроса к провайдеру
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Разбивает горизонт загрузки на последовательность окон не длиннее
/// CHUNK_SPAN_DAYS, покрывающих ровно [reference - lookback_days, reference].
///
/// Окна идут от старых к новым, чтобы watermark рос монотонно по мере
/// обработки. Если lookback_days не кратен размеру окна, короче получается
/// самое старое окно, никогда не новее.
pub fn plan_chunks(
    reference: DateTime<Utc>,
    lookback_days: u32,
) -> Result<Vec<ChunkWindow>, SyncError> {
    if lookback_days < 1 || lookback_days > MAX_LOOKBACK_DAYS {
        return Err(SyncError::InvalidConfiguration(lookback_days));
    }

    let earliest = reference - Duration::days(lookback_days as i64);

    // Идем назад от reference шагами по CHUNK_SPAN_DAYS, прижимая самое
    // старое окно к границе горизонта
    let mut windows = Vec::new();
    let mut end = reference;

    while end > earliest {
        let start = std::cmp::max(end - Duration::days(CHUNK_SPAN_DAYS), earliest);
        windows.push(ChunkWindow { start, end });
        end = start;
    }

    windows.reverse();

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_plan_rejects_out_of_range_lookback() {
        assert!(matches!(
            plan_chunks(reference(), 0),
            Err(SyncError::InvalidConfiguration(0))
        ));
        assert!(matches!(
            plan_chunks(reference(), 29),
            Err(SyncError::InvalidConfiguration(29))
        ));
    }

    #[test]
    fn test_plan_accepts_full_allowed_range() {
        for lookback in 1..=MAX_LOOKBACK_DAYS {
            assert!(plan_chunks(reference(), lookback).is_ok());
        }
    }

    #[test]
    fn test_windows_never_exceed_chunk_span() {
        for lookback in 1..=MAX_LOOKBACK_DAYS {
            let windows = plan_chunks(reference(), lookback).unwrap();
            for window in &windows {
                assert!(window.end - window.start <= Duration::days(CHUNK_SPAN_DAYS));
                assert!(window.start < window.end);
            }
        }
    }

    #[test]
    fn test_windows_are_contiguous_and_cover_exact_range() {
        for lookback in 1..=MAX_LOOKBACK_DAYS {
            let windows = plan_chunks(reference(), lookback).unwrap();

            assert_eq!(
                windows.first().unwrap().start,
                reference() - Duration::days(lookback as i64)
            );
            assert_eq!(windows.last().unwrap().end, reference());

            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn test_windows_are_ordered_oldest_first() {
        let windows = plan_chunks(reference(), 28).unwrap();
        for pair in windows.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_lookback_10_yields_partial_oldest_window() {
        let windows = plan_chunks(reference(), 10).unwrap();

        assert_eq!(windows.len(), 2);
        // Самое старое окно короткое (3 дня), новое полное (7 дней)
        assert_eq!(windows[0].end - windows[0].start, Duration::days(3));
        assert_eq!(windows[1].end - windows[1].start, Duration::days(7));
        assert_eq!(windows[1].end, reference());
    }

    #[test]
    fn test_exact_multiple_of_span_has_no_partial_window() {
        let windows = plan_chunks(reference(), 14).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end - windows[0].start, Duration::days(7));
        assert_eq!(windows[1].end - windows[1].start, Duration::days(7));
    }

    #[test]
    fn test_single_short_window_for_small_lookback() {
        let windows = plan_chunks(reference(), 1).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end - windows[0].start, Duration::days(1));
        assert_eq!(windows[0].end, reference());
    }

    #[test]
    fn test_plan_is_deterministic_for_fixed_reference() {
        assert_eq!(
            plan_chunks(reference(), 10).unwrap(),
            plan_chunks(reference(), 10).unwrap()
        );
    }
}
