use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ServiceError;

/// Временное окно сеанса [start, end]. Границы включительные.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ShowWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ServiceError> {
        if start >= end {
            return Err(ServiceError::InvalidRequest(
                "start_time должен быть раньше end_time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Пересечение закрытых интервалов: сеанс, заканчивающийся ровно
    /// в момент начала другого, тоже считается пересечением.
    pub fn overlaps(&self, other: &ShowWindow) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }
}

/// Запрос на создание сеанса после декодирования и проверки на границе HTTP.
#[derive(Debug, Clone)]
pub struct NewShow {
    pub date: NaiveDate,
    pub window: ShowWindow,
    pub screen_number: i32,
    pub movie_title: String,
    pub multiplex_id: i64,
    pub seat_price: Option<i32>,
}

/// Строка `shows`, готовая к вставке: все ссылки уже разрешены.
#[derive(Debug, Clone)]
pub struct ShowSlot {
    pub show_date: NaiveDate,
    pub window: ShowWindow,
    pub screen_id: i64,
    pub movie_id: i64,
    pub multiplex_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Show {
    pub show_id: i64,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub screen_id: i64,
    pub movie_id: i64,
    pub multiplex_id: i64,
}

impl Show {
    pub fn window(&self) -> Option<ShowWindow> {
        ShowWindow::new(self.start_time, self.end_time).ok()
    }
}

/// Сеанс в выдаче расписания.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowListing {
    pub show_id: i64,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub screen_number: i32,
    pub title: String,
    pub language: String,
    pub multiplex_name: String,
    pub locality: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn w(start: (u32, u32), end: (u32, u32)) -> ShowWindow {
        ShowWindow::new(t(start.0, start.1), t(end.0, end.1)).unwrap()
    }

    #[test]
    fn touching_boundary_overlaps() {
        let evening = w((18, 0), (20, 0));
        assert!(evening.overlaps(&w((20, 0), (21, 30))));
        assert!(evening.overlaps(&w((16, 0), (18, 0))));
    }

    #[test]
    fn partial_and_nested_windows_overlap() {
        let evening = w((18, 0), (20, 0));
        assert!(evening.overlaps(&w((17, 0), (18, 30))));
        assert!(evening.overlaps(&w((18, 30), (19, 0))));
        assert!(evening.overlaps(&w((17, 0), (21, 0))));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let evening = w((18, 0), (20, 0));
        assert!(!evening.overlaps(&w((20, 1), (22, 0))));
        assert!(!evening.overlaps(&w((9, 0), (17, 59))));
    }

    #[test]
    fn empty_or_inverted_window_is_rejected() {
        assert!(ShowWindow::new(t(20, 0), t(18, 0)).is_err());
        assert!(ShowWindow::new(t(18, 0), t(18, 0)).is_err());
    }

    fn window() -> impl Strategy<Value = ShowWindow> {
        (0u32..1439, 1u32..600).prop_map(|(start, len)| {
            let end = (start + len).min(1439);
            let start = start.min(end - 1);
            ShowWindow::new(t(start / 60, start % 60), t(end / 60, end % 60)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in window(), b in window()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn window_overlaps_itself(a in window()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn overlap_matches_interval_arithmetic(a in window(), b in window()) {
            let expected = a.start() <= b.end() && b.start() <= a.end();
            prop_assert_eq!(a.overlaps(&b), expected);
        }
    }
}
