//! Validador de agenda y calendario
//!
//! Funciones puras que calculan la ventana de reserva permitida y la
//! disponibilidad de horarios. La ventana de dos meses acota la
//! planificación de capacidad del taller; la grilla empieza en lunes
//! según la convención local del calendario.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Primer horario atendible del taller
const FIRST_SLOT: (u32, u32) = (8, 0);
/// Último horario atendible del taller
const LAST_SLOT: (u32, u32) = (17, 30);
/// Minutos entre horarios consecutivos
const SLOT_INTERVAL_MINUTES: i64 = 30;

/// Celda no vacía de la grilla del calendario
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
}

/// Fecha máxima reservable: hoy más dos meses calendario
pub fn max_booking_date(today: NaiveDate) -> NaiveDate {
    today + Months::new(2)
}

/// true si y solo si today <= date <= today + 2 meses
pub fn is_within_booking_window(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && date <= max_booking_date(today)
}

/// true si combinar date y time produce un instante en o antes de now
pub fn is_time_slot_in_past(time: NaiveTime, date: NaiveDate, now: DateTime<Utc>) -> bool {
    date.and_time(time) <= now.naive_utc()
}

/// Genera la grilla del mes: lunes primero, 7 columnas, celdas de
/// relleno None al inicio y al final para que el largo sea múltiplo de 7.
pub fn generate_calendar_grid(month: u32, year: i32) -> Vec<Option<CalendarDay>> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };

    let mut grid: Vec<Option<CalendarDay>> = Vec::with_capacity(42);

    // Relleno inicial hasta el día de la semana del 1 (lunes = 0)
    for _ in 0..first.weekday().num_days_from_monday() {
        grid.push(None);
    }

    let mut current = first;
    while current.month() == month {
        grid.push(Some(CalendarDay {
            day: current.day(),
            date: current,
        }));
        current = match current.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }

    // Relleno final hasta completar la última semana
    while grid.len() % 7 != 0 {
        grid.push(None);
    }

    grid
}

/// Horarios del taller para una fecha, excluyendo los ya pasados
/// cuando la fecha es el día de hoy.
pub fn available_time_slots(date: NaiveDate, now: DateTime<Utc>) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    let first = NaiveTime::from_hms_opt(FIRST_SLOT.0, FIRST_SLOT.1, 0)
        .expect("first slot is a valid time");
    let last = NaiveTime::from_hms_opt(LAST_SLOT.0, LAST_SLOT.1, 0)
        .expect("last slot is a valid time");

    let mut slot = first;
    loop {
        if !is_time_slot_in_past(slot, date, now) {
            slots.push(slot);
        }
        if slot >= last {
            break;
        }
        slot += Duration::minutes(SLOT_INTERVAL_MINUTES);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_booking_window_bounds() {
        let today = date(2026, 8, 24);
        let max = max_booking_date(today);
        assert_eq!(max, date(2026, 10, 24));

        assert!(is_within_booking_window(today, today));
        assert!(is_within_booking_window(max, today));
        assert!(!is_within_booking_window(today - Duration::days(1), today));
        assert!(!is_within_booking_window(max + Duration::days(1), today));
    }

    #[test]
    fn test_booking_window_clamps_short_months() {
        // 31 de diciembre + 2 meses cae en el último día de febrero
        let today = date(2026, 12, 31);
        assert_eq!(max_booking_date(today), date(2027, 2, 28));
    }

    #[test]
    fn test_time_slot_in_past() {
        let today = date(2026, 8, 24);
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 14, 0, 0).unwrap();

        let t1359 = NaiveTime::from_hms_opt(13, 59, 0).unwrap();
        let t1401 = NaiveTime::from_hms_opt(14, 1, 0).unwrap();
        let t1400 = NaiveTime::from_hms_opt(14, 0, 0).unwrap();

        assert!(is_time_slot_in_past(t1359, today, now));
        assert!(!is_time_slot_in_past(t1401, today, now));
        // Un instante igual a now cuenta como pasado
        assert!(is_time_slot_in_past(t1400, today, now));
    }

    #[test]
    fn test_future_date_never_in_past() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 23, 59, 0).unwrap();
        let tomorrow = date(2026, 8, 25);
        let early = NaiveTime::from_hms_opt(0, 1, 0).unwrap();
        assert!(!is_time_slot_in_past(early, tomorrow, now));
    }

    #[test]
    fn test_calendar_grid_invariants() {
        for (month, year, expected_days) in [
            (1u32, 2026, 31usize),
            (2, 2026, 28),
            (2, 2028, 29), // bisiesto
            (4, 2026, 30),
            (12, 2026, 31),
        ] {
            let grid = generate_calendar_grid(month, year);
            assert_eq!(grid.len() % 7, 0, "mes {}/{}", month, year);
            let days = grid.iter().filter(|c| c.is_some()).count();
            assert_eq!(days, expected_days, "mes {}/{}", month, year);
        }
    }

    #[test]
    fn test_calendar_grid_monday_first() {
        // Junio de 2026 empieza lunes: sin relleno inicial
        let june = generate_calendar_grid(6, 2026);
        assert_eq!(
            june[0],
            Some(CalendarDay {
                day: 1,
                date: date(2026, 6, 1)
            })
        );

        // Agosto de 2026 empieza sábado: cinco celdas de relleno
        let august = generate_calendar_grid(8, 2026);
        assert!(august[..5].iter().all(|c| c.is_none()));
        assert_eq!(
            august[5],
            Some(CalendarDay {
                day: 1,
                date: date(2026, 8, 1)
            })
        );
    }

    #[test]
    fn test_calendar_grid_invalid_month() {
        assert!(generate_calendar_grid(13, 2026).is_empty());
    }

    #[test]
    fn test_available_time_slots_filters_past() {
        let today = date(2026, 8, 24);
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 14, 0, 0).unwrap();

        let slots = available_time_slots(today, now);
        // 14:00 cuenta como pasado; el primero disponible es 14:30
        assert_eq!(slots[0], NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(*slots.last().unwrap(), NaiveTime::from_hms_opt(17, 30, 0).unwrap());

        // Para una fecha futura aparecen todos los horarios
        let tomorrow = date(2026, 8, 25);
        let all = available_time_slots(tomorrow, now);
        assert_eq!(all.len(), 20);
        assert_eq!(all[0], NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }
}
