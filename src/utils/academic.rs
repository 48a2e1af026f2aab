//! Academic rules shared by the cursos, actividades and entregas services.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub const ANIO_ACADEMICO_MIN: i32 = 2000;
pub const ANIO_ACADEMICO_MAX: i32 = 2100;
pub const ANIO_ESTUDIANTIL_MIN: i32 = 1;
pub const ANIO_ESTUDIANTIL_MAX: i32 = 6;
pub const PONDERACION_MAX: f64 = 100.0;
pub const CALIFICACION_MAX: f64 = 20.0;

pub fn is_valid_anio_academico(anio: i32) -> bool {
    (ANIO_ACADEMICO_MIN..=ANIO_ACADEMICO_MAX).contains(&anio)
}

pub fn is_valid_anio_estudiantil(anio: i32) -> bool {
    (ANIO_ESTUDIANTIL_MIN..=ANIO_ESTUDIANTIL_MAX).contains(&anio)
}

pub fn is_valid_ponderacion(value: f64) -> bool {
    value.is_finite() && (0.0..=PONDERACION_MAX).contains(&value)
}

pub fn is_valid_calificacion(value: f64) -> bool {
    value.is_finite() && (0.0..=CALIFICACION_MAX).contains(&value)
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_fecha(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(fecha) = DateTime::parse_from_rfc3339(value) {
        return Some(fecha.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// A due date is acceptable when it falls today or later.
pub fn is_on_or_after_today(fecha: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    fecha >= start_of_day(now)
}

/// Average with two decimals; `"0.00"` when nothing has been graded.
pub fn format_promedio(promedio: Option<f64>) -> String {
    format!("{:.2}", promedio.unwrap_or(0.0))
}

/// Parses id strings, dropping invalid and repeated ones while keeping order.
pub fn parse_unique_ids(raw: &[String]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|id| Uuid::parse_str(id.trim()).ok())
        .filter(|id| seen.insert(*id))
        .collect()
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}

/// List filters: `todos` and blank values mean "no filter".
pub fn filter_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("todos"))
}

/// Trimmed, non-empty string.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_year_ranges() {
        assert!(is_valid_anio_academico(2000));
        assert!(is_valid_anio_academico(2100));
        assert!(!is_valid_anio_academico(1999));
        assert!(!is_valid_anio_academico(2101));
        assert!(is_valid_anio_estudiantil(1));
        assert!(is_valid_anio_estudiantil(6));
        assert!(!is_valid_anio_estudiantil(0));
        assert!(!is_valid_anio_estudiantil(7));
    }

    #[test]
    fn test_score_ranges() {
        assert!(is_valid_ponderacion(0.0));
        assert!(is_valid_ponderacion(100.0));
        assert!(!is_valid_ponderacion(100.5));
        assert!(!is_valid_ponderacion(-1.0));
        assert!(!is_valid_ponderacion(f64::NAN));
        assert!(is_valid_calificacion(20.0));
        assert!(!is_valid_calificacion(21.0));
    }

    #[test]
    fn test_parse_fecha() {
        let date = parse_fecha("2030-05-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap());

        let ts = parse_fecha("2030-05-01T10:30:00-04:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2030, 5, 1, 14, 30, 0).unwrap());

        assert!(parse_fecha("mañana").is_none());
        assert!(parse_fecha("2030-13-01").is_none());
    }

    #[test]
    fn test_today_boundary() {
        let now = Utc.with_ymd_and_hms(2030, 5, 1, 18, 0, 0).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap()
        );
        assert!(is_on_or_after_today(parse_fecha("2030-05-01").unwrap(), now));
        assert!(!is_on_or_after_today(parse_fecha("2030-04-30").unwrap(), now));
    }

    #[test]
    fn test_format_promedio() {
        assert_eq!(format_promedio(Some(15.5)), "15.50");
        assert_eq!(format_promedio(Some(13.333)), "13.33");
        assert_eq!(format_promedio(None), "0.00");
    }

    #[test]
    fn test_parse_unique_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = vec![
            a.to_string(),
            "basura".to_string(),
            b.to_string(),
            format!(" {} ", a),
        ];
        assert_eq!(parse_unique_ids(&raw), vec![a, b]);
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://drive.google.com/x"));
        assert!(is_http_url("http://a.b"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("ftp://files.com/x"));
        assert!(!is_http_url("archivo.pdf"));
    }

    #[test]
    fn test_filter_value() {
        assert_eq!(filter_value(Some("todos")), None);
        assert_eq!(filter_value(Some("Todos")), None);
        assert_eq!(filter_value(Some("  ")), None);
        assert_eq!(filter_value(None), None);
        assert_eq!(filter_value(Some(" examen ")), Some("examen"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Ana ")), Some("Ana".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
