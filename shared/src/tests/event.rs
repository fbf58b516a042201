use super::date;
use crate::event::{default_selected_date, expand_dates, handle::EventDescriptor, Event};
use crate::validate::Validate;

#[test]
fn expand_inclusive_range() {
    let dates: Vec<_> = expand_dates(date("2025-03-10"), Some(date("2025-03-12"))).collect();
    assert_eq!(
        dates,
        vec![date("2025-03-10"), date("2025-03-11"), date("2025-03-12")]
    );
}

#[test]
fn expand_without_end_date() {
    let dates: Vec<_> = expand_dates(date("2025-03-10"), None).collect();
    assert_eq!(dates, vec![date("2025-03-10")]);
}

#[test]
fn expand_reversed_range_is_empty() {
    let mut span = expand_dates(date("2025-03-12"), Some(date("2025-03-10")));
    assert_eq!(span.len(), 0);
    assert_eq!(span.next(), None);
}

#[test]
fn expand_across_month_and_leap_day() {
    let span = expand_dates(date("2024-02-27"), Some(date("2024-03-02")));
    assert_eq!(span.len(), 5);

    let dates: Vec<_> = span.collect();
    assert_eq!(dates.first(), Some(&date("2024-02-27")));
    assert_eq!(dates[2], date("2024-02-29"));
    assert_eq!(dates.last(), Some(&date("2024-03-02")));
}

#[test]
fn span_length_tracks_consumption() {
    let mut span = expand_dates(date("2025-12-30"), Some(date("2026-01-02")));
    assert_eq!(span.len(), 4);
    span.next();
    assert_eq!(span.len(), 3);
    assert_eq!(span.next(), Some(date("2025-12-31")));
    assert_eq!(span.next(), Some(date("2026-01-01")));
    assert_eq!(span.next(), Some(date("2026-01-02")));
    assert_eq!(span.next(), None);
    assert_eq!(span.next(), None);
}

#[test]
fn selected_date_prefers_today() {
    let dates: Vec<_> = expand_dates(date("2025-03-10"), Some(date("2025-03-12"))).collect();
    assert_eq!(
        default_selected_date(&dates, date("2025-03-11")),
        Some(date("2025-03-11"))
    );
    assert_eq!(
        default_selected_date(&dates, date("2025-04-01")),
        Some(date("2025-03-10"))
    );
    assert_eq!(default_selected_date(&[], date("2025-04-01")), None);
}

#[test]
fn event_wire_format() {
    let event: Event = serde_json::from_value(serde_json::json!({
        "id": 7,
        "titulo": "Palestra",
        "descricao": null,
        "data_inicio": "2025-03-10",
        "data_fim": "2025-03-12",
        "horario": "08:00",
        "local_evento": "Auditório",
        "link_unico": "a1b2c3",
        "campus_id": 1,
        "autorizacoes_count": 3
    }))
    .unwrap();

    assert_eq!(event.title, "Palestra");
    assert_eq!(event.end_date, Some(date("2025-03-12")));
    assert!(event.is_multi_day());
    assert_eq!(event.dates().count(), 3);
    assert_eq!(event.authorization_count, 3);
}

#[test]
fn descriptor_sends_null_end_date() {
    let descriptor = EventDescriptor::new("Palestra", date("2025-03-10"));
    let value = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(value["data_fim"], serde_json::Value::Null);
    assert_eq!(value["data_inicio"], "2025-03-10");
    assert!(value.get("campus_id").is_none());
}

#[test]
fn descriptor_validation() {
    let mut descriptor = EventDescriptor::new("Palestra", date("2025-03-10"));
    assert!(descriptor.validate().is_ok());

    descriptor.end_date = Some(date("2025-03-09"));
    descriptor.title = "ab".to_owned();
    let errors = descriptor.validate().unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["title", "end_date"]);

    descriptor.title = String::new();
    descriptor.end_date = Some(date("2025-03-10"));
    descriptor.location = Some("x".repeat(501));
    let errors = descriptor.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].message, "title is required");
}
