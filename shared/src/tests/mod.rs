mod event;
mod validate;

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}
