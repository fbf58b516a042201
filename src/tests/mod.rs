mod config;
mod route;
mod session;

use autoriza_shared::account::Role;
use chrono::{DateTime, TimeZone, Utc};

/// Builds an unsigned JWT carrying the claims the backend issues.
fn token(email: &str, role: Role, exp: i64) -> String {
    let claims = serde_json::json!({ "sub": email, "tipo": role.as_str(), "exp": exp });
    format!(
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.signature",
        base64::encode_config(&serde_json::to_vec(&claims).unwrap(), base64::URL_SAFE_NO_PAD)
    )
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}
