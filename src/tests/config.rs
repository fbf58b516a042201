use std::time::Duration;

use crate::config::Config;

#[test]
fn partial_file() {
    let config: Config = toml::from_str(
        r#"
        download_dir = "/tmp/autorizacoes"

        [api]
        url_prefix = "https://api.example.com"

        [cache]
        max_age_secs = 30
        "#,
    )
    .unwrap();

    assert_eq!(config.api.url_prefix, "https://api.example.com");
    assert_eq!(config.cache.max_age(), Some(Duration::from_secs(30)));
    assert_eq!(config.download_dir, "/tmp/autorizacoes");
    assert_eq!(config.session, Config::default().session);
    assert_eq!(config.log.level, "info");
}

#[test]
fn empty_file() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.cache.max_age(), None);
}

#[test]
fn missing_file_uses_defaults() {
    let config = crate::config::init("./does/not/exist.toml").unwrap();
    assert_eq!(*config, Config::default());
}
