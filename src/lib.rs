pub mod config;
pub mod route;
pub mod session;
pub mod shell;

#[cfg(test)]
mod tests;

use autoriza_client::{cache::Cache, lifecycle::Lifecycle, resources::Resources, Context};
use std::{path::PathBuf, sync::Arc};

use config::Config;
use session::{FileTokenStore, Session};
use shell::Shell;

/// Wires the session, the cache and the lifecycle controller from `config`.
pub fn build(config: &Config) -> Shell {
    let cx = Arc::new(Context::new(config.api.url_prefix.as_str()));
    let session = Arc::new(Session::new(
        cx.clone(),
        FileTokenStore::new(&config.session.token_path),
    ));
    session.initialize();

    let cache = Arc::new(Cache::new(config.cache.max_age()));
    let lifecycle = Lifecycle::new(Arc::new(Resources::new(cx, cache)));

    Shell::new(
        session,
        lifecycle,
        PathBuf::from(&config.download_dir),
    )
}
