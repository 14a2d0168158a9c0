//! Shared helpers for command handlers.

use std::future::Future;

use crate::cli::GlobalOpts;

/// Await `fut` behind a stderr spinner.
pub async fn with_spinner<T>(global: &GlobalOpts, message: &str, fut: impl Future<Output = T>) -> T {
    let bar = crate::output::spinner(global, message);
    let out = fut.await;
    bar.finish_and_clear();
    out
}

/// Status line on stderr, silenced by `--quiet`.
pub fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

/// Best-effort id of a created/updated entity. Responses wrap the entity
/// (`{"test": {"id": ..}}`, `{"run": ..}`) or return it bare.
pub fn entity_id(value: &serde_json::Value) -> String {
    let direct = |v: &serde_json::Value| match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    };

    ["test", "run"]
        .iter()
        .find_map(|key| value.get(key).and_then(direct))
        .or_else(|| direct(value).filter(|_| value.is_object()))
        .unwrap_or_default()
}
