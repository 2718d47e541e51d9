use reqwest::Client;
use tentapp_core::{Context, OsEnv};
use tentapp_http_send_reqwest::ReqwestHttpSend;

/// Build a [`Context`] that sends requests with a default [`reqwest::Client`]
/// and reads the OS environment.
pub fn default_context() -> Context {
    with_client(Client::new())
}

/// Build a [`Context`] around a preconfigured [`reqwest::Client`], for
/// callers who need their own TLS, proxy or redirect policy.
pub fn with_client(client: Client) -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(OsEnv)
}
