use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tentapp_core::{Context, RequestTimeout, Result};
use tentapp_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("tentapp-example/1.0")
        .build()
        .map_err(|e| tentapp_core::Error::config_invalid("invalid client").with_source(e))?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    // Probe an entity the way discovery does and print its Link headers.
    let mut req = http::Request::head("https://example.com/").body(Bytes::new())?;
    req.extensions_mut()
        .insert(RequestTimeout(Duration::from_secs(5)));

    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            for value in resp.headers().get_all(http::header::LINK) {
                println!("  link: {value:?}");
            }
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    Ok(())
}
