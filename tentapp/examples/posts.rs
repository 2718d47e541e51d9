use std::env;

use tentapp::mac::DefaultCredentialProvider;
use tentapp::{default_context, Client, Config, Result};

const STATUS_POST_TYPE: &str = "https://tent.io/types/post/status/v0.1.0";
const BASIC_INFO_TYPE: &str = "https://tent.io/types/info/basic/v0.1.0";

fn print_statuses(posts: &serde_json::Value) {
    for post in posts.as_array().into_iter().flatten() {
        if post["type"] == STATUS_POST_TYPE {
            println!("{}", post["content"]["text"].as_str().unwrap_or_default());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let entity_url = env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.tent.is/".to_string());

    let client = Client::discover(default_context(), Config::new(), &entity_url).await?;
    println!("{} is served by {:?}", client.entity(), client.servers());

    println!("Posts without authentication:");
    print_statuses(&client.get_posts(None).await?);

    // Reads TENT_MAC_KEY_ID, TENT_MAC_KEY and TENT_MAC_ALGORITHM.
    if let Err(e) = client
        .authenticate_with(&DefaultCredentialProvider::new())
        .await
    {
        println!("Skipping authenticated calls: {e}");
        return Ok(());
    }

    println!("Posts with authentication:");
    print_statuses(&client.get_posts(None).await?);

    let followings = client.get_followings(None).await?;
    for following in followings.as_array().into_iter().flatten() {
        let name = following["profile"][BASIC_INFO_TYPE]["name"]
            .as_str()
            .unwrap_or_default();
        println!("{name} -> {}", following["entity"]);
    }

    Ok(())
}
