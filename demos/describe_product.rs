//! Product description example with the local template as a safety net.
//!
//! Run with: `cargo run --example describe_product -- [photo.jpg]`
//!
//! Uses `GOOGLE_API_KEY` or `GCP_PROJECT` when set; otherwise prints the
//! local template.

use iagen::{copy, Channel, DescriptionRequest, GeminiConfig, GeminiTextProvider};

#[tokio::main]
async fn main() -> iagen::Result<()> {
    let mut request = DescriptionRequest::new(
        "Snack Saludable Quinoa 120 g",
        "sabor: coco; sin azúcar añadida; fibra: alta",
        Channel::Marketplace,
    );
    if let Some(path) = std::env::args().nth(1) {
        request = request.with_image(std::fs::read(path)?);
    }

    let provider = GeminiTextProvider::connect(&GeminiConfig::from_env()).await.ok();
    let outcome = copy::describe_or_local(provider.as_ref(), &request).await;

    if let Some(reason) = outcome.reason() {
        println!("(local template: {reason})");
    }
    let description = outcome.into_value();
    println!("{}\n\n{}\n", description.short, description.long);
    for bullet in &description.bullets {
        println!("- {bullet}");
    }
    println!("{}", description.hashtags.join(" "));

    Ok(())
}
