use std::io;

use evolution_api::{Credentials, EvolutionClient, Options};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let instance = std::env::var("EVOLUTION_INSTANCE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "EVOLUTION_INSTANCE environment variable is required",
        )
    })?;
    let number = std::env::var("EVOLUTION_NUMBER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "EVOLUTION_NUMBER environment variable is required",
        )
    })?;
    let text = std::env::var("EVOLUTION_TEXT")
        .unwrap_or_else(|_| "Hello from the evolution-api demo.".to_owned());

    let client = EvolutionClient::new(Credentials::from_env()?)?;
    let messages = client.messages(instance)?;

    match messages.send_text(&number, &text, Options::new()).await {
        Ok(sent) => println!("sent: {sent}"),
        Err(err) => println!("{}", err.to_json()),
    }

    Ok(())
}
