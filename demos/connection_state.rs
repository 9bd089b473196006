use std::io;

use evolution_api::{Credentials, EvolutionClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let instance = std::env::var("EVOLUTION_INSTANCE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "EVOLUTION_INSTANCE environment variable is required",
        )
    })?;

    let client = EvolutionClient::new(Credentials::from_env()?)?;
    let state = client.instances(instance)?.connection_state().await;

    match state {
        Ok(state) => println!("state: {state}"),
        Err(err) => println!("{}", err.to_json()),
    }

    Ok(())
}
