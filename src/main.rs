use std::sync::Arc;

use primetime::{
    config::Config,
    models::{Endpoint, GenresResponse},
    source::{combine::movies_by_popularity, FanOutSource, SingleSource},
    transport::HttpTransport,
    FetchClient, ResultState,
};
use tracing_subscriber::EnvFilter;

const PAGES: u32 = 3;
const SHOWN: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let client = FetchClient::from_config(&config, Arc::new(HttpTransport::new()?))?;

    let genres: SingleSource<GenresResponse> = SingleSource::new(client.clone());
    let now_playing = FanOutSource::new(
        client,
        (1..=PAGES).map(Endpoint::now_playing).collect(),
        movies_by_popularity,
    )
    .with_policy(config.fan_out_policy);

    let mut updates = now_playing.subscribe();
    tokio::spawn(async move {
        while let Some(state) = updates.recv().await {
            if let ResultState::Success(movies) = state {
                tracing::debug!(movies = movies.len(), "Now playing updated");
            }
        }
    });

    let genres_done = genres.query(Endpoint::genres());
    let movies_done = now_playing.query();
    genres_done.await?;
    movies_done.await?;

    if let ResultState::Success(response) = genres.result() {
        tracing::info!(genres = response.genres.len(), "Genres loaded");
    }

    let ResultState::Success(movies) = now_playing.result() else {
        anyhow::bail!("Failed to load now playing movies");
    };

    for movie in movies.iter().take(SHOWN) {
        println!(
            "{:>8.1}  {} ({})",
            movie.popularity,
            movie.title,
            movie.release_year().unwrap_or("n/a")
        );
    }

    Ok(())
}
