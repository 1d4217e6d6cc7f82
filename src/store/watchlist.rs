use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    store::{load_array, save_array, ArrayStore},
};

const WATCHLIST_KEY: &str = "watchlist";

/// Movies the user wants to watch, persisted after every change
pub struct WatchlistStore {
    store: Arc<dyn ArrayStore>,
    movies: Vec<Movie>,
}

impl WatchlistStore {
    pub fn load(store: Arc<dyn ArrayStore>) -> AppResult<Self> {
        let movies = load_array(store.as_ref(), WATCHLIST_KEY)?.unwrap_or_default();
        Ok(Self { store, movies })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.movies.iter().any(|movie| movie.id == movie_id)
    }

    /// Adds `movie` unless it is already listed
    pub fn add(&mut self, movie: Movie) -> AppResult<()> {
        if self.contains(movie.id) {
            return Ok(());
        }
        self.movies.push(movie);
        self.persist()
    }

    pub fn remove(&mut self, movie_id: u64) -> AppResult<()> {
        self.movies.retain(|movie| movie.id != movie_id);
        self.persist()
    }

    pub fn remove_at(&mut self, index: usize) -> AppResult<()> {
        if index >= self.movies.len() {
            return Err(AppError::InvalidInput(format!(
                "Watchlist index {} out of range",
                index
            )));
        }
        self.movies.remove(index);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        save_array(self.store.as_ref(), WATCHLIST_KEY, &self.movies)
    }
}
