use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{HistoryMovie, Movie, Rating, Sample},
    store::{load_array, save_array, ArrayStore},
};

const HISTORY_KEY: &str = "history_movies";

/// The user's rated movies, persisted after every change
pub struct HistoryStore {
    store: Arc<dyn ArrayStore>,
    movies: Vec<HistoryMovie>,
}

impl HistoryStore {
    pub fn load(store: Arc<dyn ArrayStore>) -> AppResult<Self> {
        let movies = load_array(store.as_ref(), HISTORY_KEY)?.unwrap_or_default();
        Ok(Self { store, movies })
    }

    pub fn movies(&self) -> &[HistoryMovie] {
        &self.movies
    }

    pub fn liked(&self) -> Vec<&HistoryMovie> {
        self.movies
            .iter()
            .filter(|movie| movie.rating == Rating::Like)
            .collect()
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.movies.iter().any(|movie| movie.id == movie_id)
    }

    pub fn add(&mut self, movie: &Movie, rating: Rating) -> AppResult<()> {
        self.movies
            .push(HistoryMovie::new(movie.id, movie.title.clone(), rating));
        self.persist()
    }

    /// Records onboarding picks as liked
    pub fn add_samples(&mut self, samples: &[Sample]) -> AppResult<()> {
        self.movies.extend(
            samples
                .iter()
                .map(|sample| HistoryMovie::new(sample.id, sample.title.clone(), Rating::Like)),
        );
        self.persist()
    }

    /// Re-rates a movie in place; unknown ids are ignored
    pub fn update_rating(&mut self, movie_id: u64, rating: Rating) -> AppResult<()> {
        let Some(index) = self.movies.iter().position(|movie| movie.id == movie_id) else {
            return Ok(());
        };

        let previous = &self.movies[index];
        let rerated = HistoryMovie::new(previous.id, previous.title.clone(), rating);
        self.movies[index] = rerated;
        self.persist()
    }

    pub fn remove_at(&mut self, index: usize) -> AppResult<()> {
        if index >= self.movies.len() {
            return Err(AppError::InvalidInput(format!(
                "History index {} out of range",
                index
            )));
        }
        self.movies.remove(index);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        save_array(self.store.as_ref(), HISTORY_KEY, &self.movies)
    }
}
