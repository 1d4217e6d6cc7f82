use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    client::FetchClient,
    error::AppResult,
    models::{ApiGenre, Endpoint, Genre, GenrePreference, GenresResponse},
    store::{load_array, save_array, ArrayStore},
};

const GENRES_KEY: &str = "genres";

/// Known genres and the user's preference for each
pub struct GenresStore {
    store: Arc<dyn ArrayStore>,
    genres: Vec<Genre>,
}

impl GenresStore {
    pub fn load(store: Arc<dyn ArrayStore>) -> AppResult<Self> {
        let genres = load_array(store.as_ref(), GENRES_KEY)?.unwrap_or_default();
        Ok(Self { store, genres })
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn favorites(&self) -> Vec<&Genre> {
        self.genres
            .iter()
            .filter(|genre| genre.preference == GenrePreference::Favorite)
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.id == id)
    }

    /// Adds genres not known yet; existing preferences are left untouched
    pub fn store(&mut self, api_genres: Vec<ApiGenre>) -> AppResult<()> {
        let known: HashSet<u64> = self.genres.iter().map(|genre| genre.id).collect();
        let before = self.genres.len();

        self.genres.extend(
            api_genres
                .into_iter()
                .filter(|genre| !known.contains(&genre.id))
                .map(Genre::from),
        );

        tracing::debug!(added = self.genres.len() - before, "Stored genres");
        self.persist()
    }

    /// Marks `favorites` as favorite, adding the ones not known yet
    pub fn store_favorites(&mut self, favorites: &[Genre]) -> AppResult<()> {
        for favorite in favorites {
            let marked = favorite.with_preference(GenrePreference::Favorite);
            match self.genres.iter_mut().find(|genre| genre.id == favorite.id) {
                Some(genre) => *genre = marked,
                None => self.genres.push(marked),
            }
        }
        self.persist()
    }

    /// Sets the preference of a known genre; unknown ids are ignored
    pub fn update(&mut self, genre_id: u64, preference: GenrePreference) -> AppResult<()> {
        let Some(genre) = self.genres.iter_mut().find(|genre| genre.id == genre_id) else {
            return Ok(());
        };
        *genre = genre.with_preference(preference);
        self.persist()
    }

    /// Fetches the genre catalog and stores the genres not known yet
    pub async fn refresh(&mut self, client: &FetchClient) -> AppResult<()> {
        let response: GenresResponse = client.fetch(&Endpoint::genres()).await?;
        self.store(response.genres)
    }

    fn persist(&self) -> AppResult<()> {
        save_array(self.store.as_ref(), GENRES_KEY, &self.genres)
    }
}
