use std::fmt::Display;

/// A logical request descriptor: API path plus ordered query parameters
///
/// Two endpoints are equal iff their paths and query parameters (including order) are equal.
/// Resolution into a fully qualified request key is done by [`crate::client::FetchClient`],
/// which merges in the fixed parameters (API key, language).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    path: String,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter, keeping declaration order
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    // ------------------------------------------------------------------------
    // Endpoint catalog
    // ------------------------------------------------------------------------

    pub fn genres() -> Self {
        Self::new("genre/movie/list")
    }

    pub fn movie_details(id: u64) -> Self {
        Self::new(format!("movie/{}", id))
    }

    pub fn now_playing(page: u32) -> Self {
        Self::new("movie/now_playing").with_query("page", page)
    }

    pub fn upcoming(page: u32) -> Self {
        Self::new("movie/upcoming").with_query("page", page)
    }

    pub fn top_rated(page: u32) -> Self {
        Self::new("movie/top_rated").with_query("page", page)
    }

    /// Popular movies of one genre, most popular first
    pub fn genre_samples(genre_id: u64, page: u32) -> Self {
        Self::new("discover/movie")
            .with_query("with_genres", genre_id)
            .with_query("sort_by", "popularity.desc")
            .with_query("page", page)
    }

    pub fn search(query: &str) -> Self {
        Self::new("search/movie").with_query("query", query)
    }

    pub fn recommendations(movie_id: u64) -> Self {
        Self::new(format!("movie/{}/recommendations", movie_id))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (name, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}
