use serde::{Deserialize, Serialize};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/w1280";

// ============================================================================
// Movies
// ============================================================================

/// One page of movies (now playing, upcoming, search, recommendations, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesResponse {
    pub results: Vec<Movie>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    pub overview: String,
    pub release_date: String,
    /// Absent from the details payload, which nests full genres instead
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    pub popularity: f32,
    pub vote_average: f32,
    pub vote_count: u64,
}

impl Movie {
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
    }

    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_ref()
            .map(|path| format!("{}{}", BACKDROP_BASE_URL, path))
    }

    /// Year part of `release_date` (`YYYY-MM-DD`); `None` when the date is empty
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .split('-')
            .next()
            .filter(|year| !year.is_empty())
    }

    /// Runtime as `H:MM`
    pub fn formatted_runtime(&self) -> Option<String> {
        self.runtime
            .map(|runtime| format!("{}:{:02}", runtime / 60, runtime % 60))
    }

    pub fn formatted_vote_count(&self) -> String {
        if self.vote_count < 1_000 {
            self.vote_count.to_string()
        } else {
            format!("{}K votes", self.vote_count / 1_000)
        }
    }
}

// ============================================================================
// Samples (onboarding picks)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Sample {
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesResponse {
    pub results: Vec<Sample>,
}

// ============================================================================
// Genres
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenresResponse {
    pub genres: Vec<ApiGenre>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiGenre {
    pub id: u64,
    pub name: String,
}

/// A genre together with the user's preference for it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub preference: GenrePreference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenrePreference {
    #[default]
    None,
    Favorite,
    Exclude,
}

impl Genre {
    pub fn with_preference(&self, preference: GenrePreference) -> Self {
        Self {
            preference,
            ..self.clone()
        }
    }
}

impl From<ApiGenre> for Genre {
    fn from(genre: ApiGenre) -> Self {
        Genre {
            id: genre.id,
            name: genre.name,
            preference: GenrePreference::None,
        }
    }
}
