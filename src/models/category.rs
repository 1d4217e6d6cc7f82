use crate::{
    models::{ApiGenre, Endpoint},
    store::HistoryStore,
};

/// A browsable list of movies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieCategory {
    NowPlaying,
    Upcoming,
    Genre(ApiGenre),
}

impl MovieCategory {
    pub fn title(&self) -> &str {
        match self {
            MovieCategory::NowPlaying => "Now playing",
            MovieCategory::Upcoming => "Upcoming",
            MovieCategory::Genre(genre) => &genre.name,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            MovieCategory::NowPlaying => Endpoint::now_playing(1),
            MovieCategory::Upcoming => Endpoint::upcoming(1),
            MovieCategory::Genre(genre) => Endpoint::genre_samples(genre.id, 1),
        }
    }
}

/// What the home screen batch is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HomeFilter {
    /// Top rated plus recommendations for every liked movie
    #[default]
    All,
    Category(MovieCategory),
}

impl HomeFilter {
    /// Endpoints of the batch, in request order
    pub fn endpoints(&self, history: &HistoryStore) -> Vec<Endpoint> {
        match self {
            HomeFilter::All => std::iter::once(Endpoint::top_rated(1))
                .chain(
                    history
                        .liked()
                        .into_iter()
                        .map(|movie| Endpoint::recommendations(movie.id)),
                )
                .collect(),
            HomeFilter::Category(category) => vec![category.endpoint()],
        }
    }
}
