pub mod category;
pub mod endpoint;
pub mod history;
pub mod movie;

pub use category::{HomeFilter, MovieCategory};
pub use endpoint::Endpoint;
pub use history::{HistoryMovie, Rating};
pub use movie::{
    ApiGenre, Genre, GenrePreference, GenresResponse, Movie, MoviesResponse, Sample,
    SamplesResponse,
};
