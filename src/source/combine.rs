//! Stock combiners for [`crate::source::FanOutSource`].
//!
//! Both sort on a stable key and drop duplicate ids, so their output does not depend on the
//! order in which responses arrived.

use std::collections::HashSet;

use crate::models::{Movie, MoviesResponse, Sample, SamplesResponse};

/// Flattens movie pages into one list, most popular first, each movie once
pub fn movies_by_popularity(responses: Vec<MoviesResponse>) -> Vec<Movie> {
    let mut movies: Vec<Movie> = responses.into_iter().flat_map(|r| r.results).collect();

    movies.sort_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut seen = HashSet::new();
    movies.retain(|movie| seen.insert(movie.id));
    movies
}

/// Flattens sample pages into one list ordered by id, each sample once
pub fn unique_samples(responses: Vec<SamplesResponse>) -> Vec<Sample> {
    let mut samples: Vec<Sample> = responses.into_iter().flat_map(|r| r.results).collect();
    samples.sort_by_key(|sample| sample.id);
    samples.dedup_by_key(|sample| sample.id);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, popularity: f32) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: "2020-01-01".to_string(),
            genre_ids: vec![],
            runtime: None,
            popularity,
            vote_average: 7.0,
            vote_count: 100,
        }
    }

    fn sample(id: u64) -> Sample {
        Sample {
            id,
            title: format!("Sample {}", id),
            poster_path: Some("/p.jpg".to_string()),
            backdrop_path: None,
        }
    }

    fn ids(movies: &[Movie]) -> Vec<u64> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_movies_by_popularity_orders_and_dedups() {
        let pages = vec![
            MoviesResponse {
                results: vec![movie(1, 10.0), movie(2, 50.0)],
            },
            MoviesResponse {
                results: vec![movie(2, 50.0), movie(3, 30.0)],
            },
        ];

        assert_eq!(ids(&movies_by_popularity(pages)), vec![2, 3, 1]);
    }

    #[test]
    fn test_movies_by_popularity_is_arrival_order_independent() {
        let a = MoviesResponse {
            results: vec![movie(1, 10.0), movie(4, 10.0)],
        };
        let b = MoviesResponse {
            results: vec![movie(3, 99.0)],
        };

        assert_eq!(
            movies_by_popularity(vec![a.clone(), b.clone()]),
            movies_by_popularity(vec![b, a])
        );
    }

    #[test]
    fn test_movies_by_popularity_empty() {
        assert!(movies_by_popularity(Vec::new()).is_empty());
    }

    #[test]
    fn test_unique_samples() {
        let pages = vec![
            SamplesResponse {
                results: vec![sample(5), sample(1)],
            },
            SamplesResponse {
                results: vec![sample(1), sample(3)],
            },
        ];

        let ids: Vec<u64> = unique_samples(pages).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
