use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::AppResult,
    models::{MovieRecord, Rating},
};

/// Reads the movies table from a MovieLens-style CSV file
pub fn load_movies<P: AsRef<Path>>(path: P) -> AppResult<Vec<MovieRecord>> {
    read_table(path.as_ref())
}

/// Reads the ratings table from a MovieLens-style CSV file
pub fn load_ratings<P: AsRef<Path>>(path: P) -> AppResult<Vec<Rating>> {
    read_table(path.as_ref())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    tracing::info!(path = %path.display(), "Loading CSV table");

    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()?;

    tracing::info!(path = %path.display(), rows = rows.len(), "CSV table loaded");

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_movies() {
        let file = write_temp(
            "movieId,title,genres\n\
             1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
             2,\"American President, The (1995)\",Comedy|Drama|Romance\n",
        );

        let movies = load_movies(file.path()).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].genres, "Comedy|Drama|Romance");
    }

    #[test]
    fn test_load_ratings() {
        let file = write_temp(
            "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n",
        );

        let ratings = load_ratings(file.path()).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 3);
        assert_eq!(ratings[1].rating, 4.5);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_movies("/nonexistent/path/movies.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_row_fails() {
        let file = write_temp("userId,movieId,rating,timestamp\n1,abc,4.0,964982703\n");
        let result = load_ratings(file.path());
        assert!(matches!(result, Err(crate::error::AppError::Csv(_))));
    }
}
