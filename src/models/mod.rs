pub mod movie;
pub mod poster;
pub mod recommendation;
pub mod stats;

pub use movie::{Movie, MovieRecord, Rating};
pub use poster::{PosterLookup, TmdbMovie, TmdbSearchResponse};
pub use recommendation::{CatalogEntry, Recommendation};
pub use stats::{DatasetStats, GenreCount, RatingBucket};
