pub mod error;
pub mod order;
pub mod search;

pub use error::FilterError;
pub use order::{FilmSort, FilmSortField, SortDirection};
pub use search::{like_prefix, FilmSearch, SearchParams};
