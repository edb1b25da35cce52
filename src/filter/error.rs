use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("malformed sortBy query parameter, should be field.orderdirection")]
    MalformedSort,

    #[error("malformed orderdirection in sortBy query parameter, should be asc or desc")]
    InvalidDirection,

    #[error("unknown field in sortBy query parameter")]
    UnknownSortField,

    #[error("search requires a name or actor query parameter")]
    MissingSearchTerm,
}
