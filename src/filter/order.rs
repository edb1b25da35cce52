use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Film attributes a listing may be ordered by. The SQL column comes from
/// this closed set, never from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmSortField {
    Id,
    Name,
    Description,
    ReleaseDate,
    Rating,
}

impl FilmSortField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(FilmSortField::Id),
            "name" => Some(FilmSortField::Name),
            "description" => Some(FilmSortField::Description),
            "releaseDate" => Some(FilmSortField::ReleaseDate),
            "rating" => Some(FilmSortField::Rating),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            FilmSortField::Id => "film.id",
            FilmSortField::Name => "film.name",
            FilmSortField::Description => "film.description",
            FilmSortField::ReleaseDate => "film.release_date",
            FilmSortField::Rating => "film.rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmSort {
    pub field: FilmSortField,
    pub direction: SortDirection,
}

impl Default for FilmSort {
    fn default() -> Self {
        Self { field: FilmSortField::Rating, direction: SortDirection::Desc }
    }
}

impl FilmSort {
    /// Parses `<field>.<asc|desc>`. Missing or empty input means
    /// `rating.desc`.
    pub fn parse(sort_by: Option<&str>) -> Result<Self, FilterError> {
        let sort_by = match sort_by {
            None | Some("") => return Ok(Self::default()),
            Some(s) => s,
        };

        let mut parts = sort_by.split('.');
        let (field, direction) = match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(direction), None) => (field, direction),
            _ => return Err(FilterError::MalformedSort),
        };

        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(FilterError::InvalidDirection),
        };
        let field = FilmSortField::from_key(field).ok_or(FilterError::UnknownSortField)?;

        Ok(Self { field, direction })
    }

    /// Ties fall back to id so paging through equal keys is stable.
    pub fn order_by(&self) -> String {
        format!("ORDER BY {} {}, film.id", self.field.column(), self.direction.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_rating_desc() {
        assert_eq!(FilmSort::parse(None).unwrap(), FilmSort::default());
        assert_eq!(FilmSort::parse(Some("")).unwrap().order_by(), "ORDER BY film.rating DESC, film.id");
    }

    #[test]
    fn parses_each_field() {
        let sort = FilmSort::parse(Some("releaseDate.asc")).unwrap();
        assert_eq!(sort.field, FilmSortField::ReleaseDate);
        assert_eq!(sort.order_by(), "ORDER BY film.release_date ASC, film.id");
        assert_eq!(FilmSort::parse(Some("name.desc")).unwrap().field, FilmSortField::Name);
        assert_eq!(FilmSort::parse(Some("id.asc")).unwrap().field, FilmSortField::Id);
    }

    #[test]
    fn malformed_shapes() {
        assert_eq!(FilmSort::parse(Some("rating")), Err(FilterError::MalformedSort));
        assert_eq!(FilmSort::parse(Some("a.b.c")), Err(FilterError::MalformedSort));
    }

    #[test]
    fn direction_checked_before_field() {
        assert_eq!(FilmSort::parse(Some("bogus.up")), Err(FilterError::InvalidDirection));
        assert_eq!(FilmSort::parse(Some("rating.DESC")), Err(FilterError::InvalidDirection));
    }

    #[test]
    fn unknown_or_injected_fields_rejected() {
        assert_eq!(FilmSort::parse(Some("releasedate.asc")), Err(FilterError::UnknownSortField));
        assert_eq!(
            FilmSort::parse(Some("rating;DROP TABLE film.asc")),
            Err(FilterError::UnknownSortField)
        );
    }
}
