use serde::Deserialize;

use super::error::FilterError;

/// Raw `/api/film/search` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub actor: Option<String>,
}

/// What to match a prefix against. `name` wins when both are given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmSearch {
    ByName(String),
    ByActor(String),
}

impl FilmSearch {
    pub fn from_params(params: &SearchParams) -> Result<Self, FilterError> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(name) = non_empty(&params.name) {
            Ok(FilmSearch::ByName(name))
        } else if let Some(actor) = non_empty(&params.actor) {
            Ok(FilmSearch::ByActor(actor))
        } else {
            Err(FilterError::MissingSearchTerm)
        }
    }

    pub fn prefix(&self) -> &str {
        match self {
            FilmSearch::ByName(p) | FilmSearch::ByActor(p) => p,
        }
    }

    /// LIKE pattern matching values that start with the prefix literally.
    pub fn like_pattern(&self) -> String {
        like_prefix(self.prefix())
    }
}

/// Escapes LIKE metacharacters (backslash is the default escape) and
/// appends `%`.
pub fn like_prefix(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: Option<&str>, actor: Option<&str>) -> SearchParams {
        SearchParams { name: name.map(Into::into), actor: actor.map(Into::into) }
    }

    #[test]
    fn name_takes_precedence() {
        let search = FilmSearch::from_params(&params(Some("Ma"), Some("Ke"))).unwrap();
        assert_eq!(search, FilmSearch::ByName("Ma".into()));
    }

    #[test]
    fn empty_name_falls_through_to_actor() {
        let search = FilmSearch::from_params(&params(Some(""), Some("Ke"))).unwrap();
        assert_eq!(search, FilmSearch::ByActor("Ke".into()));
    }

    #[test]
    fn nothing_to_search_by() {
        assert_eq!(FilmSearch::from_params(&params(None, Some(""))), Err(FilterError::MissingSearchTerm));
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_prefix("Ma"), "Ma%");
        assert_eq!(like_prefix("100%_"), "100\\%\\_%");
        assert_eq!(like_prefix("a\\b"), "a\\\\b%");
        assert_eq!(like_prefix("x' OR '1'='1"), "x' OR '1'='1%");
    }
}
