use std::sync::Arc;

use crate::database::models::{Film, FilmFields, FilmRequest};
use crate::database::FilmRepository;
use crate::filter::{FilmSearch, FilmSort, SearchParams};

use super::ServiceError;

#[derive(Clone)]
pub struct FilmService {
    repo: Arc<dyn FilmRepository>,
}

impl FilmService {
    pub fn new(repo: Arc<dyn FilmRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: i32) -> Result<Film, ServiceError> {
        Ok(self.repo.get(id).await?)
    }

    /// `sort_by` is the raw `sortBy` query value.
    pub async fn list(&self, sort_by: Option<&str>) -> Result<Vec<Film>, ServiceError> {
        let sort = FilmSort::parse(sort_by)?;
        Ok(self.repo.list(sort).await?)
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Film>, ServiceError> {
        let search = FilmSearch::from_params(params)?;
        Ok(self.repo.search(&search).await?)
    }

    pub async fn create(&self, fields: &FilmFields, actors_id: &[i32]) -> Result<i32, ServiceError> {
        Ok(self.repo.create(fields, actors_id).await?)
    }

    pub async fn put(&self, id: i32, fields: &FilmFields, actors_id: Option<&[i32]>) -> Result<Film, ServiceError> {
        Ok(self.repo.put(id, fields, actors_id).await?)
    }

    pub async fn patch(&self, id: i32, request: &FilmRequest) -> Result<Film, ServiceError> {
        Ok(self.repo.patch(id, request).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}
