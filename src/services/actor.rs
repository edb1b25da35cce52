use std::sync::Arc;

use crate::database::models::{Actor, ActorFields, ActorRequest};
use crate::database::ActorRepository;

use super::ServiceError;

#[derive(Clone)]
pub struct ActorService {
    repo: Arc<dyn ActorRepository>,
}

impl ActorService {
    pub fn new(repo: Arc<dyn ActorRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: i32) -> Result<Actor, ServiceError> {
        Ok(self.repo.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Actor>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn create(&self, fields: &ActorFields, films_id: &[i32]) -> Result<i32, ServiceError> {
        Ok(self.repo.create(fields, films_id).await?)
    }

    pub async fn put(&self, id: i32, fields: &ActorFields, films_id: Option<&[i32]>) -> Result<Actor, ServiceError> {
        Ok(self.repo.put(id, fields, films_id).await?)
    }

    pub async fn patch(&self, id: i32, request: &ActorRequest) -> Result<Actor, ServiceError> {
        Ok(self.repo.patch(id, request).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}
