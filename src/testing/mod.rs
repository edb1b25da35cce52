//! In-memory repositories for service and router tests. Each operation runs
//! under one lock, so multi-step writes are atomic like their Postgres
//! counterparts.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::auth::Role;
use crate::database::models::{
    Actor, ActorFields, ActorRequest, Film, FilmFields, FilmRequest, User, UserChanges, UserRecord,
};
use crate::database::relations::dedup;
use crate::database::{ActorRepository, DatabaseError, FilmRepository, UserRepository};
use crate::filter::{FilmSearch, FilmSort, FilmSortField, SortDirection};

const USERNAME_TAKEN: &str = "User with such username already exists";

#[derive(Default)]
struct Inner {
    actors: BTreeMap<i32, ActorFields>,
    films: BTreeMap<i32, FilmFields>,
    /// (actor_id, film_id)
    links: Vec<(i32, i32)>,
    users: BTreeMap<i32, UserRecord>,
    next_id: i32,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn actor(&self, id: i32) -> Result<Actor, DatabaseError> {
        let fields = self.actors.get(&id).ok_or(DatabaseError::NotFound)?;
        let mut films_id: Vec<i32> = self.links.iter().filter(|(a, _)| *a == id).map(|(_, f)| *f).collect();
        films_id.sort_unstable();
        Ok(Actor {
            id,
            name: fields.name.clone(),
            sex: fields.sex.clone(),
            birthday: fields.birthday,
            films_id,
        })
    }

    fn film(&self, id: i32) -> Result<Film, DatabaseError> {
        let fields = self.films.get(&id).ok_or(DatabaseError::NotFound)?;
        let mut actors_id: Vec<i32> = self.links.iter().filter(|(_, f)| *f == id).map(|(a, _)| *a).collect();
        actors_id.sort_unstable();
        Ok(Film {
            id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            release_date: fields.release_date,
            rating: fields.rating,
            actors_id,
        })
    }

    fn user(&self, id: i32) -> Result<User, DatabaseError> {
        let record = self.users.get(&id).ok_or(DatabaseError::NotFound)?;
        let role = Role::from_code(record.role_id)
            .ok_or_else(|| DatabaseError::QueryError(format!("unknown role code {}", record.role_id)))?;
        Ok(User { id, username: record.username.clone(), role })
    }

    fn set_actor_films(&mut self, actor_id: i32, films_id: Option<&[i32]>) -> Result<(), DatabaseError> {
        let Some(films_id) = films_id else { return Ok(()) };
        if films_id.iter().any(|f| !self.films.contains_key(f)) {
            return Err(DatabaseError::MissingReference("film"));
        }
        self.links.retain(|(a, _)| *a != actor_id);
        self.links.extend(dedup(films_id).into_iter().map(|f| (actor_id, f)));
        Ok(())
    }

    fn set_film_actors(&mut self, film_id: i32, actors_id: Option<&[i32]>) -> Result<(), DatabaseError> {
        let Some(actors_id) = actors_id else { return Ok(()) };
        if actors_id.iter().any(|a| !self.actors.contains_key(a)) {
            return Err(DatabaseError::MissingReference("actor"));
        }
        self.links.retain(|(_, f)| *f != film_id);
        self.links.extend(dedup(actors_id).into_iter().map(|a| (a, film_id)));
        Ok(())
    }

    fn username_taken(&self, username: &str, except: Option<i32>) -> bool {
        self.users
            .iter()
            .any(|(id, u)| u.username == username && Some(*id) != except)
    }
}

/// Shared handle; clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }
}

#[async_trait]
impl ActorRepository for MemoryStore {
    async fn get(&self, id: i32) -> Result<Actor, DatabaseError> {
        self.lock().actor(id)
    }

    async fn list(&self) -> Result<Vec<Actor>, DatabaseError> {
        let inner = self.lock();
        inner.actors.keys().map(|id| inner.actor(*id)).collect()
    }

    async fn create(&self, fields: &ActorFields, films_id: &[i32]) -> Result<i32, DatabaseError> {
        let mut inner = self.lock();
        if films_id.iter().any(|f| !inner.films.contains_key(f)) {
            return Err(DatabaseError::MissingReference("film"));
        }
        let id = inner.next_id();
        inner.actors.insert(id, fields.clone());
        inner.set_actor_films(id, Some(films_id))?;
        Ok(id)
    }

    async fn put(&self, id: i32, fields: &ActorFields, films_id: Option<&[i32]>) -> Result<Actor, DatabaseError> {
        let mut inner = self.lock();
        if !inner.actors.contains_key(&id) {
            return Err(DatabaseError::NotFound);
        }
        inner.set_actor_films(id, films_id)?;
        inner.actors.insert(id, fields.clone());
        inner.actor(id)
    }

    async fn patch(&self, id: i32, request: &ActorRequest) -> Result<Actor, DatabaseError> {
        let mut inner = self.lock();
        let mut fields = inner.actors.get(&id).cloned().ok_or(DatabaseError::NotFound)?;
        inner.set_actor_films(id, request.films_id.as_deref())?;
        if let Some(name) = &request.name {
            fields.name = name.clone();
        }
        if let Some(sex) = &request.sex {
            fields.sex = sex.clone();
        }
        if let Some(birthday) = request.birthday {
            fields.birthday = birthday;
        }
        inner.actors.insert(id, fields);
        inner.actor(id)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let mut inner = self.lock();
        inner.actors.remove(&id).ok_or(DatabaseError::NotFound)?;
        inner.links.retain(|(a, _)| *a != id);
        Ok(())
    }
}

#[async_trait]
impl FilmRepository for MemoryStore {
    async fn get(&self, id: i32) -> Result<Film, DatabaseError> {
        self.lock().film(id)
    }

    async fn list(&self, sort: FilmSort) -> Result<Vec<Film>, DatabaseError> {
        let inner = self.lock();
        let mut films = inner
            .films
            .keys()
            .map(|id| inner.film(*id))
            .collect::<Result<Vec<_>, _>>()?;
        films.sort_by(|a, b| {
            let primary = match sort.field {
                FilmSortField::Id => a.id.cmp(&b.id),
                FilmSortField::Name => a.name.cmp(&b.name),
                FilmSortField::Description => a.description.cmp(&b.description),
                FilmSortField::ReleaseDate => a.release_date.cmp(&b.release_date),
                FilmSortField::Rating => a.rating.cmp(&b.rating),
            };
            let primary = match sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then(a.id.cmp(&b.id))
        });
        Ok(films)
    }

    async fn search(&self, search: &FilmSearch) -> Result<Vec<Film>, DatabaseError> {
        let inner = self.lock();
        let prefix = search.prefix();
        let mut out = Vec::new();
        for (id, fields) in inner.films.iter() {
            let matched = match search {
                FilmSearch::ByName(_) => fields.name.starts_with(prefix),
                FilmSearch::ByActor(_) => inner.links.iter().any(|(a, f)| {
                    *f == *id && inner.actors.get(a).is_some_and(|actor| actor.name.starts_with(prefix))
                }),
            };
            if matched {
                out.push(inner.film(*id)?);
            }
        }
        Ok(out)
    }

    async fn create(&self, fields: &FilmFields, actors_id: &[i32]) -> Result<i32, DatabaseError> {
        let mut inner = self.lock();
        if actors_id.iter().any(|a| !inner.actors.contains_key(a)) {
            return Err(DatabaseError::MissingReference("actor"));
        }
        let id = inner.next_id();
        inner.films.insert(id, fields.clone());
        inner.set_film_actors(id, Some(actors_id))?;
        Ok(id)
    }

    async fn put(&self, id: i32, fields: &FilmFields, actors_id: Option<&[i32]>) -> Result<Film, DatabaseError> {
        let mut inner = self.lock();
        if !inner.films.contains_key(&id) {
            return Err(DatabaseError::NotFound);
        }
        inner.set_film_actors(id, actors_id)?;
        inner.films.insert(id, fields.clone());
        inner.film(id)
    }

    async fn patch(&self, id: i32, request: &FilmRequest) -> Result<Film, DatabaseError> {
        let mut inner = self.lock();
        let mut fields = inner.films.get(&id).cloned().ok_or(DatabaseError::NotFound)?;
        inner.set_film_actors(id, request.actors_id.as_deref())?;
        if let Some(name) = &request.name {
            fields.name = name.clone();
        }
        if let Some(description) = &request.description {
            fields.description = description.clone();
        }
        if let Some(release_date) = request.release_date {
            fields.release_date = release_date;
        }
        if let Some(rating) = request.rating {
            fields.rating = rating;
        }
        inner.films.insert(id, fields);
        inner.film(id)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let mut inner = self.lock();
        inner.films.remove(&id).ok_or(DatabaseError::NotFound)?;
        inner.links.retain(|(_, f)| *f != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get(&self, id: i32) -> Result<User, DatabaseError> {
        self.lock().user(id)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let inner = self.lock();
        inner.users.keys().map(|id| inner.user(*id)).collect()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self.lock().users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<i32, DatabaseError> {
        let mut inner = self.lock();
        if inner.username_taken(username, None) {
            return Err(DatabaseError::Conflict(USERNAME_TAKEN.to_string()));
        }
        let id = inner.next_id();
        inner.users.insert(
            id,
            UserRecord {
                id,
                username: username.to_string(),
                password: password_hash.to_string(),
                role_id: role.code(),
            },
        );
        Ok(id)
    }

    async fn put(&self, id: i32, username: &str, password_hash: &str, role: Role) -> Result<User, DatabaseError> {
        let changes = UserChanges {
            username: Some(username.to_string()),
            password_hash: Some(password_hash.to_string()),
            role: Some(role),
        };
        UserRepository::patch(self, id, &changes).await
    }

    async fn patch(&self, id: i32, changes: &UserChanges) -> Result<User, DatabaseError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&id) {
            return Err(DatabaseError::NotFound);
        }
        if let Some(username) = &changes.username {
            if inner.username_taken(username, Some(id)) {
                return Err(DatabaseError::Conflict(USERNAME_TAKEN.to_string()));
            }
        }
        let record = inner.users.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        if let Some(username) = &changes.username {
            record.username = username.clone();
        }
        if let Some(hash) = &changes.password_hash {
            record.password = hash.clone();
        }
        if let Some(role) = changes.role {
            record.role_id = role.code();
        }
        inner.user(id)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        self.lock().users.remove(&id).map(|_| ()).ok_or(DatabaseError::NotFound)
    }
}
