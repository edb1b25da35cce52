//! Folds a parent LEFT JOIN junction result (one row per parent/child pair,
//! or one row with a NULL child) back into aggregates carrying a child id list.

use std::collections::HashMap;

use futures::{Stream, TryStreamExt};

use super::manager::DatabaseError;

/// A row of a parent ⟕ junction query.
pub trait JoinedRow {
    type Aggregate;

    fn parent_id(&self) -> i32;

    /// `None` when the LEFT JOIN produced no counterpart
    fn child_id(&self) -> Option<i32>;

    /// Scalar fields of the parent with an empty child list
    fn into_aggregate(self) -> Self::Aggregate;

    fn attach(aggregate: &mut Self::Aggregate, children: Vec<i32>);
}

/// Accumulates rows, keeping parents in first-appearance order and each
/// child id at most once per parent.
pub struct Aggregator<R: JoinedRow> {
    only: Option<i32>,
    order: Vec<i32>,
    parents: HashMap<i32, R::Aggregate>,
    children: HashMap<i32, Vec<i32>>,
}

impl<R: JoinedRow> Aggregator<R> {
    pub fn all() -> Self {
        Self {
            only: None,
            order: Vec::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Rows for any other parent are ignored.
    pub fn single(id: i32) -> Self {
        Self { only: Some(id), ..Self::all() }
    }

    pub fn push(&mut self, row: R) {
        let parent_id = row.parent_id();
        if self.only.is_some_and(|only| only != parent_id) {
            return;
        }

        let children = self.children.entry(parent_id).or_default();
        if let Some(child) = row.child_id() {
            if !children.contains(&child) {
                children.push(child);
            }
        }

        if !self.parents.contains_key(&parent_id) {
            self.order.push(parent_id);
            self.parents.insert(parent_id, row.into_aggregate());
        }
    }

    pub async fn consume<S>(mut self, mut rows: S) -> Result<Self, DatabaseError>
    where
        S: Stream<Item = Result<R, sqlx::Error>> + Unpin,
    {
        while let Some(row) = rows.try_next().await? {
            self.push(row);
        }
        Ok(self)
    }

    pub fn finish(mut self) -> Vec<R::Aggregate> {
        let mut out = Vec::with_capacity(self.order.len());
        for id in self.order {
            if let Some(mut aggregate) = self.parents.remove(&id) {
                R::attach(&mut aggregate, self.children.remove(&id).unwrap_or_default());
                out.push(aggregate);
            }
        }
        out
    }

    /// The single aggregate, or [`DatabaseError::NotFound`] when no row
    /// matched.
    pub fn finish_one(self) -> Result<R::Aggregate, DatabaseError> {
        self.finish().into_iter().next().ok_or(DatabaseError::NotFound)
    }
}

impl<R: JoinedRow> Extend<R> for Aggregator<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, rows: I) {
        for row in rows {
            self.push(row);
        }
    }
}
