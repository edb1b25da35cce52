//! Partial UPDATE statements built from whichever fields a request carried.
//!
//! Column names are always `&'static str` chosen by the caller, never taken
//! from input; values travel as positional parameters.

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;
use sqlx::{PgConnection, Postgres};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    SmallInt(i16),
    Date(NaiveDate),
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v)
    }
}

impl From<i16> for SqlParam {
    fn from(v: i16) -> Self {
        SqlParam::SmallInt(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(v)
    }
}

/// Collects `column = $n` assignments in call order.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<(&'static str, SqlParam)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self { table, assignments: Vec::new() }
    }

    /// Adds an assignment when `value` is present; absent fields stay untouched.
    pub fn set<V: Into<SqlParam>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// `None` when nothing was assigned. The id is always the last parameter.
    pub fn build(self, id: i32) -> Option<UpdateStatement> {
        if self.assignments.is_empty() {
            return None;
        }

        let mut sets = Vec::with_capacity(self.assignments.len());
        let mut params = Vec::with_capacity(self.assignments.len() + 1);
        for (i, (column, value)) in self.assignments.into_iter().enumerate() {
            sets.push(format!("{} = ${}", column, i + 1));
            params.push(value);
        }
        params.push(SqlParam::Int(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING id",
            self.table,
            sets.join(", "),
            params.len()
        );
        Some(UpdateStatement { sql, params })
    }
}

impl UpdateStatement {
    /// Runs the update, returning the id of the updated row or `None` if no
    /// row matched.
    pub async fn execute(&self, conn: &mut PgConnection) -> Result<Option<i32>, sqlx::Error> {
        let mut q = sqlx::query_scalar::<_, i32>(&self.sql);
        for p in self.params.iter() {
            q = bind_param(q, p);
        }
        q.fetch_optional(conn).await
    }
}

fn bind_param<'q>(
    q: QueryScalar<'q, Postgres, i32, PgArguments>,
    v: &'q SqlParam,
) -> QueryScalar<'q, Postgres, i32, PgArguments> {
    match v {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::SmallInt(i) => q.bind(*i),
        SqlParam::Date(d) => q.bind(*d),
    }
}
