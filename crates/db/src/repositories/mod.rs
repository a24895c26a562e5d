//! PostgreSQL repositories.
//!
//! Each repository wraps a cloned `PgPool` and implements one store trait.
//! List and count queries share a WHERE clause built by [`Conditions`] so the
//! total always matches the filtered page.

pub mod field_repo;
pub mod field_rule_repo;
pub mod field_type_repo;
pub mod health_repo;
pub mod project_repo;
pub mod role_repo;
pub mod user_repo;

pub use field_repo::FieldRepo;
pub use field_rule_repo::FieldRuleRepo;
pub use field_type_repo::FieldTypeRepo;
pub use health_repo::PgHealthCheck;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built filter queries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Accumulates WHERE conditions and their bind values in placeholder order.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    values: Vec<BindValue>,
}

impl Conditions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a condition that uses one new placeholder. Every `{}` in
    /// `template` is replaced by that placeholder (`$n`).
    pub(crate) fn bind(&mut self, template: &str, value: BindValue) {
        let placeholder = format!("${}", self.values.len() + 1);
        self.clauses.push(template.replace("{}", &placeholder));
        self.values.push(value);
    }

    /// Add a condition without bind values.
    pub(crate) fn raw(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    pub(crate) fn search(&mut self, term: Option<&str>, columns: &[&str]) {
        if let Some(term) = term {
            let template = columns
                .iter()
                .map(|column| format!("{column} ILIKE {{}}"))
                .collect::<Vec<_>>()
                .join(" OR ");
            self.bind(&format!("({template})"), BindValue::Text(like_pattern(term)));
        }
    }

    /// `WHERE ...`, or an empty string when no condition was added.
    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Index of the next free placeholder (for trailing LIMIT / OFFSET).
    pub(crate) fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    pub(crate) fn bind_all<'q, O>(
        &'q self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in &self.values {
            query = match value {
                BindValue::BigInt(v) => query.bind(*v),
                BindValue::Text(v) => query.bind(v.as_str()),
            };
        }
        query
    }

    pub(crate) fn bind_all_scalar<'q>(
        &'q self,
        mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        for value in &self.values {
            query = match value {
                BindValue::BigInt(v) => query.bind(*v),
                BindValue::Text(v) => query.bind(v.as_str()),
            };
        }
        query
    }
}

/// Wrap `term` in `%...%` for `ILIKE`, escaping the wildcards it contains so
/// they match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ada"), "%ada%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn conditions_number_placeholders_in_order() {
        let mut conditions = Conditions::new();
        conditions.search(Some("x"), &["name", "email"]);
        conditions.bind("status = {}", BindValue::Text("ACTIVE".into()));
        conditions.raw("cardinality(\"values\") > 0");

        assert_eq!(
            conditions.where_clause(),
            "WHERE (name ILIKE $1 OR email ILIKE $1) AND status = $2 \
             AND cardinality(\"values\") > 0"
        );
        assert_eq!(conditions.next_index(), 3);
    }

    #[test]
    fn empty_conditions_have_no_where_clause() {
        let mut conditions = Conditions::new();
        conditions.search(None, &["name"]);
        assert_eq!(conditions.where_clause(), "");
        assert_eq!(conditions.next_index(), 1);
    }
}
