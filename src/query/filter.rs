//! # Filter Set
//!
//! Assembles a SQL WHERE clause from caller-supplied values. Column
//! names are always `&'static str` supplied by the endpoint (the
//! allow-list); caller input only ever lands in the bind list, never in
//! the SQL text. Empty or absent values are dropped silently.

/// An ordered set of ANDed predicates plus their bind values
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    clauses: Vec<String>,
    binds: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality predicate when the caller supplied a non-empty value
    pub fn eq(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let v = v.trim();
            if !v.is_empty() {
                self.clauses.push(format!("{column} = ?"));
                self.binds.push(v.to_string());
            }
        }
        self
    }

    /// Add a mandatory equality predicate regardless of caller input
    pub fn require_eq(&mut self, column: &'static str, value: impl Into<String>) -> &mut Self {
        self.clauses.push(format!("{column} = ?"));
        self.binds.push(value.into());
        self
    }

    /// Add a mandatory predicate with a fixed clause shape, e.g.
    /// `YEAR(fecha) = ?`. The clause must contain exactly one placeholder.
    pub fn require_clause(&mut self, clause: &'static str, value: impl Into<String>) -> &mut Self {
        debug_assert_eq!(clause.matches('?').count(), 1);
        self.clauses.push(clause.to_string());
        self.binds.push(value.into());
        self
    }

    /// Render the full WHERE clause. `WHERE 1=1` alone when no filters
    /// are active, so callers can append unconditionally.
    pub fn where_clause(&self) -> String {
        let mut sql = String::from("WHERE 1=1");
        for clause in &self.clauses {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
        sql
    }

    /// Bind values in clause order
    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    /// Number of active predicates
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
