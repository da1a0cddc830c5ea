//! The query context produced by the parser.

use serde::Serialize;

use super::params::ParamValue;

/// Validated query intent for one request against one edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryContext {
    /// Fields to project (empty = all fields)
    pub fields: Vec<String>,
    /// Relation handles to expand
    pub expansions: Vec<String>,
    /// Sort order, in the order given
    pub sort: Vec<SortSpec>,
    /// Pagination window, absent unless requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Filters, in parameter order
    pub filters: Vec<Filter>,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub ascending: bool,
}

/// Skip/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Records to skip (>= 0)
    pub skip: u64,
    /// Page size (> 0)
    pub limit: u64,
    /// Page number when the window was derived from `page`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: ParamValue,
}

/// Comparison operators for filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOp {
    /// `eq`
    Equals,
    /// `ne`
    NotEquals,
    /// `gt`
    GreaterThan,
    /// `gte`
    GreaterThanOrEquals,
    /// `lt`
    LowerThan,
    /// `lte`
    LowerThanOrEquals,
}

impl FilterOp {
    /// Map a where-clause operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(FilterOp::Equals),
            "ne" => Some(FilterOp::NotEquals),
            "gt" => Some(FilterOp::GreaterThan),
            "gte" => Some(FilterOp::GreaterThanOrEquals),
            "lt" => Some(FilterOp::LowerThan),
            "lte" => Some(FilterOp::LowerThanOrEquals),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            FilterOp::Equals => "eq",
            FilterOp::NotEquals => "ne",
            FilterOp::GreaterThan => "gt",
            FilterOp::GreaterThanOrEquals => "gte",
            FilterOp::LowerThan => "lt",
            FilterOp::LowerThanOrEquals => "lte",
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOp::Equals => write!(f, "="),
            FilterOp::NotEquals => write!(f, "!="),
            FilterOp::GreaterThan => write!(f, ">"),
            FilterOp::GreaterThanOrEquals => write!(f, ">="),
            FilterOp::LowerThan => write!(f, "<"),
            FilterOp::LowerThanOrEquals => write!(f, "<="),
        }
    }
}

impl QueryContext {
    /// Add a projected field. Duplicates are ignored.
    pub fn field(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f == field) {
            self.fields.push(field.to_string());
        }
    }

    /// Add a relation expansion. Duplicates are ignored.
    pub fn populate(&mut self, relation_id: &str) {
        if !self.expansions.iter().any(|r| r == relation_id) {
            self.expansions.push(relation_id.to_string());
        }
    }

    pub fn sort(&mut self, field: &str, ascending: bool) {
        self.sort.push(SortSpec {
            field: field.to_string(),
            ascending,
        });
    }

    pub fn paginate(&mut self, pagination: Pagination) {
        self.pagination = Some(pagination);
    }

    pub fn filter(&mut self, field: &str, op: FilterOp, value: ParamValue) {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value,
        });
    }

    /// True when the context places no constraint on the query.
    pub fn is_unconstrained(&self) -> bool {
        self.fields.is_empty()
            && self.expansions.is_empty()
            && self.sort.is_empty()
            && self.pagination.is_none()
            && self.filters.is_empty()
    }

    /// Every field name the context refers to.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .chain(self.sort.iter().map(|s| s.field.as_str()))
            .chain(self.filters.iter().map(|f| f.field.as_str()))
    }
}
