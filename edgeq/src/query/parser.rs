//! Query-string parser for edge queries.

use std::borrow::Cow;

use tracing::debug;

use super::context::{FilterOp, Pagination, QueryContext};
use super::params::QueryParams;
use crate::schema::EdgeSchema;
use crate::{Error, Result};

const FIELDS: &str = "fields";
const EMBED: &str = "embed";
const SORT: &str = "sort";
const LIMIT: &str = "limit";
const SKIP: &str = "skip";
const PAGE: &str = "page";

/// Keys consumed before the filter pass.
const RESERVED_KEYS: [&str; 6] = [FIELDS, EMBED, SORT, LIMIT, SKIP, PAGE];

const WHERE_PREFIX: &str = "where";

/// Tunables for [`parse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Page size used when pagination is requested without a valid `limit`.
    pub default_limit: u64,
}

impl Default for ParserOptions {
    #[inline]
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// How a non-reserved key is interpreted.
enum KeyKind<'a> {
    Reserved,
    /// `where...`, with the prefix stripped
    Where(&'a str),
    /// `field=value` shorthand for an equality filter
    Implicit,
}

/// Parse query parameters against an edge with default options.
pub fn parse(params: &QueryParams, edge: &EdgeSchema) -> Result<QueryContext> {
    parse_with(params, edge, &ParserOptions::default())
}

/// Parse query parameters against an edge.
///
/// Keys are evaluated as fields, embed, sort, pagination, then every
/// remaining key in parameter order. The first invalid key fails the parse.
pub fn parse_with(
    params: &QueryParams,
    edge: &EdgeSchema,
    options: &ParserOptions,
) -> Result<QueryContext> {
    let mut context = QueryContext::default();

    if let Some(fields) = list_param(params, FIELDS) {
        debug!(edge = %edge.name, %fields, "parsing field selection");
        for field in fields.split(',') {
            ensure_field(edge, field)?;
            context.field(field);
        }
    }

    if let Some(embed) = list_param(params, EMBED) {
        debug!(edge = %edge.name, %embed, "parsing relation expansions");
        for name in embed.split(',') {
            let relation = edge
                .one_to_one_relation(name)
                .ok_or_else(|| Error::InvalidRelatedField(name.to_string()))?;
            context.populate(&relation.relation_id);
        }
    }

    if let Some(sort) = list_param(params, SORT) {
        debug!(edge = %edge.name, %sort, "parsing sort order");
        for entry in sort.split(',') {
            let (field, ascending) = match entry.strip_prefix('-') {
                Some(field) => (field, false),
                None => (entry, true),
            };
            ensure_field(edge, field)?;
            context.sort(field, ascending);
        }
    }

    if let Some(pagination) = resolve_pagination(params, options.default_limit) {
        debug!(
            skip = pagination.skip,
            limit = pagination.limit,
            page = ?pagination.page,
            "pagination requested"
        );
        context.paginate(pagination);
    }

    for (key, value) in params.iter() {
        match classify(key) {
            KeyKind::Reserved => continue,
            KeyKind::Where(clause) => {
                let (op_token, field) = split_where_clause(clause)?;
                ensure_field(edge, field)?;
                let op = match op_token {
                    None => FilterOp::Equals,
                    Some(token) => FilterOp::from_token(token)
                        .ok_or_else(|| Error::InvalidFilterOperator(token.to_string()))?,
                };
                debug!(%field, op = op.token(), "where filter");
                context.filter(field, op, value.clone());
            }
            KeyKind::Implicit => {
                ensure_field(edge, key)?;
                debug!(field = %key, "implicit equality filter");
                context.filter(key, FilterOp::Equals, value.clone());
            }
        }
    }

    Ok(context)
}

fn classify(key: &str) -> KeyKind<'_> {
    if RESERVED_KEYS.contains(&key) {
        KeyKind::Reserved
    } else if let Some(rest) = key.strip_prefix(WHERE_PREFIX) {
        KeyKind::Where(rest)
    } else {
        KeyKind::Implicit
    }
}

fn ensure_field(edge: &EdgeSchema, field: &str) -> Result<()> {
    if edge.has_field(field) {
        Ok(())
    } else {
        Err(Error::InvalidField(field.to_string()))
    }
}

/// Comma-list parameter value; `None` when absent or empty.
fn list_param<'a>(params: &'a QueryParams, key: &str) -> Option<Cow<'a, str>> {
    params.get(key).map(|v| v.joined()).filter(|v| !v.is_empty())
}

/// Split `[field]` or `[op][field]` into its operator token and field.
fn split_where_clause(clause: &str) -> Result<(Option<&str>, &str)> {
    match bracket_segments(clause)?.as_slice() {
        [field] => Ok((None, *field)),
        [op, field] => Ok((Some(*op), *field)),
        _ => Err(Error::InvalidWhereClause),
    }
}

/// Extract the tokens of a `[a][b]...` sequence. Every token must be non-empty.
fn bracket_segments(mut input: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();

    while !input.is_empty() {
        let inner = input.strip_prefix('[').ok_or(Error::InvalidWhereClause)?;
        let end = inner.find(']').ok_or(Error::InvalidWhereClause)?;
        if end == 0 {
            return Err(Error::InvalidWhereClause);
        }
        segments.push(&inner[..end]);
        input = &inner[end + 1..];
    }

    Ok(segments)
}

/// Non-negative integer value of a pagination key, if well-formed.
fn pagination_number(params: &QueryParams, key: &str) -> Option<u64> {
    params.get(key)?.last().trim().parse().ok()
}

/// Pagination window, or `None` if no pagination key holds a valid number.
fn resolve_pagination(params: &QueryParams, default_limit: u64) -> Option<Pagination> {
    let limit = pagination_number(params, LIMIT);
    let skip = pagination_number(params, SKIP);
    let page = pagination_number(params, PAGE);

    if limit.is_none() && skip.is_none() && page.is_none() {
        return None;
    }

    let limit = limit
        .filter(|&l| l > 0)
        .unwrap_or_else(|| default_limit.max(1));

    let pagination = match page.filter(|&p| p > 0) {
        Some(page) => Pagination {
            skip: (page - 1).saturating_mul(limit),
            limit,
            page: Some(page),
        },
        None => Pagination {
            skip: skip.unwrap_or(0),
            limit,
            page: None,
        },
    };

    Some(pagination)
}
