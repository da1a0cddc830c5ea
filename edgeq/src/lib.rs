//! edgeq: query contexts for REST edges
//!
//! Turns decoded HTTP query strings into validated query intents (projection,
//! expansion, sorting, pagination and filters) for a data-access layer.

pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod router;
pub mod schema;

pub use config::Config;
pub use error::{Error, Result};
pub use query::{
    parse, parse_with, Filter, FilterOp, Pagination, ParamValue, ParserOptions, QueryContext,
    QueryParams, SortSpec,
};
pub use response::{total_count_header, ErrorResponse, TOTAL_COUNT_HEADER};
pub use router::{ApiRequest, RequestType, Router};
pub use schema::{ApiSchema, EdgeSchema, Relation, RelationKind, SchemaFile};
