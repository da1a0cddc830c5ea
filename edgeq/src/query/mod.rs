//! Query-string language for edge queries.
//!
//! # Syntax Overview
//!
//! - **Projection**: `fields=id,name`
//! - **Expansion**: `embed=profile,address` (one-to-one relations only)
//! - **Sorting**: `sort=-createdAt,name` (`-` = descending)
//! - **Pagination**: `limit=20&skip=40` or `limit=20&page=3`
//! - **Filters**: `where[name]=Alice`, `where[gte][age]=18`, or `name=Alice`
//!
//! Filter operators: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`.

mod context;
mod params;
mod parser;

pub use context::{Filter, FilterOp, Pagination, QueryContext, SortSpec};
pub use params::{ParamValue, QueryParams};
pub use parser::{parse, parse_with, ParserOptions};
