//! Request resolution: version prefix, edge path, method and query string.
//!
//! Paths look like `/v<version>/<edge>[/<id>]` or `/api/<edge>[/<id>]`; any
//! other path is resolved against the default (first) API. A first segment
//! such as `videos` only counts as a version when it is not an edge of the
//! default API.

use serde::Serialize;
use tracing::debug;

use crate::query::{parse_with, ParserOptions, QueryContext, QueryParams};
use crate::response::total_count_header;
use crate::schema::{ApiSchema, EdgeSchema, SchemaFile};
use crate::{Error, Result};

/// Operation requested by the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestType {
    Read,
    Create,
    Update,
    Patch,
    Delete,
}

impl RequestType {
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(RequestType::Read),
            "POST" => Some(RequestType::Create),
            "PUT" => Some(RequestType::Update),
            "PATCH" => Some(RequestType::Patch),
            "DELETE" => Some(RequestType::Delete),
            _ => None,
        }
    }
}

/// A fully resolved request, ready for a query executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// Version of the API serving the request.
    pub api_version: String,

    /// Target edge name.
    pub edge: String,

    /// Entity id when the path addresses a single record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub request_type: RequestType,

    pub context: QueryContext,

    /// Raw request body, attached after resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value for the total-count header given the executor's total.
    pub fn total_count(&self, total: u64) -> u64 {
        total_count_header(total, &self.context)
    }
}

/// Routes requests across one or more API versions.
#[derive(Debug, Clone)]
pub struct Router {
    apis: Vec<ApiSchema>,
    options: ParserOptions,
}

impl Router {
    /// Create a router. The first API is the default.
    pub fn new(apis: Vec<ApiSchema>) -> Result<Self> {
        if apis.is_empty() {
            return Err(Error::Schema("router needs at least one API".to_string()));
        }
        Ok(Self {
            apis,
            options: ParserOptions::default(),
        })
    }

    pub fn from_schema(schema: SchemaFile) -> Result<Self> {
        Self::new(schema.apis)
    }

    /// Builder: parser options used for every request.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn default_api(&self) -> &ApiSchema {
        &self.apis[0]
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.apis.iter().map(|a| a.version.as_str())
    }

    /// Resolve a request target (`/path?query`).
    pub fn resolve(&self, method: &str, target: &str) -> Result<ApiRequest> {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        self.resolve_parts(method, path, &QueryParams::parse(query))
    }

    /// Resolve a request whose query string is already decoded.
    pub fn resolve_parts(&self, method: &str, path: &str, params: &QueryParams) -> Result<ApiRequest> {
        let (api, resource) = self.select_api(path)?;
        let (edge, id) = resolve_resource(api, resource)?;
        debug!(version = %api.version, edge = %edge.name, ?id, "resolved request path");

        let request_type = RequestType::from_method(method)
            .ok_or_else(|| Error::MethodNotAllowed(method.to_string()))?;

        let context = parse_with(params, edge, &self.options)?;

        Ok(ApiRequest {
            api_version: api.version.clone(),
            edge: edge.name.clone(),
            id,
            request_type,
            context,
            body: None,
        })
    }

    /// Pick the API for a path and return the remaining resource path.
    ///
    /// `/v<token>/` selects a version unless `v<token>` is an edge of the
    /// default API and no served version is named `<token>`.
    fn select_api<'p>(&self, path: &'p str) -> Result<(&ApiSchema, &'p str)> {
        if let Some((segment, rest)) = path.strip_prefix('/').and_then(|p| p.split_once('/')) {
            if let Some(version) = segment.strip_prefix('v').filter(|v| !v.is_empty()) {
                if let Some(api) = self.apis.iter().find(|a| a.version == version) {
                    return Ok((api, rest));
                }
                if self.default_api().edge(segment).is_none() {
                    return Err(Error::UnsupportedVersion(version.to_string()));
                }
            }
        }

        let rest = path
            .strip_prefix("/api/")
            .or_else(|| path.strip_prefix('/'))
            .unwrap_or(path);
        Ok((self.default_api(), rest))
    }
}

/// Resolve `edge` or `edge/id` within an API.
fn resolve_resource<'a>(api: &'a ApiSchema, resource: &str) -> Result<(&'a EdgeSchema, Option<String>)> {
    let trimmed = resource.trim_end_matches('/');
    let not_found = || Error::NotFound(format!("/{}", trimmed));

    let mut segments = trimmed.split('/');
    let name = segments.next().filter(|s| !s.is_empty()).ok_or_else(not_found)?;
    let id = segments.next();
    if segments.next().is_some() || id.is_some_and(str::is_empty) {
        return Err(not_found());
    }

    let edge = api.edge(name).ok_or_else(not_found)?;
    Ok((edge, id.map(str::to_string)))
}
