//! Command implementations for qs.

use edgeq::{
    parse_with, ApiRequest, ApiSchema, Config, Error, QueryContext, QueryParams, Router,
    SchemaFile,
};
use tracing::debug;

pub fn init(force: bool) -> edgeq::Result<()> {
    let config = Config::default_location()?;

    if config.config_path().exists() && !force {
        return Err(Error::AlreadyInitialized(config.root.clone()));
    }

    config.save()?;

    let schema_path = config.schema_path();
    if !schema_path.exists() || force {
        SchemaFile::sample().save(&schema_path)?;
    }

    println!("Initialized edgeq at {}", config.root.display());
    println!("  config: {}", config.config_path().display());
    println!("  schema: {}", schema_path.display());
    Ok(())
}

pub fn parse(edge_name: &str, query: &str, version: Option<&str>, format: &str) -> edgeq::Result<()> {
    let config = Config::load()?;
    let schema = config.load_schema()?;
    let api = select_api(&schema, version)?;

    let edge = api
        .edge(edge_name)
        .ok_or_else(|| Error::NotFound(format!("/{}", edge_name)))?;

    let params = QueryParams::parse(query);
    debug!(edge = %edge.name, params = params.len(), "parsing query string");
    let context = parse_with(&params, edge, &config.parser_options())?;

    match format {
        "text" => print_context(&context),
        _ => println!("{}", serde_json::to_string_pretty(&context)?),
    }
    Ok(())
}

pub fn route(method: &str, target: &str, format: &str) -> edgeq::Result<()> {
    let config = Config::load()?;
    let router = Router::from_schema(config.load_schema()?)?.with_options(config.parser_options());

    let request = router.resolve(method, target)?;

    match format {
        "text" => print_request(&request),
        _ => println!("{}", serde_json::to_string_pretty(&request)?),
    }
    Ok(())
}

pub fn edges(version: Option<&str>) -> edgeq::Result<()> {
    let config = Config::load()?;
    let schema = config.load_schema()?;

    let apis: Vec<&ApiSchema> = match version {
        Some(_) => vec![select_api(&schema, version)?],
        None => schema.apis.iter().collect(),
    };

    for api in apis {
        println!("API v{}", api.version);
        for edge in &api.edges {
            println!("  {}", edge.name);
            println!("    fields: {}", edge.fields.join(", "));
            for relation in &edge.relations {
                let kind = match relation.kind {
                    edgeq::RelationKind::OneToOne => "one-to-one",
                    edgeq::RelationKind::OneToMany => "one-to-many",
                    edgeq::RelationKind::ManyToMany => "many-to-many",
                };
                println!("    relation: {} ({}) -> {}", relation.name, kind, relation.relation_id);
            }
        }
    }
    Ok(())
}

fn select_api<'a>(schema: &'a SchemaFile, version: Option<&str>) -> edgeq::Result<&'a ApiSchema> {
    match version {
        Some(v) => schema
            .api(v)
            .ok_or_else(|| Error::UnsupportedVersion(v.to_string())),
        None => schema
            .apis
            .first()
            .ok_or_else(|| Error::Schema("no [[api]] declared".to_string())),
    }
}

fn print_request(request: &ApiRequest) {
    println!("{:<12} {:?}", "request:", request.request_type);
    println!("{:<12} v{}", "api:", request.api_version);
    println!("{:<12} {}", "edge:", request.edge);
    if let Some(id) = &request.id {
        println!("{:<12} {}", "id:", id);
    }
    print_context(&request.context);
}

fn print_context(context: &QueryContext) {
    if context.is_unconstrained() {
        println!("(no constraints)");
        return;
    }

    if !context.fields.is_empty() {
        println!("{:<12} {}", "fields:", context.fields.join(", "));
    }
    if !context.expansions.is_empty() {
        println!("{:<12} {}", "embed:", context.expansions.join(", "));
    }
    if !context.sort.is_empty() {
        let sort: Vec<String> = context
            .sort
            .iter()
            .map(|s| format!("{}{}", if s.ascending { "" } else { "-" }, s.field))
            .collect();
        println!("{:<12} {}", "sort:", sort.join(", "));
    }
    if let Some(p) = &context.pagination {
        match p.page {
            Some(page) => println!("{:<12} skip={} limit={} (page {})", "pagination:", p.skip, p.limit, page),
            None => println!("{:<12} skip={} limit={}", "pagination:", p.skip, p.limit),
        }
    }
    if !context.filters.is_empty() {
        println!("filters:");
        for f in &context.filters {
            println!("  {} {} {}", f.field, f.op, f.value);
        }
    }
}
