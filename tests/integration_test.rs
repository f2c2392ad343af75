use endpoint_catalog::{
    discovery::source::SourceDiscovery,
    error::Error,
    extractor::{find_endpoints, BindingKind, EndpointExtractor, EndpointRecord, HttpMethod, ParameterInfo},
    renderer::{HtmlRenderer, REQUIRED_ASSETS},
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn service_project() -> TempDir {
    create_test_project(vec![
        ("Cargo.toml", "[package]\nname = \"widget-service\"\nversion = \"0.1.0\"\n"),
        ("src/lib.rs", "pub mod model;\npub mod server;\n"),
        ("src/model.rs", "pub struct Widget { pub id: String }\npub enum ApiError { NotFound }\n"),
        ("src/server/mod.rs", "pub mod api;\npub mod health;\n"),
        ("src/server/api/mod.rs", "pub mod widgets;\n"),
        ("src/server/api/widgets.rs", include_str!("fixtures/widgets_api.rs")),
        ("src/server/health.rs", include_str!("fixtures/health_api.rs")),
    ])
}

fn discover(project: &TempDir, namespace: &str) -> Vec<EndpointRecord> {
    let discovery = SourceDiscovery::new(project.path().to_path_buf());
    let extractor = EndpointExtractor::new("Server/api");
    find_endpoints(&discovery, namespace, &extractor).expect("Failed to find endpoints")
}

fn write_assets(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for asset in REQUIRED_ASSETS {
        fs::write(dir.join(asset), "/* asset */").unwrap();
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_minimal_resource_end_to_end() {
    let project = create_test_project(vec![(
        "src/lib.rs",
        r#"
#[route("/widgets")]
pub struct WidgetResource;

impl WidgetResource {
    #[get]
    pub fn fetch(&self, #[path_param("id")] id: String) -> String {
        id
    }
}
"#,
    )]);

    let records = discover(&project, "");

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.verb, HttpMethod::Get);
    assert!(record.uri.ends_with("/widgets/"));
    assert_eq!(
        record.path_parameters,
        vec![ParameterInfo {
            binding_kind: BindingKind::Path,
            type_name: "String".to_string(),
            name: Some("id".to_string()),
            default_value: None,
            pattern: None,
        }]
    );
    assert!(record.query_parameters.is_empty());
    assert!(record.payload_parameters.is_empty());
}

#[test]
fn test_namespace_limits_discovery() {
    let project = service_project();

    let records = discover(&project, "server::api");

    let summary: Vec<(HttpMethod, &str, &str)> = records
        .iter()
        .map(|r| (r.verb, r.uri.as_str(), r.handler_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (HttpMethod::Get, "Server/api/widgets/", "list"),
            (HttpMethod::Get, "Server/api/widgets/{id}/", "fetch"),
            (HttpMethod::Post, "Server/api/widgets/", "create"),
            (HttpMethod::Delete, "Server/api/widgets/{id}/", "remove"),
        ]
    );
    assert!(records
        .iter()
        .all(|r| r.owner_type == "server::api::widgets::WidgetResource"));
}

#[test]
fn test_crate_prefix_in_namespace_is_ignored() {
    let project = service_project();

    assert_eq!(discover(&project, "crate::server::api"), discover(&project, "server::api"));
}

#[test]
fn test_whole_tree_includes_every_resource() {
    let project = service_project();

    let records = discover(&project, "");

    assert_eq!(records.len(), 5);
    let health = &records[4];
    assert_eq!(health.uri, "Server/api/health/");
    // ambiguous verbs resolve to GET
    assert_eq!(health.verb, HttpMethod::Get);
    // Request is a context object
    assert!(health.payload_parameters.is_empty());
    assert_eq!(health.return_type, "String");
}

#[test]
fn test_unknown_namespace_is_a_discovery_error() {
    let project = service_project();
    let discovery = SourceDiscovery::new(project.path().to_path_buf());
    let extractor = EndpointExtractor::new("Server/api");

    let err = find_endpoints(&discovery, "server::missing", &extractor).unwrap_err();

    assert!(matches!(err, Error::Discovery { .. }));
}

#[test]
fn test_unparsable_file_is_a_discovery_error() {
    let project = create_test_project(vec![
        ("src/lib.rs", "#[route(\"/a\")] pub struct A;"),
        ("src/broken.rs", "pub fn broken( {"),
    ]);
    let discovery = SourceDiscovery::new(project.path().to_path_buf());

    let result = find_endpoints(&discovery, "", &EndpointExtractor::new("Server/api"));

    assert!(matches!(result, Err(Error::Discovery { .. })));
}

#[test]
fn test_record_details_from_fixture() {
    let project = service_project();

    let records = discover(&project, "server::api");
    let (list, fetch, create, remove) = (&records[0], &records[1], &records[2], &records[3]);

    // list: documentation, responses, context object skipped, query default
    assert_eq!(list.summary.as_deref(), Some("List widgets"));
    assert_eq!(list.notes.as_deref(), Some("Sorted by name"));
    assert_eq!(list.tags, strings(&["widgets", "read"]));
    assert_eq!(list.success_responses, strings(&["Vec<Widget>"]));
    assert_eq!(list.failure_responses, strings(&["ApiError"]));
    assert_eq!(list.return_type, "Vec<Widget>");
    assert_eq!(list.query_parameters.len(), 1);
    assert_eq!(list.query_parameters[0].name.as_deref(), Some("page"));
    assert_eq!(list.query_parameters[0].default_value.as_deref(), Some("1"));
    assert!(list.payload_parameters.is_empty());
    // content types come from the owner only
    assert_eq!(list.consumes, strings(&["application/json"]));
    assert!(list.produces.is_empty());
    assert_eq!(
        list.markers,
        strings(&["extends", "consumes", "secured", "produces", "api_operation", "api_responses"])
    );

    assert_eq!(fetch.path_parameters[0].pattern.as_deref(), Some("^[0-9]+$"));
    assert_eq!(fetch.return_type, "Result<Widget, ApiError>");
    assert_eq!(fetch.summary, None);
    assert!(fetch.tags.is_empty());

    assert_eq!(create.consumes, strings(&["application/xml"]));
    assert_eq!(create.payload_parameters, vec![ParameterInfo::new("Widget")]);
    assert!(create.markers.contains(&"deprecated".to_string()));

    assert_eq!(remove.return_type, "()");
    assert!(records
        .iter()
        .all(|r| !r.markers.iter().any(|m| m == "route" || m == "get" || m == "post" || m == "delete")));
}

#[test]
fn test_html_catalog_end_to_end() {
    let project = service_project();
    let records = discover(&project, "server::api");
    let docs = project.path().join("docs");
    write_assets(&docs);
    let output = docs.join("api-index.html");

    let written = HtmlRenderer::render(&records, &output, &docs).expect("Failed to render catalog");

    assert_eq!(written, output);
    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(html.matches("<tr class=").count(), 4);
    assert_eq!(html.matches("<tr class='gradeA'>").count(), 2);
    assert_eq!(html.matches("<tr class='gradeU'>").count(), 1);
    assert_eq!(html.matches("<tr class='gradeX'>").count(), 1);
    assert!(html.contains("Query: {page} (u32) Default = &quot;1&quot;<br/>"));
    assert!(html.contains("<td>@widgets<br/>@read<br/></td>"));
    assert!(html.contains("Success: Vec&lt;Widget&gt;<br/>Failure: ApiError"));
}

#[test]
fn test_html_catalog_without_assets() {
    let project = service_project();
    let records = discover(&project, "server::api");
    let docs = project.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let output = docs.join("api-index.html");

    let err = HtmlRenderer::render(&records, &output, &docs).unwrap_err();

    assert!(matches!(err, Error::AssetMissing(_)));
    assert!(!output.exists());
}

#[test]
fn test_serialized_catalogs() {
    let project = service_project();
    let records = discover(&project, "server::api");

    let json: serde_json::Value = serde_json::from_str(&serialize_json(&records).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[1]["uri"], "Server/api/widgets/{id}/");
    assert_eq!(json[2]["verb"], "POST");

    let yaml = serialize_yaml(&records).unwrap();
    assert!(yaml.contains("handler_name: remove"));
    assert!(yaml.contains("verb: DELETE"));
}
