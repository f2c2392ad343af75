//! Endpoint extraction: turning discovered types and their markers into
//! [`EndpointRecord`]s.
//!
//! The extractor is a pure function of its inputs. It reads only the typed
//! [`MarkerSet`](crate::marker::MarkerSet)s carried by the descriptors, so every rule
//! here can be exercised with hand-built fixtures.
//!
//! # Example
//!
//! ```no_run
//! use endpoint_catalog::discovery::source::SourceDiscovery;
//! use endpoint_catalog::extractor::{find_endpoints, EndpointExtractor};
//! use std::path::PathBuf;
//!
//! let discovery = SourceDiscovery::new(PathBuf::from("./src"));
//! let extractor = EndpointExtractor::new("Server/api");
//! let records = find_endpoints(&discovery, "server::api", &extractor).unwrap();
//! println!("Found {} endpoints", records.len());
//! ```

mod metadata;
mod parameters;

use crate::config::CatalogConfig;
use crate::discovery::{MethodDescriptor, TypeDescriptor, TypeDiscovery};
use crate::error::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The verbs an endpoint can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// When a method carries several verb markers, the first of these it carries wins.
pub const VERB_PRECEDENCE: [HttpMethod; 4] = [
    HttpMethod::Get,
    HttpMethod::Put,
    HttpMethod::Post,
    HttpMethod::Delete,
];

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// The attribute that declares this verb (`get`, `post`, ...).
    pub fn attribute_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }

    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a handler parameter is bound from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BindingKind {
    /// Path segment (e.g. `/widgets/{id}`)
    Path,
    /// Query string (e.g. `?page=2`)
    Query,
    /// Request body; the default when no binding marker is present
    #[default]
    Payload,
}

/// One handler parameter that is not a framework context object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub binding_kind: BindingKind,
    pub type_name: String,
    pub name: Option<String>,
    pub default_value: Option<String>,
    pub pattern: Option<String>,
}

impl ParameterInfo {
    /// An unbound payload parameter of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            binding_kind: BindingKind::Payload,
            type_name: type_name.into(),
            name: None,
            default_value: None,
            pattern: None,
        }
    }
}

/// The normalized description of one discovered route and verb.
///
/// Records are assembled once by [`EndpointExtractor::extract`] and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Base URI + type-level path + method-level path, ending with `/`
    pub uri: String,
    pub verb: HttpMethod,
    /// Module-qualified name of the declaring type
    pub owner_type: String,
    pub handler_name: String,
    pub return_type: String,
    pub path_parameters: Vec<ParameterInfo>,
    pub query_parameters: Vec<ParameterInfo>,
    pub payload_parameters: Vec<ParameterInfo>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    /// Response types declared with status 200
    pub success_responses: Vec<String>,
    /// Response types declared with any other status, without duplicates
    pub failure_responses: Vec<String>,
    /// Marker names seen on the type, its ancestors and the handler
    pub markers: Vec<String>,
}

impl fmt::Display for EndpointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndpointRecord {{ uri='{}', method={} }}", self.uri, self.verb)
    }
}

/// Builds endpoint records from discovered types.
#[derive(Debug, Clone)]
pub struct EndpointExtractor {
    base_uri: String,
    context_types: Vec<String>,
}

impl EndpointExtractor {
    /// Creates an extractor with the given base URI and the default context types.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            context_types: CatalogConfig::default().context_types,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            base_uri: config.base_uri.clone(),
            context_types: config.context_types.clone(),
        }
    }

    /// Replaces the list of bare type names treated as framework context objects.
    pub fn with_context_types(mut self, context_types: Vec<String>) -> Self {
        self.context_types = context_types;
        self
    }

    /// Resolves the path every endpoint of `owner` starts with.
    ///
    /// Only the type's own route marker is used; ancestors never contribute to the
    /// path. The route is given a leading and trailing `/` and prefixed with the base
    /// URI.
    ///
    /// # Arguments
    ///
    /// * `owner` - The route-marked resource type
    ///
    /// # Returns
    ///
    /// The base path, e.g. `Server/api/widgets/` for `#[route("widgets")]`.
    pub fn resolve_base_path(&self, owner: &TypeDescriptor) -> String {
        let mut path = owner.markers.route().unwrap_or_default().to_string();

        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }

        format!("{}{}", self.base_uri.trim_end_matches('/'), path)
    }

    /// Builds the record for one verb-marked handler of `owner`.
    ///
    /// `base_path` is the value of [`resolve_base_path`](Self::resolve_base_path) for
    /// `owner`. Absent markers leave the corresponding fields empty; this never fails.
    ///
    /// # Arguments
    ///
    /// * `owner` - The type declaring the handler
    /// * `handler` - The verb-marked method
    /// * `verb` - The verb resolved by [`handler_verb`](Self::handler_verb)
    /// * `base_path` - The owner's resolved base path
    pub fn extract(
        &self,
        owner: &TypeDescriptor,
        handler: &MethodDescriptor,
        verb: HttpMethod,
        base_path: &str,
    ) -> EndpointRecord {
        // Method-level route, if any, extends the owner's base path
        let uri = join_uri(base_path, handler.markers.route());
        let parameters = parameters::classify(&handler.parameters, &self.context_types);
        // Documentation and response catalog come from the handler only
        let operation = handler.markers.operation().cloned().unwrap_or_default();
        let (success_responses, failure_responses) =
            metadata::partition_responses(handler.markers.responses().unwrap_or_default());

        let record = EndpointRecord {
            uri,
            verb,
            owner_type: owner.name.clone(),
            handler_name: handler.name.clone(),
            return_type: handler.return_type.clone(),
            path_parameters: parameters.path,
            query_parameters: parameters.query,
            payload_parameters: parameters.payload,
            consumes: metadata::consumes(owner, handler),
            produces: metadata::produces(owner, handler),
            summary: operation.summary,
            notes: operation.notes,
            tags: operation.tags,
            success_responses,
            failure_responses,
            markers: metadata::marker_names(owner, handler),
        };

        debug!("{}", record);
        record
    }

    /// The verb a handler is declared with, if any.
    ///
    /// Verb markers are meant to be exclusive. If a handler carries several, the first
    /// in [`VERB_PRECEDENCE`] is used.
    pub fn handler_verb(&self, owner: &TypeDescriptor, handler: &MethodDescriptor) -> Option<HttpMethod> {
        let mut verbs = VERB_PRECEDENCE
            .iter()
            .copied()
            .filter(|verb| handler.markers.has_verb(*verb));

        let verb = verbs.next()?;
        let others: Vec<HttpMethod> = verbs.collect();
        if !others.is_empty() {
            warn!(
                "{}::{} carries several verb markers; using {} and ignoring {:?}",
                owner.name, handler.name, verb, others
            );
        }
        Some(verb)
    }

    /// Extracts every endpoint from `types`.
    ///
    /// Types without a route marker and methods without a verb marker are skipped.
    /// Records follow type order, then method declaration order.
    pub fn extract_all(&self, types: &[TypeDescriptor]) -> Vec<EndpointRecord> {
        let mut records = Vec::new();

        for owner in types {
            // Only route-marked types are resources
            if owner.markers.route().is_none() {
                continue;
            }

            let base_path = self.resolve_base_path(owner);
            debug!("Resource {} at {}", owner.name, base_path);

            for handler in &owner.methods {
                if let Some(verb) = self.handler_verb(owner, handler) {
                    records.push(self.extract(owner, handler, verb, &base_path));
                }
            }
        }

        records
    }
}

/// Runs discovery for `namespace` and extracts every endpoint found.
///
/// # Arguments
///
/// * `discovery` - Where the candidate types come from
/// * `namespace` - Module path to search under; empty for everything
/// * `extractor` - Configured extractor
///
/// # Errors
///
/// Returns the discovery error unchanged; extraction itself cannot fail.
pub fn find_endpoints(
    discovery: &dyn TypeDiscovery,
    namespace: &str,
    extractor: &EndpointExtractor,
) -> Result<Vec<EndpointRecord>> {
    let types = discovery.discover(namespace)?;
    let records = extractor.extract_all(&types);
    info!("Extracted {} endpoints from {} types", records.len(), types.len());
    Ok(records)
}

/// Appends a handler's own path to its base path. `base_path` already ends with
/// `/`, so a leading `/` on the handler path is dropped; repeated segments are kept.
fn join_uri(base_path: &str, handler_path: Option<&str>) -> String {
    let mut uri = match handler_path {
        Some(path) if base_path.ends_with('/') => {
            format!("{}{}", base_path, path.strip_prefix('/').unwrap_or(path))
        }
        Some(path) => format!("{}{}", base_path, path),
        None => base_path.to_string(),
    };

    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri
}
