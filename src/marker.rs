//! Typed marker registry.
//!
//! A marker is a declarative attribute attached to a resource type, a handler method
//! or a handler parameter. The [`reader`](crate::reader) turns `syn` attributes into
//! [`Marker`]s once during discovery; the extractor only ever sees this typed form,
//! which keeps it testable with hand-built fixtures.

use crate::extractor::HttpMethod;

/// One marker as declared in source: its written name plus its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Attribute path as written (e.g. `route`, `get`, `auth::secured`)
    pub name: String,
    /// What the marker means and what it carries
    pub kind: MarkerKind,
}

/// The supported marker vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// `#[route("/widgets")]` on a type or method
    Route(String),
    /// `#[get]`, `#[post]`, `#[put]`, `#[delete]`
    Verb(HttpMethod),
    /// `#[consumes("application/json", ...)]`
    Consumes(Vec<String>),
    /// `#[produces("application/json", ...)]`
    Produces(Vec<String>),
    /// `#[path_param("id")]`
    PathParam(String),
    /// `#[query_param("page")]`
    QueryParam(String),
    /// `#[default_value("10")]`
    DefaultValue(String),
    /// `#[form_param("file")]`
    FormParam(String),
    /// `#[pattern("^[a-z]+$")]`
    Pattern(String),
    /// `#[api_operation(summary = "...", notes = "...", tags = [...])]`
    ApiOperation(ApiOperation),
    /// `#[api_responses(response(code = 200, response = "Widget"), ...)]`
    ApiResponses(Vec<ApiResponse>),
    /// `#[extends(BaseResource)]`
    Extends(String),
    /// Any other attribute; only its name is kept
    Other,
}

/// Documentation attached to a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOperation {
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// One entry of a response catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub code: u16,
    pub response: String,
}

impl ApiResponse {
    pub fn new(code: u16, response: impl Into<String>) -> Self {
        Self {
            code,
            response: response.into(),
        }
    }
}

impl Marker {
    pub fn new(name: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// A marker with the conventional attribute name for its kind.
    pub fn of(kind: MarkerKind) -> Self {
        let name = kind.attribute_name();
        Self::new(name, kind)
    }

    pub fn route(path: impl Into<String>) -> Self {
        Self::of(MarkerKind::Route(path.into()))
    }

    pub fn verb(method: HttpMethod) -> Self {
        Self::of(MarkerKind::Verb(method))
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(name, MarkerKind::Other)
    }

    /// Route and verb markers identify an endpoint and are already part of its
    /// structure, so they are never listed among its markers. A malformed `route`
    /// still counts by name.
    pub fn is_structural(&self) -> bool {
        match self.kind {
            MarkerKind::Route(_) | MarkerKind::Verb(_) => true,
            _ => {
                let last = self.name.rsplit("::").next().unwrap_or(&self.name);
                last == "route" || HttpMethod::from_attribute(last).is_some()
            }
        }
    }
}

impl MarkerKind {
    /// The attribute name this kind is written with, without any path prefix.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            MarkerKind::Route(_) => "route",
            MarkerKind::Verb(method) => method.attribute_name(),
            MarkerKind::Consumes(_) => "consumes",
            MarkerKind::Produces(_) => "produces",
            MarkerKind::PathParam(_) => "path_param",
            MarkerKind::QueryParam(_) => "query_param",
            MarkerKind::DefaultValue(_) => "default_value",
            MarkerKind::FormParam(_) => "form_param",
            MarkerKind::Pattern(_) => "pattern",
            MarkerKind::ApiOperation(_) => "api_operation",
            MarkerKind::ApiResponses(_) => "api_responses",
            MarkerKind::Extends(_) => "extends",
            MarkerKind::Other => "other",
        }
    }
}

/// The markers declared on one type, method or parameter, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Value of the first route marker.
    pub fn route(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::Route(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn has_verb(&self, method: HttpMethod) -> bool {
        self.markers
            .iter()
            .any(|m| matches!(&m.kind, MarkerKind::Verb(v) if *v == method))
    }

    pub fn consumes(&self) -> Option<&[String]> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::Consumes(types) => Some(types.as_slice()),
            _ => None,
        })
    }

    pub fn produces(&self) -> Option<&[String]> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::Produces(types) => Some(types.as_slice()),
            _ => None,
        })
    }

    pub fn operation(&self) -> Option<&ApiOperation> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::ApiOperation(op) => Some(op),
            _ => None,
        })
    }

    pub fn responses(&self) -> Option<&[ApiResponse]> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::ApiResponses(responses) => Some(responses.as_slice()),
            _ => None,
        })
    }

    /// Path of the parent type named by an `extends` marker.
    pub fn parent(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match &m.kind {
            MarkerKind::Extends(parent) => Some(parent.as_str()),
            _ => None,
        })
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self {
            markers: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Marker>> for MarkerSet {
    fn from(markers: Vec<Marker>) -> Self {
        Self { markers }
    }
}

impl<'a> IntoIterator for &'a MarkerSet {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
