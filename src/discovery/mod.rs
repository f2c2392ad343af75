//! Type discovery: finding the types declared under a namespace together with the
//! markers on them, their ancestors and their methods.
//!
//! The extractor never walks source code or type hierarchies itself. It consumes the
//! [`TypeDescriptor`]s produced here, where the ancestor chain has already been
//! resolved into an ordered list of marker sets.
//!
//! # Implementations
//!
//! - **Rust source trees**: See [`source::SourceDiscovery`]

pub mod source;

use crate::error::Result;
use crate::marker::{Marker, MarkerSet};
use crate::reader::base_type;

/// Trait for enumerating candidate types under a namespace.
pub trait TypeDiscovery {
    /// Returns every type declared in `namespace` or below it, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Discovery`] if the namespace cannot be resolved
    /// or any type fails to load.
    fn discover(&self, namespace: &str) -> Result<Vec<TypeDescriptor>>;
}

/// A discovered type with everything the extractor needs to know about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Module-qualified name (e.g. `server::api::WidgetResource`)
    pub name: String,
    /// Markers declared directly on the type
    pub markers: MarkerSet,
    /// Parent, grandparent, ... in that order
    pub ancestors: Vec<AncestorDescriptor>,
    /// Methods of every `impl` block for the type, in declaration order
    pub methods: Vec<MethodDescriptor>,
}

/// One link of a type's ancestor chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorDescriptor {
    pub name: String,
    pub markers: MarkerSet,
}

/// A method declared for a type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    /// Declared result type as text; `()` when none is written
    pub return_type: String,
    pub markers: MarkerSet,
    /// Declared parameters in order, without the `self` receiver
    pub parameters: Vec<ParameterDescriptor>,
}

/// A declared method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Type as written (e.g. `Option<String>`)
    pub type_name: String,
    /// Bare type name used to recognise context objects (e.g. `HttpRequest`)
    pub base_type: String,
    pub markers: MarkerSet,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_ancestor(mut self, ancestor: AncestorDescriptor) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// The type's own markers followed by each ancestor's, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &MarkerSet> {
        std::iter::once(&self.markers).chain(self.ancestors.iter().map(|a| &a.markers))
    }
}

impl AncestorDescriptor {
    pub fn new(name: impl Into<String>, markers: MarkerSet) -> Self {
        Self {
            name: name.into(),
            markers,
        }
    }
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            ..Self::default()
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }
}

impl ParameterDescriptor {
    /// Creates a parameter from its written type, deriving the bare type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let base_type = bare_type_name(&type_name);
        Self {
            type_name,
            base_type,
            markers: MarkerSet::new(),
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// `&mut web::HttpRequest` -> `HttpRequest`, `Json<Widget>` -> `Json`
///
/// Text that is not a valid type is kept as written.
fn bare_type_name(type_name: &str) -> String {
    match syn::parse_str::<syn::Type>(type_name) {
        Ok(ty) => base_type(&ty),
        Err(_) => type_name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerKind;

    #[test]
    fn test_bare_type_name() {
        assert_eq!(bare_type_name("String"), "String");
        assert_eq!(bare_type_name("&mut actix_web::HttpRequest"), "HttpRequest");
        assert_eq!(bare_type_name("web::Json<Widget>"), "Json");
        assert_eq!(bare_type_name("&'a HttpRequest"), "HttpRequest");
        assert_eq!(bare_type_name("&'static mut Request"), "Request");
        assert_eq!(bare_type_name("not a type <"), "not a type <");
    }

    #[test]
    fn test_lineage_order() {
        let ty = TypeDescriptor::new("WidgetResource")
            .with_marker(Marker::route("/widgets"))
            .with_ancestor(AncestorDescriptor::new(
                "BaseResource",
                MarkerSet::from(vec![Marker::other("secured")]),
            ))
            .with_ancestor(AncestorDescriptor::new(
                "RootResource",
                MarkerSet::from(vec![Marker::other("audited")]),
            ));

        let names: Vec<&str> = ty
            .lineage()
            .flat_map(|set| set.iter().map(|m| m.name.as_str()))
            .collect();

        assert_eq!(names, vec!["route", "secured", "audited"]);
    }

    #[test]
    fn test_parameter_builder() {
        let param = ParameterDescriptor::new("u32")
            .with_marker(Marker::of(MarkerKind::PathParam("id".to_string())));

        assert_eq!(param.base_type, "u32");
        assert_eq!(param.markers.len(), 1);
    }
}
