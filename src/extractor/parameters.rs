use crate::discovery::ParameterDescriptor;
use crate::extractor::{BindingKind, ParameterInfo};
use crate::marker::MarkerKind;

/// Handler parameters partitioned by binding kind, each in declaration order.
#[derive(Debug, Default)]
pub(crate) struct ClassifiedParameters {
    pub path: Vec<ParameterInfo>,
    pub query: Vec<ParameterInfo>,
    pub payload: Vec<ParameterInfo>,
}

/// Classifies every parameter that is not a context object.
pub(crate) fn classify(parameters: &[ParameterDescriptor], context_types: &[String]) -> ClassifiedParameters {
    let mut classified = ClassifiedParameters::default();

    for parameter in parameters {
        if context_types.iter().any(|t| *t == parameter.base_type) {
            continue;
        }

        let info = classify_one(parameter);
        match info.binding_kind {
            BindingKind::Path => classified.path.push(info),
            BindingKind::Query => classified.query.push(info),
            BindingKind::Payload => classified.payload.push(info),
        }
    }

    classified
}

/// Applies every marker on the parameter in order; a later marker overwrites what an
/// earlier one set.
fn classify_one(parameter: &ParameterDescriptor) -> ParameterInfo {
    let mut info = ParameterInfo::new(parameter.type_name.clone());

    for marker in &parameter.markers {
        match &marker.kind {
            MarkerKind::PathParam(name) => {
                info.binding_kind = BindingKind::Path;
                info.name = Some(name.clone());
            }
            MarkerKind::QueryParam(name) => {
                info.binding_kind = BindingKind::Query;
                info.name = Some(name.clone());
            }
            MarkerKind::DefaultValue(value) => info.default_value = Some(value.clone()),
            MarkerKind::FormParam(name) => info.name = Some(name.clone()),
            MarkerKind::Pattern(regexp) => info.pattern = Some(regexp.clone()),
            _ => {}
        }
    }

    info
}
