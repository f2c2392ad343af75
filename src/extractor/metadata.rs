use crate::discovery::{MethodDescriptor, TypeDescriptor};
use crate::marker::{ApiResponse, Marker};
use std::collections::HashSet;

/// Status code of a successful response.
const SUCCESS_CODE: u16 = 200;

/// Accepted content types: the handler's own marker, else the owner's. Never merged.
pub(crate) fn consumes(owner: &TypeDescriptor, handler: &MethodDescriptor) -> Vec<String> {
    handler
        .markers
        .consumes()
        .or_else(|| owner.markers.consumes())
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// Produced content types, resolved the same way as [`consumes`].
pub(crate) fn produces(owner: &TypeDescriptor, handler: &MethodDescriptor) -> Vec<String> {
    handler
        .markers
        .produces()
        .or_else(|| owner.markers.produces())
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// Splits declared responses into success (status 200, in order) and failure
/// (everything else, first occurrence of each response type).
pub(crate) fn partition_responses(responses: &[ApiResponse]) -> (Vec<String>, Vec<String>) {
    let mut success = Vec::new();
    let mut failure: Vec<String> = Vec::new();

    for response in responses {
        if response.code == SUCCESS_CODE {
            success.push(response.response.clone());
        } else if !failure.contains(&response.response) {
            failure.push(response.response.clone());
        }
    }

    (success, failure)
}

/// Marker names on the owner, then its ancestors, then the handler; first occurrence
/// wins. Route and verb markers are dropped.
pub(crate) fn marker_names(owner: &TypeDescriptor, handler: &MethodDescriptor) -> Vec<String> {
    let all: Vec<&Marker> = owner
        .lineage()
        .flat_map(|set| set.iter())
        .chain(handler.markers.iter())
        .collect();

    let structural: HashSet<&str> = all
        .iter()
        .filter(|m| m.is_structural())
        .map(|m| m.name.as_str())
        .collect();

    let mut seen = HashSet::new();
    all.iter()
        .map(|m| m.name.as_str())
        .filter(|name| !structural.contains(name))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
