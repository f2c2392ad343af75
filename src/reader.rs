//! Marker reader: turns `syn` attributes into typed [`Marker`]s.
//!
//! Recognition is by the last segment of the attribute path, so `#[route("/x")]` and
//! `#[catalog::route("/x")]` are both route markers. The written path is kept as the
//! marker name.

use crate::extractor::HttpMethod;
use crate::marker::{ApiOperation, ApiResponse, Marker, MarkerKind, MarkerSet};
use log::warn;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, GenericArgument, Lit, LitInt, LitStr, PathArguments, ReturnType, Token, Type};

/// Compiler and tooling attributes that carry no endpoint metadata.
const NON_MARKER_ATTRIBUTES: &[&str] = &[
    "doc", "derive", "allow", "warn", "deny", "forbid", "cfg", "cfg_attr", "inline", "must_use",
];

/// Reads the markers declared by a list of attributes.
pub struct MarkerReader;

impl MarkerReader {
    /// Reads every marker in `attrs`, in declaration order.
    pub fn read(attrs: &[Attribute]) -> MarkerSet {
        attrs.iter().filter_map(Self::read_attribute).collect()
    }

    /// Reads one attribute. Returns `None` for compiler attributes.
    ///
    /// A known marker with a malformed payload is kept as [`MarkerKind::Other`] so
    /// that it still shows up by name but contributes no data.
    pub fn read_attribute(attr: &Attribute) -> Option<Marker> {
        let segments: Vec<String> = attr
            .path()
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        let last = segments.last()?.clone();
        let name = segments.join("::");

        if segments.len() == 1 && NON_MARKER_ATTRIBUTES.contains(&last.as_str()) {
            return None;
        }

        let kind = match Self::parse_kind(&last, attr) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Ignoring payload of malformed marker #[{}]: {}", name, e);
                MarkerKind::Other
            }
        };

        Some(Marker::new(name, kind))
    }

    fn parse_kind(last: &str, attr: &Attribute) -> syn::Result<MarkerKind> {
        if let Some(method) = HttpMethod::from_attribute(last) {
            return Ok(MarkerKind::Verb(method));
        }

        let kind = match last {
            "route" => MarkerKind::Route(attr.parse_args::<LitStr>()?.value()),
            "consumes" => MarkerKind::Consumes(Self::parse_string_list(attr)?),
            "produces" => MarkerKind::Produces(Self::parse_string_list(attr)?),
            "path_param" => MarkerKind::PathParam(attr.parse_args::<LitStr>()?.value()),
            "query_param" => MarkerKind::QueryParam(attr.parse_args::<LitStr>()?.value()),
            "default_value" => MarkerKind::DefaultValue(attr.parse_args::<LitStr>()?.value()),
            "form_param" => MarkerKind::FormParam(attr.parse_args::<LitStr>()?.value()),
            "pattern" => MarkerKind::Pattern(Self::parse_pattern(attr)?),
            "api_operation" => MarkerKind::ApiOperation(Self::parse_operation(attr)?),
            "api_responses" => MarkerKind::ApiResponses(Self::parse_responses(attr)?),
            "extends" => MarkerKind::Extends(Self::parse_parent(attr)?),
            _ => MarkerKind::Other,
        };

        Ok(kind)
    }

    fn parse_string_list(attr: &Attribute) -> syn::Result<Vec<String>> {
        let list = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
        Ok(list.iter().map(LitStr::value).collect())
    }

    /// `#[pattern("...")]` or `#[pattern(regexp = "...")]`
    fn parse_pattern(attr: &Attribute) -> syn::Result<String> {
        if let Ok(lit) = attr.parse_args::<LitStr>() {
            return Ok(lit.value());
        }

        let mut regexp = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("regexp") {
                regexp = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;

        regexp.ok_or_else(|| syn::Error::new_spanned(attr, "expected a `regexp` value"))
    }

    fn parse_operation(attr: &Attribute) -> syn::Result<ApiOperation> {
        let mut operation = ApiOperation::default();

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("summary") || meta.path.is_ident("value") {
                operation.summary = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("notes") {
                operation.notes = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("tags") {
                let value = meta.value()?;
                if value.peek(syn::token::Bracket) {
                    let array: syn::ExprArray = value.parse()?;
                    for elem in &array.elems {
                        operation.tags.push(string_literal(elem)?);
                    }
                } else {
                    operation.tags.push(value.parse::<LitStr>()?.value());
                }
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;

        Ok(operation)
    }

    fn parse_responses(attr: &Attribute) -> syn::Result<Vec<ApiResponse>> {
        let mut responses = Vec::new();

        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("response") {
                return skip_meta(&meta);
            }

            let mut code = None;
            let mut response = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("code") {
                    code = Some(inner.value()?.parse::<LitInt>()?.base10_parse::<u16>()?);
                } else if inner.path.is_ident("response") {
                    let value = inner.value()?;
                    response = Some(if value.peek(LitStr) {
                        value.parse::<LitStr>()?.value()
                    } else {
                        describe_type(&value.parse::<Type>()?)
                    });
                } else {
                    skip_meta(&inner)?;
                }
                Ok(())
            })?;

            match (code, response) {
                (Some(code), Some(response)) => {
                    responses.push(ApiResponse::new(code, response));
                    Ok(())
                }
                _ => Err(meta.error("response entries need both `code` and `response`")),
            }
        })?;

        Ok(responses)
    }

    /// `#[extends(path::To::Parent)]` or `#[extends("Parent")]`
    fn parse_parent(attr: &Attribute) -> syn::Result<String> {
        if let Ok(lit) = attr.parse_args::<LitStr>() {
            return Ok(lit.value());
        }
        let path = attr.parse_args::<syn::Path>()?;
        Ok(describe_path(&path))
    }
}

/// Consumes a key we do not interpret, whatever shape its value has.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
        Ok(())
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))
    } else {
        Ok(())
    }
}

fn string_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// Renders a type as readable text, e.g. `Option<Vec<Widget>>` or `&HttpRequest`.
pub fn describe_type(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => describe_path(&type_path.path),
        Type::Reference(reference) => {
            let mutability = if reference.mutability.is_some() { "mut " } else { "" };
            format!("&{}{}", mutability, describe_type(&reference.elem))
        }
        Type::Slice(slice) => format!("[{}]", describe_type(&slice.elem)),
        Type::Array(array) => format!("[{}; {}]", describe_type(&array.elem), describe_expr(&array.len)),
        Type::Tuple(tuple) => {
            let elems: Vec<String> = tuple.elems.iter().map(describe_type).collect();
            format!("({})", elems.join(", "))
        }
        Type::Paren(paren) => describe_type(&paren.elem),
        Type::Group(group) => describe_type(&group.elem),
        Type::ImplTrait(impl_trait) => format!("impl {}", describe_bounds(&impl_trait.bounds)),
        Type::TraitObject(object) => format!("dyn {}", describe_bounds(&object.bounds)),
        Type::Never(_) => "!".to_string(),
        Type::Infer(_) => "_".to_string(),
        Type::Ptr(ptr) => {
            let qualifier = if ptr.mutability.is_some() { "mut" } else { "const" };
            format!("*{} {}", qualifier, describe_type(&ptr.elem))
        }
        Type::BareFn(bare_fn) => {
            let inputs: Vec<String> = bare_fn.inputs.iter().map(|arg| describe_type(&arg.ty)).collect();
            let unsafety = if bare_fn.unsafety.is_some() { "unsafe " } else { "" };
            format!("{}fn({}){}", unsafety, inputs.join(", "), describe_arrow(&bare_fn.output))
        }
        _ => "unknown".to_string(),
    }
}

fn describe_bounds(bounds: &Punctuated<syn::TypeParamBound, Token![+]>) -> String {
    let parts: Vec<String> = bounds
        .iter()
        .filter_map(|bound| match bound {
            syn::TypeParamBound::Trait(t) => Some(describe_path(&t.path)),
            syn::TypeParamBound::Lifetime(lt) => Some(format!("'{}", lt.ident)),
            _ => None,
        })
        .collect();
    parts.join(" + ")
}

fn describe_path(path: &syn::Path) -> String {
    let segments: Vec<String> = path
        .segments
        .iter()
        .map(|segment| {
            let ident = segment.ident.to_string();
            match &segment.arguments {
                PathArguments::None => ident,
                PathArguments::AngleBracketed(args) => {
                    let args: Vec<String> = args.args.iter().map(describe_generic_argument).collect();
                    format!("{}<{}>", ident, args.join(", "))
                }
                // Fn(A, B) -> R
                PathArguments::Parenthesized(args) => {
                    let inputs: Vec<String> = args.inputs.iter().map(describe_type).collect();
                    format!("{}({}){}", ident, inputs.join(", "), describe_arrow(&args.output))
                }
            }
        })
        .collect();

    let joined = segments.join("::");
    if path.leading_colon.is_some() {
        format!("::{}", joined)
    } else {
        joined
    }
}

fn describe_generic_argument(arg: &GenericArgument) -> String {
    match arg {
        GenericArgument::Type(ty) => describe_type(ty),
        GenericArgument::Lifetime(lt) => format!("'{}", lt.ident),
        GenericArgument::Const(expr) => describe_expr(expr),
        GenericArgument::AssocType(assoc) => format!("{} = {}", assoc.ident, describe_type(&assoc.ty)),
        GenericArgument::AssocConst(assoc) => format!("{} = {}", assoc.ident, describe_expr(&assoc.value)),
        GenericArgument::Constraint(constraint) => {
            format!("{}: {}", constraint.ident, describe_bounds(&constraint.bounds))
        }
        _ => "_".to_string(),
    }
}

/// Const generic values are usually literals or paths; anything else is elided.
fn describe_expr(expr: &Expr) -> String {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Int(n) => n.base10_digits().to_string(),
            Lit::Bool(b) => b.value.to_string(),
            Lit::Str(s) => format!("{:?}", s.value()),
            Lit::Char(c) => format!("{:?}", c.value()),
            _ => "_".to_string(),
        },
        Expr::Path(expr_path) => describe_path(&expr_path.path),
        Expr::Block(block) => match block.block.stmts.as_slice() {
            [syn::Stmt::Expr(inner, None)] => format!("{{ {} }}", describe_expr(inner)),
            _ => "{ .. }".to_string(),
        },
        _ => "_".to_string(),
    }
}

/// ` -> R`, or nothing for the unit return
fn describe_arrow(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => String::new(),
        ReturnType::Type(_, ty) => format!(" -> {}", describe_type(ty)),
    }
}

/// The bare name of a type: references stripped, last path segment, no generics.
pub fn base_type(ty: &Type) -> String {
    match ty {
        Type::Reference(reference) => base_type(&reference.elem),
        Type::Paren(paren) => base_type(&paren.elem),
        Type::Group(group) => base_type(&group.elem),
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default(),
        other => describe_type(other),
    }
}

/// Describes a function's declared result; `()` when nothing is written.
pub fn describe_return(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => describe_type(ty),
    }
}
