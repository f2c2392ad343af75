use crate::discovery::{
    AncestorDescriptor, MethodDescriptor, ParameterDescriptor, TypeDescriptor, TypeDiscovery,
};
use crate::error::{Error, Result};
use crate::marker::MarkerSet;
use crate::parser::{AstParser, ParsedFile};
use crate::reader::{base_type, describe_return, describe_type, MarkerReader};
use crate::scanner::FileScanner;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use syn::visit::Visit;

/// Discovers resource types by reading a Rust source tree.
///
/// Modules map onto the tree the way `rustc` lays them out: `server/api/widgets.rs`
/// and `server/api/widgets/mod.rs` are both `server::api::widgets`, and `lib.rs` or
/// `main.rs` at the root is the crate root. Inline `mod` blocks extend the path.
///
/// Ancestors named by `#[extends(..)]` are resolved over the whole tree, not only the
/// requested namespace.
pub struct SourceDiscovery {
    source_root: PathBuf,
}

impl SourceDiscovery {
    /// Creates a discovery over `root`. A package directory (one holding
    /// `Cargo.toml` and `src/`) is read from its `src/` directory.
    pub fn new(root: PathBuf) -> Self {
        let source_root = if root.join("Cargo.toml").is_file() && root.join("src").is_dir() {
            root.join("src")
        } else {
            root
        };
        Self { source_root }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    fn collect(&self, parsed_files: &[ParsedFile]) -> TypeCollector {
        let mut collector = TypeCollector::default();

        for parsed_file in parsed_files {
            let module = module_path_of(&self.source_root, &parsed_file.path);
            debug!(
                "Collecting types from {} (module `{}`)",
                parsed_file.path.display(),
                module.join("::")
            );
            collector.enter_file(module);
            collector.visit_file(&parsed_file.syntax_tree);
        }

        collector.attach_methods();
        collector
    }
}

impl TypeDiscovery for SourceDiscovery {
    fn discover(&self, namespace: &str) -> Result<Vec<TypeDescriptor>> {
        info!(
            "Discovering types under `{}` in {}",
            namespace,
            self.source_root.display()
        );

        let files = FileScanner::new(self.source_root.clone()).scan()?;
        let parsed_files = AstParser::parse_files(&files)?;
        let collector = self.collect(&parsed_files);

        let namespace_path = split_namespace(namespace);
        if !namespace_path.is_empty()
            && !collector
                .modules
                .iter()
                .any(|m| m.starts_with(namespace_path.as_slice()))
        {
            return Err(Error::discovery(namespace, "namespace matches no module"));
        }

        let descriptors: Vec<TypeDescriptor> = collector
            .types
            .iter()
            .enumerate()
            .filter(|(_, ty)| ty.module.starts_with(namespace_path.as_slice()))
            .map(|(idx, ty)| TypeDescriptor {
                name: ty.qualified_name(),
                markers: ty.markers.clone(),
                ancestors: collector.ancestors_of(idx),
                methods: ty.methods.clone(),
            })
            .collect();

        info!("Discovered {} types under `{}`", descriptors.len(), namespace);
        Ok(descriptors)
    }
}

/// `crate::server::api` and `server::api` both become `["server", "api"]`.
fn split_namespace(namespace: &str) -> Vec<String> {
    namespace
        .split("::")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .filter(|(i, s)| !(*i == 0 && *s == "crate"))
        .map(|(_, s)| s.to_string())
        .collect()
}

fn module_path_of(root: &Path, file: &Path) -> Vec<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    let file_name = components.pop().unwrap_or_default();
    let stem = file_name.strip_suffix(".rs").unwrap_or(&file_name).to_string();

    let is_crate_root = components.is_empty() && (stem == "lib" || stem == "main");
    if stem != "mod" && !is_crate_root {
        components.push(stem);
    }
    components
}

/// A struct or enum as found in source, before ancestor resolution.
struct DeclaredType {
    module: Vec<String>,
    ident: String,
    markers: MarkerSet,
    methods: Vec<MethodDescriptor>,
}

impl DeclaredType {
    fn qualified_name(&self) -> String {
        self.module
            .iter()
            .cloned()
            .chain(std::iter::once(self.ident.clone()))
            .collect::<Vec<_>>()
            .join("::")
    }
}

struct ImplBlock {
    module: Vec<String>,
    self_path: Vec<String>,
    methods: Vec<MethodDescriptor>,
}

/// Visitor collecting types, impl blocks and module paths from every file.
#[derive(Default)]
struct TypeCollector {
    module: Vec<String>,
    types: Vec<DeclaredType>,
    impls: Vec<ImplBlock>,
    modules: HashSet<Vec<String>>,
    by_name: HashMap<String, usize>,
}

impl TypeCollector {
    fn enter_file(&mut self, module: Vec<String>) {
        for depth in 0..=module.len() {
            self.modules.insert(module[..depth].to_vec());
        }
        self.module = module;
    }

    fn declare(&mut self, ident: String, attrs: &[syn::Attribute]) {
        let declared = DeclaredType {
            module: self.module.clone(),
            ident,
            markers: MarkerReader::read(attrs),
            methods: Vec::new(),
        };
        self.by_name.insert(declared.qualified_name(), self.types.len());
        self.types.push(declared);
    }

    /// Moves each impl block's methods onto the type it implements.
    fn attach_methods(&mut self) {
        for block in std::mem::take(&mut self.impls) {
            match self.resolve(&block.module, &block.self_path) {
                Some(idx) => self.types[idx].methods.extend(block.methods),
                None => debug!(
                    "No declared type for impl of `{}`",
                    block.self_path.join("::")
                ),
            }
        }
    }

    /// Resolves a path written inside `module` to a declared type.
    fn resolve(&self, module: &[String], path: &[String]) -> Option<usize> {
        let (first, rest) = path.split_first()?;

        let candidates: Vec<Vec<String>> = match first.as_str() {
            "crate" => vec![rest.to_vec()],
            "self" => vec![[module, rest].concat()],
            "super" => {
                let mut base = module.to_vec();
                base.pop();
                let mut rest = rest;
                while let Some(("super", tail)) = rest.split_first().map(|(h, t)| (h.as_str(), t)) {
                    base.pop();
                    rest = tail;
                }
                vec![[base.as_slice(), rest].concat()]
            }
            _ => vec![[module, path].concat(), path.to_vec()],
        };

        candidates
            .iter()
            .find_map(|candidate| self.by_name.get(&candidate.join("::")).copied())
    }

    /// Resolves the parent named by an `extends` marker: crate path, then a name in
    /// the same module, then a simple name that is unique across the tree.
    fn resolve_parent(&self, module: &[String], parent: &str) -> Option<usize> {
        let without_generics = parent.split('<').next().unwrap_or(parent);
        let path: Vec<String> = without_generics
            .split("::")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(idx) = self.resolve(module, &path) {
            return Some(idx);
        }

        let simple = path.last()?;
        let mut matches = self.types.iter().enumerate().filter(|(_, t)| &t.ident == simple);
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Some(idx),
            _ => None,
        }
    }

    fn ancestors_of(&self, idx: usize) -> Vec<AncestorDescriptor> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([idx]);
        let mut current = idx;

        while let Some(parent) = self.types[current].markers.parent() {
            let Some(parent_idx) = self.resolve_parent(&self.types[current].module, parent) else {
                debug!(
                    "Parent `{}` of {} is not declared in the source tree",
                    parent,
                    self.types[current].qualified_name()
                );
                break;
            };
            if !seen.insert(parent_idx) {
                warn!(
                    "Inheritance cycle through {}; stopping ancestor chain",
                    self.types[parent_idx].qualified_name()
                );
                break;
            }

            let parent_type = &self.types[parent_idx];
            chain.push(AncestorDescriptor::new(
                parent_type.qualified_name(),
                parent_type.markers.clone(),
            ));
            current = parent_idx;
        }

        chain
    }
}

fn method_descriptor(item: &syn::ImplItemFn) -> MethodDescriptor {
    let parameters = item
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            syn::FnArg::Typed(pat_type) => Some(ParameterDescriptor {
                type_name: describe_type(&pat_type.ty),
                base_type: base_type(&pat_type.ty),
                markers: MarkerReader::read(&pat_type.attrs),
            }),
            syn::FnArg::Receiver(_) => None,
        })
        .collect();

    MethodDescriptor {
        name: item.sig.ident.to_string(),
        return_type: describe_return(&item.sig.output),
        markers: MarkerReader::read(&item.attrs),
        parameters,
    }
}

impl<'ast> Visit<'ast> for TypeCollector {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.declare(node.ident.to_string(), &node.attrs);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.declare(node.ident.to_string(), &node.attrs);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let syn::Type::Path(type_path) = node.self_ty.as_ref() else {
            return;
        };
        let self_path: Vec<String> = type_path
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();

        let methods = node
            .items
            .iter()
            .filter_map(|item| match item {
                syn::ImplItem::Fn(item_fn) => Some(method_descriptor(item_fn)),
                _ => None,
            })
            .collect();

        self.impls.push(ImplBlock {
            module: self.module.clone(),
            self_path,
            methods,
        });
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        // `mod foo;` is picked up from its own file
        if node.content.is_none() {
            return;
        }

        self.module.push(node.ident.to_string());
        self.modules.insert(self.module.clone());
        syn::visit::visit_item_mod(self, node);
        self.module.pop();
    }

    // Items declared inside function bodies are not reachable types.
    fn visit_item_fn(&mut self, _node: &'ast syn::ItemFn) {}

    // Same for trait default bodies and `const _: () = { .. }` blocks
    fn visit_block(&mut self, _node: &'ast syn::Block) {}

    fn visit_expr(&mut self, _node: &'ast syn::Expr) {}
}
