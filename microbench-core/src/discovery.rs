//! Candidate Discovery
//!
//! Benchmarks and hooks register themselves through `inventory` when their
//! attribute macros expand; [`Registry::collect`] gathers those records.
//! Candidates can also be registered by hand at process start.
//!
//! Discovery only enumerates: every marked function is returned whatever its
//! signature, and eligibility is checked when it is measured.

use crate::error::HookError;
use crate::{BenchmarkDef, CallableId, HookDef};
use std::collections::HashSet;

/// Registered benchmark candidates and hooks.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    benchmarks: Vec<BenchmarkDef>,
    hooks: Vec<HookDef>,
}

impl Registry {
    /// Empty registry, for manual registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding everything registered by the attribute macros.
    pub fn collect() -> Self {
        Self {
            benchmarks: inventory::iter::<BenchmarkDef>
                .into_iter()
                .copied()
                .collect(),
            hooks: inventory::iter::<HookDef>.into_iter().copied().collect(),
        }
    }

    /// Register a candidate.
    pub fn register(&mut self, def: BenchmarkDef) -> &mut Self {
        self.benchmarks.push(def);
        self
    }

    /// Register a hook.
    pub fn register_hook(&mut self, def: HookDef) -> &mut Self {
        self.hooks.push(def);
        self
    }

    /// Number of registered candidates, before any filtering.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether no candidate is registered.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Enumerate candidates declared under `root` (the module itself and every
    /// nested module), or all candidates when `root` is `None`.
    ///
    /// Records that do not name a usable function are dropped with a debug log,
    /// as are duplicates of an identity already seen and a crate-root `main`.
    /// The result is sorted by identity.
    pub fn scan(&self, root: Option<&str>) -> Vec<&BenchmarkDef> {
        let mut seen = HashSet::new();
        let mut found: Vec<(CallableId, &BenchmarkDef)> = Vec::new();

        for def in &self.benchmarks {
            if let Some(root) = root {
                if !is_under(def.module_path, root) {
                    continue;
                }
            }

            if let Some(reason) = unresolvable(def) {
                tracing::debug!(
                    name = def.name,
                    module = def.module_path,
                    file = def.file,
                    line = def.line,
                    "skipping registration: {reason}"
                );
                continue;
            }

            let id = def.id();
            if !seen.insert(id.clone()) {
                tracing::debug!(%id, "skipping duplicate registration");
                continue;
            }
            found.push((id, def));
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        found.into_iter().map(|(_, def)| def).collect()
    }

    /// Hook lookup table over this registry.
    pub fn hook_table(&self) -> HookTable {
        let mut table = HookTable::new();
        for hook in &self.hooks {
            table.insert(hook.module_path, hook.name, hook.func);
        }
        // Static nullary benchmarks double as hooks, like any other function would
        for def in &self.benchmarks {
            if let (true, Some(entry)) = (def.shape.is_static_nullary(), def.entry) {
                let module = match def.owner {
                    Some(owner) => format!("{}::{}", def.module_path, owner),
                    None => def.module_path.to_string(),
                };
                table.insert(module, def.name, entry);
            }
        }
        table
    }
}

fn is_under(module_path: &str, root: &str) -> bool {
    let root = root.trim_end_matches("::");
    module_path == root
        || module_path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn unresolvable(def: &BenchmarkDef) -> Option<&'static str> {
    if !is_identifier(def.name) {
        return Some("function name is not an identifier");
    }
    if def.module_path.is_empty() || !def.module_path.split("::").all(is_identifier) {
        return Some("malformed module path");
    }
    if def.owner.is_some_and(|owner| owner.trim().is_empty()) {
        return Some("empty owner type");
    }
    if def.name == "main" && def.owner.is_none() && !def.module_path.contains("::") {
        return Some("program entry point");
    }
    None
}

/// Resolves hook references by qualified name.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    entries: Vec<(String, &'static str, fn())>,
}

impl HookTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `module::name` to the table.
    pub fn insert(&mut self, module: impl Into<String>, name: &'static str, func: fn()) {
        self.entries.push((module.into(), name, func));
    }

    /// Resolve `module::path::name` (or `module.path.name`) to a function.
    pub fn resolve(&self, reference: &str) -> Result<fn(), HookError> {
        let normalized = reference.trim().replace('.', "::");
        let (module, name) = normalized
            .rsplit_once("::")
            .filter(|(module, name)| !module.is_empty() && !name.is_empty())
            .ok_or_else(|| HookError::Malformed {
                reference: reference.to_string(),
            })?;

        let mut in_module = self.entries.iter().filter(|(m, _, _)| m == module).peekable();
        if in_module.peek().is_none() {
            return Err(HookError::ModuleNotFound {
                reference: reference.to_string(),
                module: module.to_string(),
            });
        }

        in_module
            .find(|(_, n, _)| *n == name)
            .map(|(_, _, func)| *func)
            .ok_or_else(|| HookError::FunctionNotFound {
                reference: reference.to_string(),
                module: module.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Receiver, Shape};

    fn noop() {}

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(BenchmarkDef::function("app::parse", "tokens", noop))
            .register(BenchmarkDef::function("app::parse::json", "objects", noop))
            .register(BenchmarkDef::function("app::parser", "unrelated", noop))
            .register(BenchmarkDef::function("app", "alpha", noop))
            .register(BenchmarkDef::declared(
                "app::parse",
                "by_ref",
                Shape {
                    receiver: Receiver::Ref,
                    params: &[],
                },
            ));
        registry
    }

    #[test]
    fn test_scan_all_sorted() {
        let registry = registry();
        let ids: Vec<String> = registry
            .scan(None)
            .iter()
            .map(|d| d.id().to_string())
            .collect();

        assert_eq!(
            ids,
            [
                "app::alpha()",
                "app::parse::by_ref(&self)",
                "app::parse::json::objects()",
                "app::parse::tokens()",
                "app::parser::unrelated()",
            ]
        );
    }

    #[test]
    fn test_scan_root_includes_nested_modules_only() {
        let registry = registry();
        let names: Vec<&str> = registry
            .scan(Some("app::parse"))
            .iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, ["by_ref", "objects", "tokens"]);
    }

    #[test]
    fn test_scan_keeps_ineligible_shapes() {
        let registry = registry();
        let by_ref = registry
            .scan(None)
            .into_iter()
            .find(|d| d.name == "by_ref")
            .unwrap();
        assert!(by_ref.entry.is_none());
    }

    #[test]
    fn test_scan_drops_unresolvable_and_duplicates() {
        let mut registry = Registry::new();
        registry
            .register(BenchmarkDef::function("app", "main", noop))
            .register(BenchmarkDef::function("app::cli", "main", noop))
            .register(BenchmarkDef::function("app::", "broken", noop))
            .register(BenchmarkDef::function("app", "not an ident", noop))
            .register(BenchmarkDef::function("app", "twice", noop))
            .register(BenchmarkDef::function("app", "twice", noop));

        let ids: Vec<String> = registry
            .scan(None)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(ids, ["app::cli::main()", "app::twice()"]);
    }

    #[test]
    fn test_hook_resolution() {
        let mut registry = Registry::new();
        registry.register_hook(HookDef {
            name: "reset",
            module_path: "app::fixtures",
            func: noop,
        });
        let table = registry.hook_table();

        assert!(table.resolve("app::fixtures::reset").is_ok());
        assert!(table.resolve("app.fixtures.reset").is_ok());
        assert_eq!(
            table.resolve("app::missing::reset"),
            Err(HookError::ModuleNotFound {
                reference: "app::missing::reset".into(),
                module: "app::missing".into(),
            })
        );
        assert!(matches!(
            table.resolve("app::fixtures::nope"),
            Err(HookError::FunctionNotFound { .. })
        ));
        assert!(matches!(
            table.resolve("reset"),
            Err(HookError::Malformed { .. })
        ));
    }

    #[test]
    fn test_static_benchmarks_resolve_as_hooks() {
        let mut registry = Registry::new();
        registry.register(BenchmarkDef::function("app", "warm", noop).owner("Cache"));
        let table = registry.hook_table();
        assert!(table.resolve("app::Cache::warm").is_ok());
    }
}
