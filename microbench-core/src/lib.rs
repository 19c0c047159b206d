#![warn(missing_docs)]
//! Microbench Core - Registry and Measurement Engine
//!
//! This crate provides everything below the command line:
//! - `BenchmarkDef` / `HookDef` registration records, collected with `inventory`
//! - `Registry`: discovery of registered candidates and hooks
//! - `Measurement`: runs one candidate through warm-up, measured and tear-down
//!   iterations and keeps fastest/slowest/average timings
//! - `OutputSilencer`: keeps benchmarked code from writing to stdout/stderr
//! - Identifier formatting helpers for report labels

mod bencher;
mod config;
mod discovery;
mod error;
mod instance;
mod measure;
mod silence;
pub mod text;

pub use bencher::{Bencher, Statistics};
pub use config::{BenchmarkConfig, DEFAULT_ITERATIONS, HookRef, IterationPlan, Phase};
pub use discovery::{HookTable, Registry};
pub use error::{BenchError, ConfigError, Culprit, HookError};
pub use instance::Measurement;
pub use measure::Timer;
pub use silence::OutputSilencer;

use std::fmt;

/// How a registered function receives `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// No receiver: a free function or an associated function
    None,
    /// `&self`
    Ref,
    /// `&mut self`
    RefMut,
    /// `self`
    Value,
}

impl Receiver {
    fn as_param(self) -> Option<&'static str> {
        match self {
            Receiver::None => None,
            Receiver::Ref => Some("&self"),
            Receiver::RefMut => Some("&mut self"),
            Receiver::Value => Some("self"),
        }
    }
}

/// Declared signature of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Receiver kind
    pub receiver: Receiver,
    /// Parameter types as written, excluding the receiver
    pub params: &'static [&'static str],
}

impl Shape {
    /// A function without receiver and without parameters.
    pub const STATIC: Shape = Shape {
        receiver: Receiver::None,
        params: &[],
    };

    /// Whether the function can be called as `fn()`.
    pub fn is_static_nullary(&self) -> bool {
        self.receiver == Receiver::None && self.params.is_empty()
    }
}

/// Identity of a registered function: `module::path::[Owner::]name(params)`.
///
/// Results are ordered by the string form of this identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct CallableId(String);

impl CallableId {
    /// Build the identity of `name`, declared in `module_path` (and in the `impl`
    /// block of `owner`, if any).
    pub fn new(module_path: &str, owner: Option<&str>, name: &str, shape: &Shape) -> Self {
        let params: Vec<&str> = shape
            .receiver
            .as_param()
            .into_iter()
            .chain(shape.params.iter().copied())
            .collect();

        let mut id = String::from(module_path);
        if let Some(owner) = owner {
            id.push_str("::");
            id.push_str(owner);
        }
        id.push_str("::");
        id.push_str(name);
        id.push('(');
        id.push_str(&params.join(", "));
        id.push(')');
        Self(id)
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Benchmark candidate registered via `#[microbench::bench]` or [`Registry::register`].
///
/// Every marked function is registered whatever its signature, so that a
/// function that cannot be benchmarked is reported by name instead of being
/// silently skipped.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkDef {
    /// Function name
    pub name: &'static str,
    /// Module the function is declared in
    pub module_path: &'static str,
    /// Type of the `impl` block, for associated functions and methods
    pub owner: Option<&'static str>,
    /// Declared signature
    pub shape: Shape,
    /// Callable wrapper; present only when `shape` is static and nullary
    pub entry: Option<fn()>,
    /// Iteration counts, hooks and comment
    pub config: BenchmarkConfig,
    /// Source file path
    pub file: &'static str,
    /// Source line number
    pub line: u32,
}

impl BenchmarkDef {
    /// Candidate for a static function without parameters.
    pub const fn function(module_path: &'static str, name: &'static str, entry: fn()) -> Self {
        Self {
            name,
            module_path,
            owner: None,
            shape: Shape::STATIC,
            entry: Some(entry),
            config: BenchmarkConfig::new(),
            file: "",
            line: 0,
        }
    }

    /// Candidate whose signature cannot be called as `fn()`.
    pub const fn declared(module_path: &'static str, name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            module_path,
            owner: None,
            shape,
            entry: None,
            config: BenchmarkConfig::new(),
            file: "",
            line: 0,
        }
    }

    /// Declare the `impl` block type owning this function.
    pub const fn owner(mut self, owner: &'static str) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Attach a configuration.
    pub const fn config(mut self, config: BenchmarkConfig) -> Self {
        self.config = config;
        self
    }

    /// Record the source location.
    pub const fn location(mut self, file: &'static str, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    /// Identity of this candidate.
    pub fn id(&self) -> CallableId {
        CallableId::new(self.module_path, self.owner, self.name, &self.shape)
    }

    /// Path under which this function can be referenced as a hook.
    pub fn qualified_name(&self) -> String {
        match self.owner {
            Some(owner) => format!("{}::{}::{}", self.module_path, owner, self.name),
            None => format!("{}::{}", self.module_path, self.name),
        }
    }

    /// The wrapper to invoke, or the reason this candidate cannot be invoked.
    ///
    /// The receiver is checked before the parameters.
    pub fn entry_point(&self) -> Result<fn(), ConfigError> {
        if self.shape.receiver != Receiver::None {
            return Err(ConfigError::NotStatic {
                callable: self.id(),
            });
        }
        if !self.shape.params.is_empty() {
            return Err(ConfigError::HasParameters {
                callable: self.id(),
                count: self.shape.params.len(),
            });
        }
        self.entry
            .ok_or_else(|| ConfigError::MissingEntry { callable: self.id() })
    }
}

/// Function usable as a before/after-each hook, registered via `#[microbench::hook]`.
#[derive(Debug, Clone, Copy)]
pub struct HookDef {
    /// Function name
    pub name: &'static str,
    /// Module path, followed by the `impl` type for associated functions
    pub module_path: &'static str,
    /// The hook itself
    pub func: fn(),
}

impl HookDef {
    /// Fully qualified reference: `module_path::name`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.name)
    }
}

// Collect all registered candidates and hooks
inventory::collect!(BenchmarkDef);
inventory::collect!(HookDef);

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<BenchmarkDef> {}
    for _ in inventory::iter::<HookDef> {}
};

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    #[test]
    fn test_identity_format() {
        let free = BenchmarkDef::function("demo::math", "sum", noop);
        assert_eq!(free.id().as_str(), "demo::math::sum()");

        let method = BenchmarkDef::declared(
            "demo",
            "bump",
            Shape {
                receiver: Receiver::RefMut,
                params: &["u32", "&str"],
            },
        )
        .owner("Counter");
        assert_eq!(method.id().to_string(), "demo::Counter::bump(&mut self, u32, &str)");
        assert_eq!(method.qualified_name(), "demo::Counter::bump");
    }

    #[test]
    fn test_entry_point_checks_receiver_first() {
        let def = BenchmarkDef::declared(
            "demo",
            "both",
            Shape {
                receiver: Receiver::Ref,
                params: &["String"],
            },
        );
        assert!(matches!(def.entry_point(), Err(ConfigError::NotStatic { .. })));
    }

    #[test]
    fn test_entry_point_rejects_parameters() {
        let def = BenchmarkDef::declared(
            "demo",
            "with_param",
            Shape {
                receiver: Receiver::None,
                params: &["String"],
            },
        );
        match def.entry_point() {
            Err(ConfigError::HasParameters { callable, count }) => {
                assert_eq!(count, 1);
                assert_eq!(callable.as_str(), "demo::with_param(String)");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_entry_point_static() {
        let def = BenchmarkDef::function("demo", "ok", noop);
        assert!(def.entry_point().is_ok());

        let missing = BenchmarkDef::declared("demo", "ghost", Shape::STATIC);
        assert!(matches!(
            missing.entry_point(),
            Err(ConfigError::MissingEntry { .. })
        ));
    }

    #[test]
    fn test_identity_ordering_is_lexicographic() {
        let a = BenchmarkDef::function("demo", "alpha", noop).id();
        let b = BenchmarkDef::function("demo", "beta", noop).id();
        assert!(a < b);
    }
}
