//! Functions callable from formulas

pub mod aggregate;

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{EvaluationContext, FormulaValue};
use ahash::AHashMap;
use lazy_regex::regex_is_match;
use std::sync::OnceLock;

/// Shared registry of built-in functions (lazily initialized)
static BUILTIN_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Function implementation signature
///
/// Arguments arrive evaluated: ranges as [`FormulaValue::Array`], missing arguments as
/// [`FormulaValue::Empty`]. Functions can consult the evaluation context to read
/// further cells.
pub type FunctionImpl = fn(&[FormulaValue], &EvaluationContext) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Check whether a call with `count` arguments is allowed
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    /// Human-readable argument count, for error messages
    pub fn arity(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }
}

/// Function registry
///
/// Lookups are case-insensitive; [`FunctionRegistry::names`] lists functions in
/// registration order.
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
    order: Vec<&'static str>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_aggregate_functions();
        registry
    }

    /// Create a registry with no functions at all
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// The shared registry of built-in functions
    pub fn builtin() -> &'static FunctionRegistry {
        BUILTIN_REGISTRY.get_or_init(FunctionRegistry::new)
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Check whether a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered function names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether no functions are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register a function
    ///
    /// Names must be letters only, and each name may be registered once (ignoring
    /// case).
    pub fn register(&mut self, def: FunctionDef) -> FormulaResult<()> {
        if !regex_is_match!(r"^[A-Za-z]+$", def.name) {
            return Err(FormulaError::Registry(format!(
                "function name {:?} must be one or more letters",
                def.name
            )));
        }
        if let Some(max) = def.max_args {
            if max < def.min_args {
                return Err(FormulaError::Registry(format!(
                    "{} accepts at most {} arguments but requires {}",
                    def.name, max, def.min_args
                )));
            }
        }

        let key = def.name.to_uppercase();
        if self.functions.contains_key(&key) {
            return Err(FormulaError::Registry(format!(
                "function {} is already registered",
                key
            )));
        }

        self.order.push(def.name);
        self.functions.insert(key, def);
        Ok(())
    }

    fn register_aggregate_functions(&mut self) {
        let builtins = [
            // SUM
            FunctionDef {
                name: "SUM",
                min_args: 0,
                max_args: None,
                implementation: aggregate::fn_sum,
            },
            // COUNT
            FunctionDef {
                name: "COUNT",
                min_args: 0,
                max_args: None,
                implementation: aggregate::fn_count,
            },
            // AVERAGE
            FunctionDef {
                name: "AVERAGE",
                min_args: 0,
                max_args: None,
                implementation: aggregate::fn_average,
            },
        ];

        for def in builtins {
            // Names are distinct literals that pass validation
            let _ = self.register(def);
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
