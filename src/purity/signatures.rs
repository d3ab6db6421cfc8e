//! Known purity facts about library functions
//!
//! Externally compiled functions have no body to inspect. The signature table
//! lets the resolver classify them by fully-qualified name instead: an exact
//! known-impure entry wins over an exact known-pure entry, and impure
//! namespace prefixes apply only to names with no exact entry.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Classification from the signature table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownPurity {
    Pure,
    Impure,
}

/// Base-library primitives safe to trust without a body
const DEFAULT_PURE: &[&str] = &[
    // Arithmetic
    "System.Math.Abs",
    "System.Math.Max",
    "System.Math.Min",
    "System.Math.Sqrt",
    "System.Math.Pow",
    "System.Math.Floor",
    "System.Math.Ceiling",
    "System.Math.Round",
    "System.Math.Clamp",
    "System.Math.Sign",
    // Strings
    "System.String.Concat",
    "System.String.Join",
    "System.String.Substring",
    "System.String.Contains",
    "System.String.StartsWith",
    "System.String.EndsWith",
    "System.String.IndexOf",
    "System.String.ToUpperInvariant",
    "System.String.ToLowerInvariant",
    "System.String.Trim",
    "System.String.Equals",
    "System.String.get_Length",
    "System.String.IsNullOrEmpty",
    "System.Object.Equals",
    "System.Object.GetHashCode",
    "System.Int32.Parse",
    "System.Int32.ToString",
    // Sequence queries
    "System.Linq.Enumerable.Select",
    "System.Linq.Enumerable.Where",
    "System.Linq.Enumerable.Any",
    "System.Linq.Enumerable.All",
    "System.Linq.Enumerable.Count",
    "System.Linq.Enumerable.First",
    "System.Linq.Enumerable.FirstOrDefault",
    "System.Linq.Enumerable.Sum",
    "System.Linq.Enumerable.Aggregate",
    "System.Linq.Enumerable.OrderBy",
    "System.Linq.Enumerable.Take",
    "System.Linq.Enumerable.Skip",
    "System.Collections.Immutable.ImmutableList.Create",
    "System.Collections.Immutable.ImmutableArray.Create",
];

/// Primitives that always have observable effects
const DEFAULT_IMPURE: &[&str] = &[
    "System.Console.WriteLine",
    "System.Console.Write",
    "System.Console.ReadLine",
    "System.Console.ReadKey",
    "System.Diagnostics.Debug.WriteLine",
    "System.Diagnostics.Trace.WriteLine",
    "System.Random.Next",
    "System.Random.NextDouble",
    "System.DateTime.get_Now",
    "System.DateTime.get_UtcNow",
    "System.Guid.NewGuid",
    "System.Environment.GetEnvironmentVariable",
    "System.Environment.Exit",
    "System.GC.Collect",
    "System.Object.MemberwiseClone",
];

/// Namespaces whose members are impure unless listed exactly
const DEFAULT_IMPURE_NAMESPACES: &[&str] = &[
    "System.IO.",
    "System.Net.",
    "System.Threading.",
    "System.Reflection.",
    "System.Runtime.InteropServices.",
];

static DEFAULT_SIGNATURES: Lazy<KnownSignatures> = Lazy::new(|| {
    let mut table = KnownSignatures::empty();
    table.extend_pure(DEFAULT_PURE.iter().copied());
    table.extend_impure(DEFAULT_IMPURE.iter().copied());
    table.extend_impure_namespaces(DEFAULT_IMPURE_NAMESPACES.iter().copied());
    table
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSignatures {
    pure: HashSet<String>,
    impure: HashSet<String>,
    impure_namespaces: Vec<String>,
}

impl KnownSignatures {
    /// Table with no entries at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table preloaded with the base-library defaults
    pub fn with_defaults() -> Self {
        DEFAULT_SIGNATURES.clone()
    }

    pub fn extend_pure<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pure.extend(names.into_iter().map(Into::into));
    }

    pub fn extend_impure<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.impure.extend(names.into_iter().map(Into::into));
    }

    pub fn extend_impure_namespaces<I, S>(&mut self, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let mut prefix = prefix.into();
            if !prefix.ends_with('.') {
                prefix.push('.');
            }
            if !self.impure_namespaces.contains(&prefix) {
                self.impure_namespaces.push(prefix);
            }
        }
    }

    pub fn classify(&self, qualified_name: &str) -> Option<KnownPurity> {
        if self.impure.contains(qualified_name) {
            return Some(KnownPurity::Impure);
        }
        if self.pure.contains(qualified_name) {
            return Some(KnownPurity::Pure);
        }
        self.impure_namespaces
            .iter()
            .any(|ns| qualified_name.starts_with(ns.as_str()))
            .then_some(KnownPurity::Impure)
    }

    pub fn len(&self) -> usize {
        self.pure.len() + self.impure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pure.is_empty() && self.impure.is_empty() && self.impure_namespaces.is_empty()
    }
}
