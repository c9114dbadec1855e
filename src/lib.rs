//! Seme – a parser, factorization, table and relation engine for layered
//! symbolic scripts.
//!
//! Seme centers on the *script* concept: an expression over the six
//! primitives `E U A S B T`, closed under addition and triplet
//! multiplication across seven layers, where:
//! * A [`script::Primitive`] is one of the six layer‑0 symbols.
//! * A multiplicative script couples a substance, an attribute and a mode
//!   from one layer into a script of the next layer.
//! * An additive script gathers same‑layer scripts into a set; a script
//!   with more than one singular sequence is a *paradigm*.
//! * Every script renders to exactly one canonical string, and parsing
//!   that string yields the same script back.
//!
//! Scripts are immutable and shared through `Arc`, with layer, cardinal
//! and the canonical render memoized at construction so that comparison
//! and hashing stay cheap however deep the expression is.
//!
//! ## Modules
//! * [`script`] – The script algebra: construction, canonical ordering,
//!   rendering and singular sequence expansion.
//! * [`grammar`] – The pest grammar and the [`grammar::parse_script`]
//!   entry point (grammar details live in `script.pest`).
//! * [`factorize`] – Rewrites additions of multiplications into their
//!   most factored semantically equal form.
//! * [`table`] – Decomposes paradigms into 1, 2 and 3 dimensional tables
//!   with per‑axis headers.
//! * [`relation`] – The closed set of relation kinds together with the
//!   structural sibling matchers.
//! * [`dictionary`] – The immutable versioned snapshot tying everything
//!   together: roots, ranks, tables and the full relation index.
//!
//! ## Quick Start
//! ```
//! use seme::{Dictionary, TermEntry, RelationKind, parse_script};
//! let root = parse_script("O:M:.M:M:.-").unwrap();
//! let term = parse_script("U:M:.M:M:.-").unwrap();
//! let dictionary = Dictionary::build(
//!     "1.0.0",
//!     vec![TermEntry::new(root.clone()).root(), TermEntry::new(term.clone())],
//! )
//! .unwrap();
//! assert_eq!(dictionary.root_of(&term).unwrap(), &root);
//! assert_eq!(dictionary.rank_of(&term).unwrap(), 1);
//! assert_eq!(
//!     dictionary.relations(&term, RelationKind::Contains).unwrap(),
//!     vec![root]
//! );
//! ```

pub mod dictionary;
pub mod error;
pub mod factorize;
pub mod grammar;
pub mod relation;
pub mod script;
pub mod table;

pub use dictionary::{Dictionary, ScriptId, TermEntry};
pub use error::{Result, ScriptError};
pub use factorize::factorize;
pub use grammar::parse_script;
pub use relation::RelationKind;
pub use script::{Primitive, Script, ScriptKind};
pub use table::{Table, TableSet, build_tables};
