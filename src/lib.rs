//! breenish-ast: AST encoding/traversal core and date arithmetic for the
//! Breenish JS engine.
//!
//! This crate does not parse JavaScript and does not interpret it. It
//! provides the two pieces of semantic machinery that sit between a parser
//! and an interpreter:
//!
//! - [`ast`]: a compact, self-describing, byte-level AST format (a schema
//!   table plus a writer, reader, and diagnostic dumper) that a parser
//!   writes into and an interpreter reads back out of.
//! - [`date`]: ECMAScript-compatible calendar arithmetic, local-time
//!   adjustment, string parsing/formatting, and the `Date` value-coercion
//!   contract, exposed against small host traits (`TimeZoneSource`,
//!   `HostLocale`, `HostValue`) rather than a concrete value system.
//!
//! # Usage
//!
//! ```rust
//! use breenish_ast::ast::{schema::Tag, writer::AstWriter, reader::AstReader};
//!
//! let mut w = AstWriter::new();
//! let script = w.begin_node(Tag::Script);
//! w.set_skip(script, 1); // no leading directives
//! w.begin_node(Tag::Return); // a single bare `return;` statement
//! w.set_skip(script, 0); // end of body
//! let buf = w.finish();
//!
//! let r = AstReader::new(&buf);
//! let mut cursor = 0;
//! r.skip_tree(&mut cursor);
//! assert_eq!(cursor, buf.len());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ast;
pub mod date;
pub mod error;
