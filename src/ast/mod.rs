//! Packed binary AST format: schema table, writer, reader, and a diagnostic
//! dumper.
//!
//! A tree is a single root node (typically [`schema::Tag::Script`])
//! serialized into a flat `Vec<u8>` by [`writer::AstWriter`] and walked back
//! out by [`reader::AstReader`]. Every node is `tag, skips, [varint length,
//! payload], fixed children, trailing children`; see the module docs on
//! `schema`, `writer`, and `reader` for the exact layout.

pub mod dump;
pub mod reader;
pub mod schema;
pub mod varint;
pub mod writer;
