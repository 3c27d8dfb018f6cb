//! A recursive, indented text dump of a packed AST buffer, in the spirit of
//! `bytecode::CodeBlock::disassemble`: a debugging aid, not part of the
//! wire format or a parse target.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::reader::AstReader;
use super::schema::Tag;

/// Render `buf` as an indented tree, one line per node.
///
/// Leaf nodes with inline data show it inline (numbers as their decoded
/// value, everything else as a lossy UTF-8 string); nodes with fixed
/// subtrees or trailing sequences recurse into them at one extra level of
/// indentation.
pub fn dump(buf: &[u8]) -> String {
    let r = AstReader::new(buf);
    let mut out = String::new();
    if !buf.is_empty() {
        dump_node(&r, 0, 0, &mut out);
    }
    out
}

fn dump_node(r: &AstReader, offset: usize, depth: usize, out: &mut String) {
    let tag = r.fetch_tag(offset);
    let shape = tag.shape();
    let payload_start = r.payload_start(offset);
    push_indent(out, depth);
    out.push_str(tag.name());

    if shape.has_inline {
        let data = r.get_inlined_data(payload_start, tag);
        if tag == Tag::Num {
            out.push_str(&format!(" {}", r.get_num(payload_start, tag)));
        } else {
            out.push_str(&format!(" {:?}", String::from_utf8_lossy(data)));
        }
    }

    for (i, name) in tag.skip_names().iter().enumerate() {
        let end = r.get_skip(payload_start, i);
        out.push_str(&format!(" {}={}", name, end));
    }
    out.push('\n');

    let mut pos = r.move_to_children(payload_start, tag);
    for _ in 0..shape.num_subtrees {
        dump_node(r, pos, depth + 1, out);
        pos = skip_tree_for_dump(r, pos);
    }

    // Trailing sequence: everything from here to the final ("end", slot 0)
    // skip, if this tag has one; tags with no skip slots have no trailing
    // sequence by construction (their fixed subtrees are all of their
    // children).
    if shape.num_skips > 0 {
        let end = r.get_skip(payload_start, 0);
        while pos < end {
            dump_node(r, pos, depth + 1, out);
            pos = skip_tree_for_dump(r, pos);
        }
    }
}

fn skip_tree_for_dump(r: &AstReader, offset: usize) -> usize {
    let mut cursor = offset;
    r.skip_tree(&mut cursor);
    cursor
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::schema::Tag;
    use crate::ast::writer::AstWriter;

    #[test]
    fn dumps_a_small_if_statement() {
        // IF(cond=IDENT"x", then=[RETURN], else=[])
        let mut w = AstWriter::new();
        let iff = w.begin_node(Tag::If);
        w.add_inlined(Tag::Ident, b"x");
        w.begin_node(Tag::Return);
        w.set_skip(iff, 1);
        w.set_skip(iff, 0);
        let buf = w.finish();

        let text = dump(&buf);
        assert!(text.starts_with("IF"));
        assert!(text.contains("IDENT"));
        assert!(text.contains("RETURN"));
    }

    #[test]
    fn dumps_a_number_literal_with_its_decoded_value() {
        let mut w = AstWriter::new();
        w.add_inlined(Tag::Num, b"42.5");
        let buf = w.finish();
        let text = dump(&buf);
        assert_eq!(text, "NUM 42.5\n");
    }

    #[test]
    fn empty_buffer_dumps_to_empty_string() {
        assert_eq!(dump(&[]), "");
    }
}
