//! Reads nodes back out of a buffer built by [`super::writer::AstWriter`].
//!
//! Mirrors `bytecode::CodeBlock`'s `read_u8`/`read_u16`/`disassemble` trio:
//! small, non-panicking-on-valid-input accessors keyed by byte offset, plus
//! one higher-level walk (`skip_tree`) built out of them. A reader never
//! allocates; it only ever borrows the buffer it was constructed with.

use super::schema::Tag;
use super::varint;

/// A cursor-free view over a packed AST buffer.
///
/// Every method takes the offset it needs explicitly rather than carrying
/// mutable position state, so the same reader can be shared by many
/// independent walks (e.g. an interpreter resuming at a saved offset after
/// a `yield`).
pub struct AstReader<'a> {
    buf: &'a [u8],
}

impl<'a> AstReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The tag byte at `offset`. Panics on an offset past the end or on a
    /// byte outside the closed `Tag` set, both of which indicate a corrupt
    /// buffer, not a recoverable condition a reader can paper over.
    pub fn fetch_tag(&self, offset: usize) -> Tag {
        Tag::from_u8(self.buf[offset]).unwrap_or_else(|| {
            log::trace!("fetch_tag: unknown tag byte {} at offset {}", self.buf[offset], offset);
            panic!("corrupt AST buffer: unknown tag byte {} at offset {}", self.buf[offset], offset)
        })
    }

    /// The payload-start offset (the byte right after the tag) for a node
    /// whose tag byte is at `offset`.
    pub fn payload_start(&self, offset: usize) -> usize {
        offset + 1
    }

    /// Resolve skip slot `which` of the node whose payload starts at
    /// `payload_start`, returning the absolute buffer offset it points to
    /// (not the raw delta stored on the wire).
    pub fn get_skip(&self, payload_start: usize, which: usize) -> usize {
        let slot = payload_start + which * 2;
        let delta = ((self.buf[slot] as usize) << 8) | self.buf[slot + 1] as usize;
        payload_start + delta
    }

    /// The offset of the first fixed subtree (or, for tags with no fixed
    /// subtrees, the start of the trailing sequence): right after this
    /// node's skip slots and, if present, its inline payload.
    pub fn move_to_children(&self, payload_start: usize, tag: Tag) -> usize {
        let shape = tag.shape();
        let mut pos = payload_start + shape.num_skips as usize * 2;
        if shape.has_inline {
            let (len, len_bytes) = varint::decode(self.buf, pos);
            pos += len_bytes + len as usize;
        }
        pos
    }

    /// The raw inline byte payload of a node, given its payload start.
    /// `tag` must have `has_inline` set in its schema.
    pub fn get_inlined_data(&self, payload_start: usize, tag: Tag) -> &'a [u8] {
        let shape = tag.shape();
        debug_assert!(shape.has_inline, "{} has no inline payload", tag.name());
        let start = payload_start + shape.num_skips as usize * 2;
        let (len, len_bytes) = varint::decode(self.buf, start);
        let data_start = start + len_bytes;
        &self.buf[data_start..data_start + len as usize]
    }

    /// Decode a `NUM` node's inline payload: the numeric literal text the
    /// lexer scanned (e.g. `b"42.5"`, `b"1e3"`), interpreted as a base-10
    /// decimal. Bounded to the first 511 bytes, matching the fixed scratch
    /// buffer a `strtod`-style conversion would copy the text into. Never
    /// panics: text with no parseable digits decodes to `NaN`, and a
    /// partially valid prefix (trailing garbage after the exponent, say)
    /// decodes as far as it parses, same as `strtod`.
    pub fn get_num(&self, payload_start: usize, tag: Tag) -> f64 {
        let bytes = self.get_inlined_data(payload_start, tag);
        let bounded = &bytes[..bytes.len().min(511)];
        parse_decimal(bounded)
    }

    /// Advance `cursor` past the entire node starting there, without
    /// visiting its children individually.
    ///
    /// Nodes with at least one skip slot jump directly via their `end`
    /// skip (slot 0, by convention; see the doc comment on `SCHEMA` in
    /// `schema.rs`). Nodes with no skip slots (most expression nodes) have
    /// no precomputed end and are walked structurally: past any inline
    /// payload, then recursively past each fixed subtree in turn.
    pub fn skip_tree(&self, cursor: &mut usize) {
        *cursor = self.skip_tree_at(*cursor);
    }

    fn skip_tree_at(&self, offset: usize) -> usize {
        let tag = self.fetch_tag(offset);
        let shape = tag.shape();
        let payload_start = offset + 1;
        if shape.num_skips > 0 {
            return self.get_skip(payload_start, 0);
        }
        let mut pos = payload_start;
        if shape.has_inline {
            let (len, len_bytes) = varint::decode(self.buf, pos);
            pos += len_bytes + len as usize;
        }
        for _ in 0..shape.num_subtrees {
            pos = self.skip_tree_at(pos);
        }
        pos
    }
}

/// `[+-]?digits?(.digits?)?([eE][+-]?digits)?`, the grammar a numeric
/// literal lexer produces. Stops at the first byte that doesn't fit rather
/// than rejecting the whole string, and returns `NaN` if no digit was seen
/// anywhere in the mantissa.
fn parse_decimal(bytes: &[u8]) -> f64 {
    let mut i = 0;
    let len = bytes.len();
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut mantissa = 0.0f64;
    let mut saw_digit = false;
    while i < len && bytes[i].is_ascii_digit() {
        mantissa = mantissa * 10.0 + (bytes[i] - b'0') as f64;
        saw_digit = true;
        i += 1;
    }
    if i < len && bytes[i] == b'.' {
        i += 1;
        let mut scale = 0.1;
        while i < len && bytes[i].is_ascii_digit() {
            mantissa += (bytes[i] - b'0') as f64 * scale;
            scale *= 0.1;
            saw_digit = true;
            i += 1;
        }
    }
    if !saw_digit {
        return f64::NAN;
    }

    let mut exponent = 0i32;
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let exp_negative = match bytes.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        let mut exp_value = 0i32;
        let mut saw_exp_digit = false;
        while j < len && bytes[j].is_ascii_digit() {
            exp_value = exp_value * 10 + (bytes[j] - b'0') as i32;
            saw_exp_digit = true;
            j += 1;
        }
        if saw_exp_digit {
            exponent = if exp_negative { -exp_value } else { exp_value };
        }
    }

    let value = mantissa * pow10(exponent);
    if negative {
        -value
    } else {
        value
    }
}

fn pow10(exponent: i32) -> f64 {
    let mut result = 1.0f64;
    for _ in 0..exponent.unsigned_abs() {
        result *= 10.0;
    }
    if exponent < 0 {
        1.0 / result
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::writer::AstWriter;

    #[test]
    fn reads_back_inline_string() {
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Ident, b"foo");
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert_eq!(r.get_inlined_data(p, Tag::Ident), b"foo");
    }

    #[test]
    fn skip_tree_over_leaf_consumes_tag_byte_only() {
        let mut w = AstWriter::new();
        w.begin_node(Tag::This);
        let buf = w.finish();
        let r = AstReader::new(&buf);
        let mut cursor = 0;
        r.skip_tree(&mut cursor);
        assert_eq!(cursor, 1);
    }

    #[test]
    fn skip_tree_over_binary_expr_recurses_through_fixed_subtrees() {
        // ADD(NUM, NUM), neither operand has a skip slot, so skip_tree must
        // walk both children structurally rather than via an `end` skip.
        let mut w = AstWriter::new();
        let add = w.begin_node(Tag::Add);
        w.add_inlined(Tag::Num, b"1");
        w.add_inlined(Tag::Num, b"2");
        let buf = w.finish();
        assert_eq!(add, 1); // ADD has 0 skips, so payload starts right after the tag
        let r = AstReader::new(&buf);
        let mut cursor = 0;
        r.skip_tree(&mut cursor);
        assert_eq!(cursor, buf.len());
    }

    #[test]
    fn if_node_end_skip_jumps_over_both_branches() {
        // IF(cond=IDENT"x", then=[RETURN], else=[])
        let mut w = AstWriter::new();
        let iff = w.begin_node(Tag::If);
        w.add_inlined(Tag::Ident, b"x"); // fixed subtree: condition
        w.begin_node(Tag::Return); // then-branch body
        w.set_skip(iff, 1); // end_true: then-branch ends here
        // no else branch
        w.set_skip(iff, 0); // end: whole IF ends here too
        let buf = w.finish();
        let r = AstReader::new(&buf);

        let cond_start = r.move_to_children(iff, Tag::If);
        let mut c = cond_start;
        r.skip_tree(&mut c);
        let then_start = c;
        let then_end = r.get_skip(iff, 1);
        assert!(then_start < then_end);

        let mut cursor = 0;
        r.skip_tree(&mut cursor);
        assert_eq!(cursor, buf.len());
    }

    #[test]
    fn get_num_decodes_literal_text() {
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Num, b"42.5");
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert_eq!(r.get_num(p, Tag::Num), 42.5);
    }

    #[test]
    fn get_num_handles_sign_and_exponent() {
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Num, b"-1.5e3");
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert_eq!(r.get_num(p, Tag::Num), -1500.0);
    }

    #[test]
    fn get_num_never_panics_on_garbage() {
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Num, b"not-a-number");
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert!(r.get_num(p, Tag::Num).is_nan());
    }

    #[test]
    fn get_num_parses_longest_valid_prefix() {
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Num, b"12abc");
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert_eq!(r.get_num(p, Tag::Num), 12.0);
    }

    #[test]
    fn get_num_bounds_payload_to_511_bytes() {
        // 520 leading zeros push the only significant digits ("42") past
        // byte 511, so a bounded reader never sees them and reads 0.
        let mut digits = alloc::vec::Vec::new();
        digits.extend(core::iter::repeat(b'0').take(520));
        digits.extend_from_slice(b"42");
        let mut w = AstWriter::new();
        let p = w.add_inlined(Tag::Num, &digits);
        let buf = w.finish();
        let r = AstReader::new(&buf);
        assert_eq!(r.get_num(p, Tag::Num), 0.0);
    }
}
