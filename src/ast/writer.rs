//! Appends and patches nodes into a growable byte buffer.
//!
//! The writer is append-dominant: a node's skip slots are reserved when it
//! is opened and patched exactly once, when the trailing sequence they
//! bound closes. This mirrors `bytecode::CodeBlock`'s `emit_jump`/
//! `patch_jump` pair one level up: instead of patching a single forward
//! jump, we patch a forward *skip* that a reader can use to jump clean over
//! an entire subtree.

use alloc::vec::Vec;

use super::schema::Tag;
use super::varint;

/// Configurable limits the writer enforces. The only limit named is the
/// 16-bit skip encoding width; kept as a named constant/struct rather
/// than an inline literal so a future wider encoding is a one-line change.
#[derive(Debug, Clone, Copy)]
pub struct AstLimits {
    /// Skip values must be strictly less than this. Fixed at 65_536 (a
    /// 16-bit field); widening it would change the wire format.
    pub max_skip: u32,
}

impl Default for AstLimits {
    fn default() -> Self {
        Self { max_skip: 65_536 }
    }
}

/// Builds a packed AST buffer.
///
/// Owns the buffer exclusively while building: any `insert_node`/
/// `insert_inlined` call shifts everything after its `at` offset,
/// invalidating payload-start offsets the caller captured earlier for
/// positions at or after `at`. The writer does not track or adjust those
/// for you; record skip-slot positions before inserting earlier bytes.
pub struct AstWriter {
    buf: Vec<u8>,
    limits: AstLimits,
}

impl AstWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new(), limits: AstLimits::default() }
    }

    pub fn with_limits(limits: AstLimits) -> Self {
        Self { buf: Vec::new(), limits }
    }

    /// Current buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Read-only view of the buffer built so far (for tests and diagnostics
    /// taken mid-build).
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the finished buffer.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Append a tag byte and its zeroed skip slots. Returns the payload
    /// start offset (the byte immediately after the tag) that every other
    /// writer method keys off of.
    pub fn begin_node(&mut self, tag: Tag) -> usize {
        self.buf.push(tag as u8);
        let payload_start = self.buf.len();
        for _ in 0..tag.shape().num_skips {
            self.buf.push(0);
            self.buf.push(0);
        }
        payload_start
    }

    /// Insert a tag and its skip slots at an arbitrary earlier offset.
    ///
    /// Everything previously at or after `at` is shifted later and becomes,
    /// structurally, this node's trailing content; `END` is immediately
    /// patched to the (now-current) buffer length so the node is
    /// well-formed even if the caller emits nothing else. Callers that do
    /// emit more after this call are retroactively wrapping existing
    /// buffer content into the new node.
    pub fn insert_node(&mut self, at: usize, tag: Tag) -> usize {
        let shape = tag.shape();
        let mut header = Vec::with_capacity(1 + shape.num_skips as usize * 2);
        header.push(tag as u8);
        header.resize(header.len() + shape.num_skips as usize * 2, 0);
        splice_in(&mut self.buf, at, &header);
        let payload_start = at + 1;
        if shape.num_skips > 0 {
            self.set_skip(payload_start, 0);
        }
        payload_start
    }

    /// Patch skip slot `which` of the node whose payload starts at
    /// `payload_start` with `current_buffer_length - payload_start`.
    ///
    /// Asserts that `which` is a valid slot for this node's tag and that
    /// the delta fits the 16-bit encoding: both are programmer errors, not
    /// recoverable at runtime.
    pub fn set_skip(&mut self, payload_start: usize, which: usize) {
        let delta = self.buf.len() - payload_start;
        self.write_skip_raw(payload_start, which, delta);
    }

    /// Like `set_skip`, but with an explicit absolute target offset instead
    /// of "now".
    pub fn modify_skip(&mut self, payload_start: usize, target_offset: usize, which: usize) {
        assert!(
            target_offset >= payload_start,
            "skip target {} precedes payload start {}",
            target_offset,
            payload_start
        );
        let delta = target_offset - payload_start;
        self.write_skip_raw(payload_start, which, delta);
    }

    fn write_skip_raw(&mut self, payload_start: usize, which: usize, delta: usize) {
        assert!(
            (delta as u32) < self.limits.max_skip,
            "skip delta {} at slot {} exceeds the {}-byte limit",
            delta,
            which,
            self.limits.max_skip
        );
        let slot_offset = payload_start + which * 2;
        assert!(
            slot_offset + 2 <= self.buf.len(),
            "skip slot {} is out of range for node at {}",
            which,
            payload_start
        );
        let value = delta as u16;
        self.buf[slot_offset] = (value >> 8) as u8;
        self.buf[slot_offset + 1] = value as u8;
    }

    /// Open a node, write a varint-prefixed raw byte payload, and return
    /// its payload start. `tag` must have `has_inline` set in its schema
    /// and no fixed subtrees (e.g. `IDENT`, `NUM`, `STR`). For a tag that
    /// combines inline data with fixed subtrees (`MEMBER`, `PROP`,
    /// `VAR_DECL`, ...), call `begin_node` then [`write_inline`] directly,
    /// followed by the subtree writes.
    pub fn add_inlined(&mut self, tag: Tag, bytes: &[u8]) -> usize {
        debug_assert!(tag.shape().has_inline, "{} has no inline payload slot", tag.name());
        let payload_start = self.begin_node(tag);
        self.write_inline(bytes);
        payload_start
    }

    /// Append a varint-length-prefixed byte payload at the current write
    /// position. Must be called immediately after `begin_node`/
    /// `insert_node` for a tag with `has_inline` set, before any fixed
    /// subtrees are written.
    pub fn write_inline(&mut self, bytes: &[u8]) {
        varint::encode(bytes.len() as u32, &mut self.buf);
        self.buf.extend_from_slice(bytes);
    }

    /// Insert variant of [`add_inlined`], at an arbitrary earlier offset.
    pub fn insert_inlined(&mut self, at: usize, tag: Tag, bytes: &[u8]) -> usize {
        debug_assert!(tag.shape().has_inline, "{} has no inline payload slot", tag.name());
        let shape = tag.shape();
        let mut header = Vec::with_capacity(1 + shape.num_skips as usize * 2);
        header.push(tag as u8);
        header.resize(header.len() + shape.num_skips as usize * 2, 0);
        varint::encode(bytes.len() as u32, &mut header);
        header.extend_from_slice(bytes);
        splice_in(&mut self.buf, at, &header);
        let payload_start = at + 1;
        if shape.num_skips > 0 {
            self.set_skip(payload_start, 0);
        }
        payload_start
    }
}

impl Default for AstWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `bytes` into `buf` at `at`, shifting the tail later.
fn splice_in(buf: &mut Vec<u8>, at: usize, bytes: &[u8]) {
    let tail = buf.split_off(at);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&tail);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::reader::AstReader;

    #[test]
    fn begin_node_reserves_tag_and_skips() {
        let mut w = AstWriter::new();
        let p = w.begin_node(Tag::If);
        assert_eq!(p, 1);
        assert_eq!(w.len(), 1 + 2 * 2); // tag + 2 skip slots
    }

    #[test]
    fn leaf_node_has_no_skip_slots() {
        let mut w = AstWriter::new();
        let p = w.begin_node(Tag::Return);
        assert_eq!(w.len(), p); // nothing reserved after the tag byte
    }

    #[test]
    fn set_skip_writes_big_endian_delta() {
        let mut w = AstWriter::new();
        let p = w.begin_node(Tag::While); // 1 skip, 1 fixed subtree
        w.add_inlined(Tag::Ident, b"cond");
        w.begin_node(Tag::Break); // trailing body: one statement
        w.set_skip(p, 0);
        let buf = w.as_slice();
        let end = w.len() - p;
        assert_eq!(buf[p], (end >> 8) as u8);
        assert_eq!(buf[p + 1], end as u8);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn set_skip_panics_on_overflow() {
        let mut w = AstWriter::with_limits(AstLimits { max_skip: 4 });
        let p = w.begin_node(Tag::Seq);
        w.begin_node(Tag::Debugger);
        w.begin_node(Tag::Debugger);
        w.begin_node(Tag::Debugger);
        w.begin_node(Tag::Debugger);
        w.begin_node(Tag::Debugger);
        w.set_skip(p, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_skip_panics_on_bad_slot_index() {
        let mut w = AstWriter::new();
        let p = w.begin_node(Tag::Return); // 0 skips
        w.set_skip(p, 0);
    }

    #[test]
    fn insert_node_auto_closes_over_existing_tail() {
        let mut w = AstWriter::new();
        // Emit two bare statements first, as if they were top-level.
        w.begin_node(Tag::Break);
        w.begin_node(Tag::Continue);
        let tail_len_before = w.len();
        // Now retroactively wrap them both into a SEQ inserted at offset 0.
        let seq = w.insert_node(0, Tag::Seq);
        let buf = w.as_slice().to_vec();
        let r = AstReader::new(&buf);
        let end = r.get_skip(seq, 0);
        assert_eq!(end, 1 + 2 + tail_len_before); // tag + 1 skip slot + wrapped tail
    }
}
