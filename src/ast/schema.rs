//! The closed tag enumeration and its schema table.
//!
//! Every node on the wire starts with one tag byte. `Tag` is the closed set
//! of node kinds a writer may emit and a reader may encounter; `Shape`
//! describes how many forward skips, fixed subtrees, and inline bytes each
//! tag carries. `SCHEMA` is indexed directly by `tag as usize`; a parser
//! and an interpreter built against this crate MUST use this same table,
//! never a hand-copied one, or the two ends of the format drift apart.

/// A closed, 8-bit node kind identifier.
///
/// Mirrors `bytecode::Op` in spirit (a flat `#[repr(u8)]` enum with a total
/// `from_u8` mapping) but describes AST node *shapes* rather than VM
/// instructions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Nop = 0,
    Script = 1,
    Var = 2,
    VarDecl = 3,
    FuncDecl = 4,
    If = 5,
    Func = 6,
    Assign = 7,
    PlusAssign = 8,
    MinusAssign = 9,
    StarAssign = 10,
    SlashAssign = 11,
    PercentAssign = 12,
    Num = 13,
    Ident = 14,
    Str = 15,
    Regex = 16,
    Label = 17,
    Seq = 18,
    While = 19,
    DoWhile = 20,
    For = 21,
    ForIn = 22,
    Cond = 23,
    Debugger = 24,
    Break = 25,
    Continue = 26,
    Return = 27,
    LabBreak = 28,
    LabContinue = 29,
    ValReturn = 30,
    Throw = 31,
    Try = 32,
    Switch = 33,
    Case = 34,
    Default = 35,
    With = 36,
    LogOr = 37,
    LogAnd = 38,
    Or = 39,
    Xor = 40,
    And = 41,
    Eq = 42,
    EqEq = 43,
    Ne = 44,
    NeNe = 45,
    Le = 46,
    Lt = 47,
    Ge = 48,
    Gt = 49,
    In = 50,
    Instanceof = 51,
    Lshift = 52,
    Rshift = 53,
    Urshift = 54,
    Add = 55,
    Sub = 56,
    Rem = 57,
    Mul = 58,
    Div = 59,
    Pos = 60,
    Neg = 61,
    Not = 62,
    LogicalNot = 63,
    Void = 64,
    Delete = 65,
    Typeof = 66,
    PreInc = 67,
    PreDec = 68,
    PostInc = 69,
    PostDec = 70,
    Member = 71,
    Index = 72,
    Call = 73,
    New = 74,
    Array = 75,
    Object = 76,
    Prop = 77,
    Getter = 78,
    Setter = 79,
    This = 80,
    True = 81,
    False = 82,
    Null = 83,
    Undef = 84,
    UseStrict = 85,
}

/// Number of tags in the closed set. Kept in sync with [`Tag`] by the test
/// at the bottom of this file.
pub const TAG_COUNT: usize = 86;

impl Tag {
    /// Map a raw byte to a tag. Returns `None` for any byte outside the
    /// closed set; the caller decides whether that means a corrupt buffer
    /// or an unknown future extension.
    pub fn from_u8(b: u8) -> Option<Self> {
        use Tag::*;
        Some(match b {
            0 => Nop,
            1 => Script,
            2 => Var,
            3 => VarDecl,
            4 => FuncDecl,
            5 => If,
            6 => Func,
            7 => Assign,
            8 => PlusAssign,
            9 => MinusAssign,
            10 => StarAssign,
            11 => SlashAssign,
            12 => PercentAssign,
            13 => Num,
            14 => Ident,
            15 => Str,
            16 => Regex,
            17 => Label,
            18 => Seq,
            19 => While,
            20 => DoWhile,
            21 => For,
            22 => ForIn,
            23 => Cond,
            24 => Debugger,
            25 => Break,
            26 => Continue,
            27 => Return,
            28 => LabBreak,
            29 => LabContinue,
            30 => ValReturn,
            31 => Throw,
            32 => Try,
            33 => Switch,
            34 => Case,
            35 => Default,
            36 => With,
            37 => LogOr,
            38 => LogAnd,
            39 => Or,
            40 => Xor,
            41 => And,
            42 => Eq,
            43 => EqEq,
            44 => Ne,
            45 => NeNe,
            46 => Le,
            47 => Lt,
            48 => Ge,
            49 => Gt,
            50 => In,
            51 => Instanceof,
            52 => Lshift,
            53 => Rshift,
            54 => Urshift,
            55 => Add,
            56 => Sub,
            57 => Rem,
            58 => Mul,
            59 => Div,
            60 => Pos,
            61 => Neg,
            62 => Not,
            63 => LogicalNot,
            64 => Void,
            65 => Delete,
            66 => Typeof,
            67 => PreInc,
            68 => PreDec,
            69 => PostInc,
            70 => PostDec,
            71 => Member,
            72 => Index,
            73 => Call,
            74 => New,
            75 => Array,
            76 => Object,
            77 => Prop,
            78 => Getter,
            79 => Setter,
            80 => This,
            81 => True,
            82 => False,
            83 => Null,
            84 => Undef,
            85 => UseStrict,
            _ => return None,
        })
    }

    /// The schema name, used by the dumper and in corruption diagnostics.
    pub fn name(self) -> &'static str {
        SCHEMA[self as usize].name
    }

    /// This tag's shape: skip count, fixed-subtree count, inline payload.
    pub fn shape(self) -> Shape {
        SCHEMA[self as usize].shape
    }

    /// Per-skip-slot names used only by the diagnostic dumper.
    pub fn skip_names(self) -> &'static [&'static str] {
        SCHEMA[self as usize].skip_names
    }
}

/// Per-tag shape: how many forward skips, fixed subtrees, and whether an
/// inline varint-length-prefixed payload follows the skip slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub num_skips: u8,
    pub num_subtrees: u8,
    pub has_inline: bool,
}

struct SchemaEntry {
    name: &'static str,
    shape: Shape,
    skip_names: &'static [&'static str],
}

const fn shape(num_skips: u8, num_subtrees: u8, has_inline: bool) -> Shape {
    Shape { num_skips, num_subtrees, has_inline }
}

const NONE: &[&str] = &[];
const END_ONLY: &[&str] = &["end"];

/// The schema table. Indexed by `Tag as usize`; kept in tag-declaration
/// order so a reviewer can read this file top to bottom next to the `Tag`
/// enum above.
///
/// Skip-slot conventions, for tags where only the boundary count is fixed
/// and the ordering is decided here:
/// - `IF`: `[end, end_true]`: trailing group 1 is the `then` branch up to
///   `end_true`, trailing group 2 is the `else` branch up to `end`.
/// - `TRY`: `[end, catch, finally]`, with the single fixed subtree holding
///   the catch-binding name (`Ident` or `Nop` if there is none). Trailing
///   groups: try-block statements (to `catch`), catch-block statements (to
///   `finally`), finally-block statements (to `end`).
/// - `FOR` / `FORIN`: `[end, body]`; the three fixed subtrees are
///   init/test/update (`FOR`) or left/right (`ForIn`, whose third subtree
///   is `Nop`); the sole trailing group is the loop body, so `body == end`
///   by construction (kept as two named slots for symmetry with `IF`/`TRY`
///   and so a future per-iteration fast path has somewhere to point).
/// - `DOWHILE`: `[end, body_end]`; trailing group 1 is the body (to
///   `body_end`), trailing group 2 is the single condition expression (to
///   `end`).
/// - `SCRIPT`: `[end, directives_end]`; trailing group 1 is the leading
///   directive prologue (`UseStrict` and friends, to `directives_end`),
///   trailing group 2 is the program body (to `end`).
/// - `VAR`: `[end, last_decl]`; trailing group is the `VarDecl` list (to
///   `end`); `last_decl` marks the start of the final declarator so a
///   writer extending a `var` list with `insert_node` does not need to
///   rescan.
/// - `FUNC`: `[end, params_end, upvalues_end]`, fixed subtree is the
///   function name (`Ident` or `Nop`). Trailing groups: parameters (to
///   `params_end`), captured-upvalue names (to `upvalues_end`), body
///   statements (to `end`).
/// - `SWITCH`: `[end, default]`; trailing group is the `Case`/`Default`
///   list (to `end`); `default` points at the `Default` clause if present,
///   else equals `end`.
static SCHEMA: [SchemaEntry; TAG_COUNT] = [
    SchemaEntry { name: "NOP", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "SCRIPT", shape: shape(2, 0, false), skip_names: &["end", "directives_end"] },
    SchemaEntry { name: "VAR", shape: shape(2, 0, false), skip_names: &["end", "last_decl"] },
    SchemaEntry { name: "VAR_DECL", shape: shape(0, 1, true), skip_names: NONE },
    SchemaEntry { name: "FUNC_DECL", shape: shape(0, 1, true), skip_names: NONE },
    SchemaEntry { name: "IF", shape: shape(2, 1, false), skip_names: &["end", "end_true"] },
    SchemaEntry { name: "FUNC", shape: shape(3, 1, false), skip_names: &["end", "params_end", "upvalues_end"] },
    SchemaEntry { name: "ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "PLUS_ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "MINUS_ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "STAR_ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "SLASH_ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "PERCENT_ASSIGN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "NUM", shape: shape(0, 0, true), skip_names: NONE },
    SchemaEntry { name: "IDENT", shape: shape(0, 0, true), skip_names: NONE },
    SchemaEntry { name: "STRING", shape: shape(0, 0, true), skip_names: NONE },
    SchemaEntry { name: "REGEX", shape: shape(0, 0, true), skip_names: NONE },
    SchemaEntry { name: "LABEL", shape: shape(0, 0, true), skip_names: NONE },
    SchemaEntry { name: "SEQ", shape: shape(1, 0, false), skip_names: END_ONLY },
    SchemaEntry { name: "WHILE", shape: shape(1, 1, false), skip_names: END_ONLY },
    SchemaEntry { name: "DOWHILE", shape: shape(2, 0, false), skip_names: &["end", "body_end"] },
    SchemaEntry { name: "FOR", shape: shape(2, 3, false), skip_names: &["end", "body"] },
    SchemaEntry { name: "FOR_IN", shape: shape(2, 3, false), skip_names: &["end", "body"] },
    SchemaEntry { name: "COND", shape: shape(0, 3, false), skip_names: NONE },
    SchemaEntry { name: "DEBUGGER", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "BREAK", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "CONTINUE", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "RETURN", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "LAB_BREAK", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "LAB_CONTINUE", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "VAL_RETURN", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "THROW", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "TRY", shape: shape(3, 1, false), skip_names: &["end", "catch", "finally"] },
    SchemaEntry { name: "SWITCH", shape: shape(2, 1, false), skip_names: &["end", "default"] },
    SchemaEntry { name: "CASE", shape: shape(1, 1, false), skip_names: END_ONLY },
    SchemaEntry { name: "DEFAULT", shape: shape(1, 0, false), skip_names: END_ONLY },
    SchemaEntry { name: "WITH", shape: shape(1, 1, false), skip_names: END_ONLY },
    SchemaEntry { name: "LOG_OR", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "LOG_AND", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "OR", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "XOR", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "AND", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "EQ", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "EQ_EQ", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "NE", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "NE_NE", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "LE", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "LT", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "GE", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "GT", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "IN", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "INSTANCEOF", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "LSHIFT", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "RSHIFT", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "URSHIFT", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "ADD", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "SUB", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "REM", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "MUL", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "DIV", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "POS", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "NEG", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "NOT", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "LOGICAL_NOT", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "VOID", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "DELETE", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "TYPEOF", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "PREINC", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "PREDEC", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "POSTINC", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "POSTDEC", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "MEMBER", shape: shape(0, 1, true), skip_names: NONE },
    SchemaEntry { name: "INDEX", shape: shape(0, 2, false), skip_names: NONE },
    SchemaEntry { name: "CALL", shape: shape(1, 1, false), skip_names: END_ONLY },
    SchemaEntry { name: "NEW", shape: shape(1, 1, false), skip_names: END_ONLY },
    SchemaEntry { name: "ARRAY", shape: shape(1, 0, false), skip_names: END_ONLY },
    SchemaEntry { name: "OBJECT", shape: shape(1, 0, false), skip_names: END_ONLY },
    SchemaEntry { name: "PROP", shape: shape(0, 1, true), skip_names: NONE },
    SchemaEntry { name: "GETTER", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "SETTER", shape: shape(0, 1, false), skip_names: NONE },
    SchemaEntry { name: "THIS", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "TRUE", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "FALSE", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "NULL", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "UNDEF", shape: shape(0, 0, false), skip_names: NONE },
    SchemaEntry { name: "USE_STRICT", shape: shape(0, 0, false), skip_names: NONE },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_table_matches_tag_count() {
        assert_eq!(SCHEMA.len(), TAG_COUNT);
    }

    #[test]
    fn from_u8_round_trips_every_tag() {
        for i in 0..TAG_COUNT as u8 {
            let tag = Tag::from_u8(i).expect("every byte in range must map to a tag");
            assert_eq!(tag as u8, i);
        }
        assert!(Tag::from_u8(TAG_COUNT as u8).is_none());
        assert!(Tag::from_u8(255).is_none());
    }

    #[test]
    fn skip_names_len_matches_num_skips() {
        for i in 0..TAG_COUNT as u8 {
            let tag = Tag::from_u8(i).unwrap();
            let shape = tag.shape();
            assert_eq!(
                tag.skip_names().len(),
                shape.num_skips as usize,
                "tag {} ({}) shape/skip_names mismatch",
                i,
                tag.name()
            );
        }
    }

    #[test]
    fn leaf_tags_have_no_children() {
        for leaf in [Tag::Num, Tag::Ident, Tag::Str, Tag::Regex, Tag::Label, Tag::This, Tag::True, Tag::False, Tag::Null, Tag::Undef] {
            let shape = leaf.shape();
            assert_eq!(shape.num_skips, 0);
        }
    }
}
