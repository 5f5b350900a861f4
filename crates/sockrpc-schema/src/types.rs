//! The per-type marshaling table.
//!
//! Maps a declared type spelling to its wire size rule and the copy-in /
//! copy-out code the generator splices into stubs and skeletons. Pointer-ness
//! comes purely from the spelling: a trailing `*` marks a pointer, and the
//! only pointer kind with a wire representation is text. Adding a new
//! argument type means adding one entry here; the generator never special
//! cases types anywhere else.

use sockrpc_wire::MAX_ARGUMENT_SIZE;

/// How an argument kind travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    /// NUL-terminated text: `len + 1` bytes, or zero bytes when absent.
    Text,
    /// Fixed-width value: exactly `size` bytes.
    Fixed { size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Text,
    Int(&'static str, usize),
    Float(&'static str, usize),
    Bool,
    Bytes(usize),
}

/// One resolved entry of the marshaling table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    spelling: String,
    repr: Repr,
}

impl TypeInfo {
    /// The normalized declared spelling.
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Wire size rule.
    pub fn kind(&self) -> WireKind {
        match &self.repr {
            Repr::Text => WireKind::Text,
            Repr::Int(_, size) | Repr::Float(_, size) => WireKind::Fixed { size: *size },
            Repr::Bool => WireKind::Fixed { size: 1 },
            Repr::Bytes(size) => WireKind::Fixed { size: *size },
        }
    }

    /// Whether the spelling declared a pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self.repr, Repr::Text)
    }

    /// Owned Rust type used in trait signatures and return values.
    pub fn owned(&self) -> String {
        match &self.repr {
            Repr::Text => "Option<String>".to_string(),
            Repr::Int(ty, _) | Repr::Float(ty, _) => (*ty).to_string(),
            Repr::Bool => "bool".to_string(),
            Repr::Bytes(n) => format!("[u8; {n}]"),
        }
    }

    /// Borrowed Rust type used for client stub parameters.
    pub fn param(&self) -> String {
        match &self.repr {
            Repr::Text => "Option<&str>".to_string(),
            _ => self.owned(),
        }
    }

    /// Copy-in rule: a statement marshaling `var` into the builder `msg`.
    ///
    /// `var` must already have the [`TypeInfo::param`] shape; owned text is
    /// adapted by the caller with `.as_deref()`.
    pub fn encode_stmt(&self, msg: &str, var: &str) -> String {
        match &self.repr {
            Repr::Text => format!("{msg}.push_text({var})?;"),
            Repr::Int(_, _) | Repr::Float(_, _) => {
                format!("{msg}.push_scalar(&{var}.to_le_bytes())?;")
            }
            Repr::Bool => format!("{msg}.push_scalar(&[u8::from({var})])?;"),
            Repr::Bytes(_) => format!("{msg}.push_scalar(&{var})?;"),
        }
    }

    /// Copy-out rule: an expression unmarshaling argument `index` of the
    /// received message `msg` into the owned shape.
    pub fn decode_expr(&self, msg: &str, index: usize) -> String {
        match &self.repr {
            Repr::Text => format!("{msg}.text({index})?"),
            Repr::Int(ty, size) | Repr::Float(ty, size) => {
                format!("{ty}::from_le_bytes({msg}.scalar::<{size}>({index})?)")
            }
            Repr::Bool => format!("{msg}.scalar::<1>({index})?[0] != 0"),
            Repr::Bytes(n) => format!("{msg}.scalar::<{n}>({index})?"),
        }
    }
}

/// Resolve a declared type spelling to its marshaling entry.
///
/// Returns `None` for spellings with no wire representation; the schema
/// builder turns that into a hard generation-time failure.
pub fn resolve(spelling: &str) -> Option<TypeInfo> {
    let normalized = collapse_whitespace(spelling);

    if normalized.ends_with('*') {
        return match normalized.as_str() {
            "char *" | "const char *" => Some(TypeInfo {
                spelling: normalized,
                repr: Repr::Text,
            }),
            _ => None,
        };
    }

    let repr = match normalized.as_str() {
        "bool" => Repr::Bool,
        "char" | "int8_t" => Repr::Int("i8", 1),
        "unsigned char" | "uint8_t" => Repr::Int("u8", 1),
        "short" | "int16_t" => Repr::Int("i16", 2),
        "unsigned short" | "uint16_t" => Repr::Int("u16", 2),
        "int" | "int32_t" => Repr::Int("i32", 4),
        "unsigned" | "unsigned int" | "uint32_t" => Repr::Int("u32", 4),
        "long long" | "int64_t" => Repr::Int("i64", 8),
        "unsigned long long" | "uint64_t" | "size_t" => Repr::Int("u64", 8),
        "float" => Repr::Float("f32", 4),
        "double" => Repr::Float("f64", 8),
        other => Repr::Bytes(parse_bytes_pattern(other)?),
    };

    Some(TypeInfo {
        spelling: normalized,
        repr,
    })
}

/// Recognized by-value aggregate pattern: `bytes[N]`, 1 ≤ N ≤ the argument
/// size cap.
fn parse_bytes_pattern(spelling: &str) -> Option<usize> {
    let inner = spelling.strip_prefix("bytes[")?.strip_suffix(']')?;
    let n: usize = inner.parse().ok()?;
    (1..=MAX_ARGUMENT_SIZE).contains(&n).then_some(n)
}

fn collapse_whitespace(spelling: &str) -> String {
    spelling.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_spellings_resolve() {
        for spelling in ["char *", "const char *", "char    *", " char * "] {
            let info = resolve(spelling).unwrap();
            assert_eq!(info.kind(), WireKind::Text);
            assert!(info.is_pointer());
            assert_eq!(info.owned(), "Option<String>");
            assert_eq!(info.param(), "Option<&str>");
        }
    }

    #[test]
    fn scalar_spellings_resolve_with_fixed_sizes() {
        let cases = [
            ("bool", 1),
            ("int8_t", 1),
            ("uint8_t", 1),
            ("int16_t", 2),
            ("uint16_t", 2),
            ("int", 4),
            ("int32_t", 4),
            ("unsigned int", 4),
            ("uint32_t", 4),
            ("int64_t", 8),
            ("uint64_t", 8),
            ("size_t", 8),
            ("float", 4),
            ("double", 8),
        ];
        for (spelling, size) in cases {
            let info = resolve(spelling).unwrap();
            assert_eq!(info.kind(), WireKind::Fixed { size }, "{spelling}");
            assert!(!info.is_pointer());
        }
    }

    #[test]
    fn aggregate_pattern_resolves() {
        let info = resolve("bytes[16]").unwrap();
        assert_eq!(info.kind(), WireKind::Fixed { size: 16 });
        assert_eq!(info.owned(), "[u8; 16]");
        assert_eq!(info.param(), "[u8; 16]");
    }

    #[test]
    fn unsupported_spellings_are_rejected() {
        for spelling in [
            "struct timeval",
            "void *",
            "int *",
            "bytes[0]",
            "bytes[x]",
            "bytes[]",
            "string",
            "",
        ] {
            assert!(resolve(spelling).is_none(), "{spelling:?}");
        }
    }

    #[test]
    fn copy_in_rules_cover_every_kind() {
        assert_eq!(
            resolve("char *").unwrap().encode_stmt("req", "msg"),
            "req.push_text(msg)?;"
        );
        assert_eq!(
            resolve("int").unwrap().encode_stmt("req", "count"),
            "req.push_scalar(&count.to_le_bytes())?;"
        );
        assert_eq!(
            resolve("bool").unwrap().encode_stmt("req", "flag"),
            "req.push_scalar(&[u8::from(flag)])?;"
        );
        assert_eq!(
            resolve("bytes[4]").unwrap().encode_stmt("req", "tag"),
            "req.push_scalar(&tag)?;"
        );
    }

    #[test]
    fn copy_out_rules_cover_every_kind() {
        assert_eq!(
            resolve("char *").unwrap().decode_expr("reply", 0),
            "reply.text(0)?"
        );
        assert_eq!(
            resolve("int").unwrap().decode_expr("reply", 1),
            "i32::from_le_bytes(reply.scalar::<4>(1)?)"
        );
        assert_eq!(
            resolve("bool").unwrap().decode_expr("reply", 2),
            "reply.scalar::<1>(2)?[0] != 0"
        );
        assert_eq!(
            resolve("bytes[4]").unwrap().decode_expr("reply", 3),
            "reply.scalar::<4>(3)?"
        );
    }
}
