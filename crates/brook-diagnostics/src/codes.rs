// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes to titles and categories. The JSON report uses it to
//! attach a category to every diagnostic.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Resolution,
    Type,
    Structure,
    Runtime,
    Backend,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Resolution => write!(f, "Resolution"),
            ErrorCategory::Type => write!(f, "Type"),
            ErrorCategory::Structure => write!(f, "Structure"),
            ErrorCategory::Runtime => write!(f, "Runtime"),
            ErrorCategory::Backend => write!(f, "Backend"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Lexer errors (E00xx)
                "E0001" => ("unexpected character", Syntax),
                "E0002" => ("invalid integer literal", Syntax),

                // Reducer errors (E01xx)
                "E0100" => ("unmatched closing bracket", Syntax),
                "E0101" => ("unclosed bracket", Syntax),
                "E0102" => ("unexpected token", Syntax),
                "E0103" => ("malformed function", Syntax),
                "E0104" => ("missing operand", Syntax),
                "E0105" => ("malformed binding", Syntax),
                "E0106" => ("invalid assignment target", Syntax),
                "E0107" => ("misplaced terminator", Syntax),

                // Resolution errors (E02xx)
                "E0200" => ("undefined name", Resolution),

                // Type errors (E03xx)
                "E0300" => ("mismatched types", Type),
                "E0301" => ("return type mismatch", Type),
                "E0302" => ("bare return from a non-void function", Type),
                "E0303" => ("expected u64", Type),
                "E0304" => ("value is not callable", Type),
                "E0305" => ("arity mismatch", Type),
                "E0306" => ("expected a type", Type),
                "E0307" => ("expected a value", Type),

                // Unsupported constructs (E04xx)
                "E0400" => ("top-level item is not a binding", Structure),
                "E0401" => ("binding has no value", Structure),
                "E0402" => ("invalid function argument", Structure),
                "E0403" => ("defaulted argument", Structure),
                "E0404" => ("not a statement", Structure),
                "E0405" => ("unsupported statement", Structure),
                "E0406" => ("unsupported callee", Structure),
                "E0407" => ("call arguments", Structure),

                // Runtime errors (E05xx)
                "E0500" => ("missing entry point", Runtime),
                "E0501" => ("entry point takes arguments", Runtime),
                "E0502" => ("output failure", Runtime),
                "E0503" => ("main returned a value", Runtime),

                // Backend errors (E06xx)
                "E0600" => ("missing entry point", Backend),
                "E0601" => ("unsupported by the assembly backend", Backend),
                "E0602" => ("assembler failed", Backend),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_prefix() {
        let registry = ErrorCodeRegistry::default();
        for info in registry.all() {
            let expected = match &info.code[..3] {
                "E00" | "E01" => ErrorCategory::Syntax,
                "E02" => ErrorCategory::Resolution,
                "E03" => ErrorCategory::Type,
                "E04" => ErrorCategory::Structure,
                "E05" => ErrorCategory::Runtime,
                "E06" => ErrorCategory::Backend,
                other => panic!("unexpected code prefix {}", other),
            };
            assert_eq!(info.category, expected, "{}", info.code);
        }
        assert_eq!(registry.get("E0303").map(|i| i.title), Some("expected u64"));
        assert!(registry.get("E9999").is_none());
    }
}
