//! Deterministic symbol naming.
//!
//! Generated symbols derive from the service and method identifiers with
//! every non-alphanumeric character normalized to `_`, so two distinct
//! services cannot collide and regeneration is stable.

/// Normalize an identifier for use in generated symbol names.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// SCREAMING_SNAKE form for generated constants.
pub fn upper(raw: &str) -> String {
    sanitize(raw).to_ascii_uppercase()
}

/// PascalCase form for generated trait names.
pub fn pascal(raw: &str) -> String {
    sanitize(raw)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_normalizes_non_alphanumerics() {
        assert_eq!(sanitize("echo"), "echo");
        assert_eq!(sanitize("com.example.widgetd"), "com_example_widgetd");
        assert_eq!(sanitize("My-Svc"), "my_svc");
        assert_eq!(sanitize("1st"), "_1st");
        assert_eq!(sanitize(""), "_");
    }

    #[test]
    fn upper_and_pascal_forms() {
        assert_eq!(upper("com.example"), "COM_EXAMPLE");
        assert_eq!(pascal("com.example"), "ComExample");
        assert_eq!(pascal("echo"), "Echo");
    }

    #[test]
    fn distinct_services_stay_distinct() {
        assert_ne!(sanitize("a.b"), sanitize("a.c"));
        // Normalization can merge spellings, but only within one service's
        // own namespace.
        assert_eq!(sanitize("a.b"), sanitize("a-b"));
    }
}
