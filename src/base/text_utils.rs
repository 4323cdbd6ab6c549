//! Identifier and literal text utilities.

/// Check if a character may start a JVM identifier.
///
/// Uses Unicode Standard Annex #31 rules plus `_` and `$`, which both
/// Java and Kotlin allow.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    unicode_ident::is_xid_start(c) || c == '_' || c == '$'
}

/// Check if a character is considered part of an identifier.
#[inline]
pub fn is_identifier_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || c == '$'
}

/// Check whether `text` is a single identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_character),
        _ => false,
    }
}

/// Lowercase the first character.
///
/// ```
/// use remap::base::text_utils::decapitalize;
///
/// assert_eq!(decapitalize("AMethod"), "aMethod");
/// assert_eq!(decapitalize("URL"), "uRL");
/// ```
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase a leading run of capitals, keeping the start of the next word.
///
/// `URLConnection` becomes `urlConnection`, `URL` becomes `url` and `Foo`
/// becomes `foo`. Only ASCII letters are considered.
pub fn decapitalize_smart(name: &str) -> String {
    let bytes = name.as_bytes();
    let is_upper = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_uppercase);

    if !is_upper(0) {
        return name.to_string();
    }
    if bytes.len() == 1 || !is_upper(1) {
        return decapitalize(name);
    }

    match (0..bytes.len()).find(|&i| !is_upper(i)) {
        None => name.to_ascii_lowercase(),
        Some(second_word_start) => {
            let split = second_word_start - 1;
            let mut result = name[..split].to_ascii_lowercase();
            result.push_str(&name[split..]);
            result
        }
    }
}

/// Name of the Kotlin synthetic property backed by a getter called `name`.
///
/// `getFoo` maps to `foo`, `isFoo` keeps its name, anything else (including
/// `getter` and bare `get`) is not getter-shaped.
///
/// ```
/// use remap::base::text_utils::property_name_from_getter;
///
/// assert_eq!(property_name_from_getter("getSyntheticB").as_deref(), Some("syntheticB"));
/// assert_eq!(property_name_from_getter("isSyntheticBooleanB").as_deref(), Some("isSyntheticBooleanB"));
/// assert_eq!(property_name_from_getter("getterB"), None);
/// ```
pub fn property_name_from_getter(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("is") {
        return starts_non_lowercase(rest).then(|| name.to_string());
    }
    let rest = name.strip_prefix("get")?;
    starts_non_lowercase(rest).then(|| decapitalize_smart(rest))
}

fn starts_non_lowercase(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| is_identifier_character(c) && !c.is_lowercase())
}

/// Target member implied by a Mixin accessor or invoker method name.
///
/// `invokeFoo` implies `foo`, `isFoo`/`getFoo`/`setFoo` imply `foo`.
pub fn accessor_target(method_name: &str) -> Option<String> {
    let rest = if let Some(rest) = method_name.strip_prefix("invoke") {
        rest
    } else if let Some(rest) = method_name.strip_prefix("is") {
        rest
    } else if let Some(rest) = method_name
        .strip_prefix("get")
        .or_else(|| method_name.strip_prefix("set"))
    {
        rest
    } else {
        return None;
    };
    Some(decapitalize(rest))
}

/// Escape a value for use inside a Java string literal.
pub fn escape_string(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            other => result.push(other),
        }
    }
    result
}

/// Value of a double-quoted string literal, with simple escapes decoded.
///
/// Returns `None` if `literal` is not a string literal.
pub fn string_literal_value(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next()? {
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            other => result.push(other),
        }
    }
    Some(result)
}

/// Last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit_once('.')
        .map_or(qualified, |(_, simple)| simple)
}
