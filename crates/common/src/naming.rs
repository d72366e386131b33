//! Identifier normalization for generated source

/// Convert a protobuf name to a PascalCase (or camelCase) identifier.
///
/// Word boundaries are any character that is not an ASCII letter or digit;
/// those characters are dropped, except `.` when `preserve_period` is set.
/// A digit also capitalizes the letter that follows it.
///
/// Examples:
/// - `("my_pkg.sub_pkg", true, true)` -> `"MyPkg.SubPkg"`
/// - `("test_msg", true, false)` -> `"TestMsg"`
/// - `("FooBar", false, false)` -> `"fooBar"`
pub fn underscores_to_camel_case(input: &str, cap_next_letter: bool, preserve_period: bool) -> String {
    let mut result = String::with_capacity(input.len());
    let mut cap_next = cap_next_letter;

    for (i, ch) in input.chars().enumerate() {
        if ch.is_ascii_lowercase() {
            if cap_next {
                result.push(ch.to_ascii_uppercase());
            } else {
                result.push(ch);
            }
            cap_next = false;
        } else if ch.is_ascii_uppercase() {
            if i == 0 && !cap_next {
                result.push(ch.to_ascii_lowercase());
            } else {
                result.push(ch);
            }
            cap_next = false;
        } else if ch.is_ascii_digit() {
            result.push(ch);
            cap_next = true;
        } else {
            cap_next = true;
            if ch == '.' && preserve_period {
                result.push('.');
            }
        }
    }

    if input.ends_with('#') {
        result.push('_');
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) && input.starts_with('_') {
        result.insert(0, '_');
    }

    result
}

/// Go identifier for a message name relative to its proto package, using the
/// same rules as protoc-gen-go so the result names the generated struct.
///
/// - `TestRsp.TransformInfo` -> `TestRsp_TransformInfo`
/// - `login_req` -> `LoginReq`
/// - `_hidden` -> `XHidden`
pub fn go_camel_case(input: &str) -> String {
    let bytes = input.as_bytes();
    let lower_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_lowercase);

    let mut result = String::with_capacity(input.len() + 1);
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            // `.` before a lowercase letter is dropped, otherwise it becomes `_`
            b'.' if lower_at(i + 1) => {}
            b'.' => result.push('_'),
            b'_' if i == 0 || bytes[i - 1] == b'.' => result.push('X'),
            b'_' if lower_at(i + 1) => {}
            c if c.is_ascii_digit() => result.push(char::from(c)),
            c => {
                result.push(char::from(c.to_ascii_uppercase()));
                while lower_at(i + 1) {
                    i += 1;
                    result.push(char::from(bytes[i]));
                }
            }
        }
        i += 1;
    }

    result
}

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Make `input` usable as a Go package name
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit or a
/// keyword gets a `_` prefix.
pub fn go_sanitized(input: &str) -> String {
    let mut result: String = input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if result.is_empty()
        || result.starts_with(|c: char| c.is_ascii_digit())
        || GO_KEYWORDS.contains(&result.as_str())
    {
        result.insert(0, '_');
    }

    result
}
