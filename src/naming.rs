//! Component name to element tag conversion

/// Convert a mixed-case component name into a dashed element name
///
/// A dash is inserted only where an uppercase letter directly follows a
/// lowercase letter or digit, and the result is lower-cased. Runs of
/// capitals are therefore never split internally:
///
/// ```rust
/// use fragment_kit::to_element_name;
///
/// assert_eq!(to_element_name("todoList"), "todo-list");
/// assert_eq!(to_element_name("fooHTTP"), "foo-http");
/// assert_eq!(to_element_name("fooHTTPbar"), "foo-httpbar");
/// assert_eq!(to_element_name("HTMLParser"), "htmlparser");
/// ```
pub fn to_element_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c.is_uppercase() {
            if let Some(p) = prev {
                if p.is_lowercase() || p.is_ascii_digit() {
                    out.push('-');
                }
            }
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out
}
