/// Replaces every escaped `\n` (a backslash followed by `n`) with a real
/// line break.
///
/// Scripts and REPL lines may write multi-line programs on one physical
/// line this way.
///
/// # Example
/// ```
/// use kmsl::util::source::normalize;
///
/// assert_eq!(normalize(r"x = 1\nprint x"), "x = 1\nprint x");
/// assert_eq!(normalize("no escapes"), "no escapes");
/// ```
#[must_use]
pub fn normalize(source: &str) -> String {
    source.replace("\\n", "\n")
}
