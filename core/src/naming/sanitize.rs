/// Characters never allowed in a generated name or path component
///
/// Shell metacharacters plus the DICOM person-name and multi-value
/// separators (`^`, `,`).
const UNSAFE_CHARS: &[char] = &['&', '<', '>', '\'', '^', '/', '\\', '"', ','];

/// Subset stripped in final passes; commas have been handled by then
const RESERVED_CHARS: &[char] = &['&', '<', '>', '\'', '^', '/', '\\', '"'];

fn is_unsafe(c: char) -> bool {
    c.is_whitespace() || UNSAFE_CHARS.contains(&c)
}

/// Replaces each run of whitespace or unsafe characters with one underscore
///
/// Used for subject names, where separators carry structure worth keeping
/// as a visible boundary: `Doe^John` becomes `Doe_John`.
pub fn underscore_unsafe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if is_unsafe(c) {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn delete_then_collapse(s: &str, delete: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if delete.contains(&c) {
            continue;
        }
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Deletes unsafe characters, then collapses whitespace runs to underscores
///
/// Used for series descriptions, where separators are noise rather than
/// structure: `t1 se, tra` becomes `t1_se_tra`.
pub fn sanitize_description(s: &str) -> String {
    delete_then_collapse(s, UNSAFE_CHARS)
}

/// Like [`sanitize_description`] but keeps commas
///
/// Used for the region/exam halves of a study description after the caret
/// split.
pub fn sanitize_path_component(s: &str) -> String {
    delete_then_collapse(s, RESERVED_CHARS)
}

/// Removes any remaining reserved characters from a fully assembled name
///
/// Last line of defense for fields that never went through a sanitizer.
pub fn strip_reserved(s: &str) -> String {
    s.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect()
}
