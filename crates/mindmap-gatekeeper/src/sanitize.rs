//! Filename sanitisation for generated text

/// Default maximum length of a sanitised name, in characters
pub const MAX_FILENAME_LENGTH: usize = 50;

/// Substitute used when nothing survives sanitisation
pub const FALLBACK_NAME: &str = "unnamed";

/// Prefix applied to names that collide with reserved device names
pub const RESERVED_PREFIX: &str = "file-";

/// Windows device names, matched case-insensitively
pub const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitise untrusted text into a flat, portable file name
///
/// Uses [`MAX_FILENAME_LENGTH`]. See [`sanitize_filename_with_limit`].
///
/// # Examples
///
/// ```
/// use mindmap_gatekeeper::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etc-passwd");
/// assert_eq!(sanitize_filename("CON"), "file-con");
/// assert_eq!(sanitize_filename("Launch Strategy: Phase 1"), "launch-strategy-phase-1");
/// assert_eq!(sanitize_filename("..."), "unnamed");
/// ```
pub fn sanitize_filename(raw: &str) -> String {
    sanitize_filename_with_limit(raw, MAX_FILENAME_LENGTH)
}

/// Sanitise untrusted text into a flat, portable file name of at most
/// `max_length` characters (plus [`RESERVED_PREFIX`] when one is applied)
///
/// Rules, in order:
/// 1. path separators and whitespace become `-`
/// 2. control characters are removed
/// 3. letters and digits (any script) are lowercased and kept, as are `-` and `_`;
///    everything else, including every `.`, is removed
/// 4. runs of `-` collapse to one; leading and trailing `-` are trimmed
/// 5. the result is truncated, then trailing `-` trimmed again
/// 6. an empty result becomes [`FALLBACK_NAME`]
/// 7. a reserved device name gets [`RESERVED_PREFIX`]
pub fn sanitize_filename_with_limit(raw: &str, max_length: usize) -> String {
    let mut mapped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '/' || c == '\\' || c.is_whitespace() {
            mapped.push('-');
        } else if c.is_control() {
            continue;
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            mapped.extend(c.to_lowercase());
        }
    }

    let collapsed = collapse_hyphens(&mapped);
    let truncated: String = collapsed
        .trim_matches('-')
        .chars()
        .take(max_length)
        .collect();
    let name = truncated.trim_end_matches('-');

    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    if is_reserved(name) {
        format!("{}{}", RESERVED_PREFIX, name)
    } else {
        name.to_string()
    }
}

fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_hyphen = false;
    for c in s.chars() {
        if c == '-' {
            if !previous_hyphen {
                out.push(c);
            }
            previous_hyphen = true;
        } else {
            out.push(c);
            previous_hyphen = false;
        }
    }
    out
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}
