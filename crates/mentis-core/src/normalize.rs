//! Field normalization helpers.
//!
//! Tagged raw forms are inconsistent across layouts (line breaks inside
//! names, hyphenation artifacts, "version"/"v." noise in version fields);
//! these pure functions regularize them. Name normalization is policy, not
//! mechanism: the pipeline takes any `Fn(&str) -> String` and
//! [`normalize_name`] is only the default.

/// Replace newlines by spaces and collapse runs of whitespace.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Default software-name normalization: whitespace collapse, then removal
/// of hyphens joining two alphanumeric characters (line-break hyphenation
/// and spelling variants: "scikit-learn" and "scikitlearn" unify).
pub fn normalize_name(name: &str) -> String {
    let collapsed = collapse_whitespace(name);
    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '-'
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_alphanumeric()
            && chars[i + 1].is_alphanumeric()
        {
            continue;
        }
        out.push(c);
    }
    out
}

/// Strip the non-variable "version"/"v." markers from a version field and
/// collapse whitespace, keeping only the number itself.
pub fn normalize_version(version: &str) -> String {
    let collapsed = collapse_whitespace(version);
    for prefix in ["version", "ver.", "ver", "v.", "v"] {
        let matches = collapsed
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix));
        if !matches {
            continue;
        }
        let rest = &collapsed[prefix.len()..];
        // require a boundary so "5" in "v5" strips but "vim" stays intact
        let boundary = rest.chars().next().map_or(false, |c| {
            c.is_whitespace() || c.is_ascii_digit() || c == '.'
        });
        if boundary {
            return rest.trim().to_string();
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("Microsoft\n Excel"), "Microsoft Excel");
        assert_eq!(collapse_whitespace("  SPSS   Statistics  "), "SPSS Statistics");
        assert_eq!(collapse_whitespace("R"), "R");
    }

    #[test]
    fn test_normalize_name_strips_inner_hyphens() {
        assert_eq!(normalize_name("scikit-learn"), "scikitlearn");
        assert_eq!(normalize_name("Image-J"), "ImageJ");
        // a dangling hyphen is not a join
        assert_eq!(normalize_name("R -"), "R -");
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("version 3.4"), "3.4");
        assert_eq!(normalize_version("v. 2.0"), "2.0");
        assert_eq!(normalize_version("v5"), "5");
        assert_eq!(normalize_version("3.4"), "3.4");
        assert_eq!(normalize_version("vim"), "vim");
    }
}
