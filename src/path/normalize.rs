use crate::path::PathError;

/// Normalizes a raw request or registration path: trims a trailing slash
/// (except for the root `/`), collapses repeated slashes and rejects
/// anything outside the conservative character set the route engine
/// understands.
#[inline]
#[tracing::instrument(level = "trace", skip(path), fields(path_len = path.len() as u64))]
pub fn normalize_and_validate_path(path: &str) -> Result<String, PathError> {
    if !path.is_ascii() {
        return Err(PathError::NonAscii {
            input: path.to_string(),
        });
    }
    let bytes = path.as_bytes();
    if bytes.is_empty() {
        return Err(PathError::Empty);
    }
    if bytes[0] != b'/' {
        return Err(PathError::MissingLeadingSlash {
            input: path.to_string(),
        });
    }

    let mut end = bytes.len();
    while end > 1 && bytes[end - 1] == b'/' {
        end -= 1;
    }

    for &b in &bytes[..end] {
        if b <= 0x20 {
            return Err(PathError::ControlOrWhitespace {
                input: path.to_string(),
                byte: b,
            });
        }
        match b {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-'
            | b'.'
            | b'_'
            | b'~'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
            | b':'
            | b'@'
            | b'/'
            | b'%'
            | b'<'
            | b'>' => {}
            _ => {
                return Err(PathError::DisallowedCharacter {
                    input: path.to_string(),
                    character: b as char,
                    byte: b,
                });
            }
        }
    }

    let mut normalized = if end == bytes.len() {
        path.to_string()
    } else {
        path[..end].to_string()
    };

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    if normalized == "/.." || normalized.starts_with("/../") || normalized.contains("/../") {
        return Err(PathError::InvalidParentTraversal {
            input: path.to_string(),
            normalized,
        });
    }

    Ok(normalized)
}

/// Splits a normalized path into its non-empty segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_but_keeps_root() {
        assert_eq!(normalize_and_validate_path("/users/").unwrap(), "/users");
        assert_eq!(normalize_and_validate_path("/").unwrap(), "/");
    }

    #[test]
    fn collapses_duplicate_slashes() {
        assert_eq!(normalize_and_validate_path("/a//b").unwrap(), "/a/b");
    }

    #[test]
    fn rejects_missing_leading_slash() {
        assert!(normalize_and_validate_path("users").is_err());
    }

    #[test]
    fn rejects_parent_traversal() {
        assert!(normalize_and_validate_path("/a/../b").is_err());
    }

    #[test]
    fn splits_into_segments() {
        assert_eq!(split_segments("/users/:id"), vec!["users", ":id"]);
        assert_eq!(split_segments("/"), Vec::<&str>::new());
    }
}
