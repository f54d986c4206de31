/// Characters that are not allowed in a mirrored file path
const DISALLOWED_PATH_CHARS: [char; 4] = [':', '?', '*', '"'];

/// Path separators that must not appear inside a single component
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Replace characters that are unsafe in a filesystem path with `_`
pub fn sanitize_path(path: &str) -> String {
    path.replace(DISALLOWED_PATH_CHARS, "_")
}

/// Turn `name` into exactly one path component.
///
/// Separators become `_`, and names that would resolve to the current or
/// parent directory are replaced by underscores of the same length.
pub fn sanitize_component(name: &str) -> String {
    let component = sanitize_path(name).replace(PATH_SEPARATORS, "_");
    match component.trim() {
        "" => "_".to_string(),
        "." | ".." => "_".repeat(component.trim().len()),
        _ => component,
    }
}
