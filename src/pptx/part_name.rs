//! Part name arithmetic.
//!
//! Part names are zip entry names without a leading slash, e.g.
//! `ppt/slides/slide1.xml`. Relationship targets are relative to the
//! directory of the part that owns the relationship.

/// Directory portion of a part name, without trailing slash.
fn directory(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Collapse `.` and `..` segments.
fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

/// Resolve a relationship target against the part that owns it.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let base = directory(source_part);
    normalize(base.split('/').chain(target.split('/')))
}

/// The relationships part that belongs to `part`.
///
/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Relative target that reaches `to_part` from a relationship owned by `from_part`.
pub(crate) fn relative_target(from_part: &str, to_part: &str) -> String {
    let from: Vec<&str> = directory(from_part)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = to_part.split('/').collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count()
        // The file name itself is never a shared directory
        .min(to.len().saturating_sub(1));

    let mut segments: Vec<&str> = vec![".."; from.len() - common];
    segments.extend(&to[common..]);
    segments.join("/")
}
