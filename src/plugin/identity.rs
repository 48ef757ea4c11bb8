//! Test identity formatting

use crate::models::Case;

/// Reported name of a case: `module:Class.method`, or `module:Class.method-tag`
/// when `tag` is non-empty.
///
/// Names are not escaped, so a `:`, `.` or `-` inside a component makes the
/// result ambiguous to split back apart.
pub fn format_identity(case: &Case, tag: &str) -> String {
    let qualifier = if tag.is_empty() {
        case.method().to_string()
    } else {
        format!("{}-{}", case.method(), tag)
    };
    format!("{}:{}.{}", case.module(), case.class(), qualifier)
}
