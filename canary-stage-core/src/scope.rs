//! Decides whether a manifest row takes part in the current run.

/// Literals (compared case-insensitively) that mark a row as in scope.
pub const IN_SCOPE_VALUES: [&str; 2] = ["true", "yes"];

/// `true` only for `true`/`yes` in any casing. A missing column counts as out of scope.
pub fn is_in_scope(raw: Option<&str>) -> bool {
    let value = raw.unwrap_or("False").to_lowercase();
    IN_SCOPE_VALUES.contains(&value.as_str())
}
