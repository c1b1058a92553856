/// Check the hidden trap field. Returns true if spam detected.
pub fn is_spam(trap: Option<&str>) -> bool {
    trap.is_some_and(|s| !s.trim().is_empty())
}
