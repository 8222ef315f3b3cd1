//! Pure input predicates used to gate wizard progression.

/// Punctuation characters accepted as the "special character" class.
pub const PASSWORD_PUNCTUATION: &str = "!@#$%^&*()_+=-";

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Returns `true` iff `candidate` has at least [`MIN_PASSWORD_LEN`] characters and contains
/// at least one ASCII uppercase letter, one ASCII lowercase letter, one ASCII digit and one
/// character from [`PASSWORD_PUNCTUATION`].
///
/// No normalization is applied and the checks are not locale sensitive.
pub fn is_password_strong(candidate: &str) -> bool {
    if candidate.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }

    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut punct = false;
    for c in candidate.chars() {
        upper |= c.is_ascii_uppercase();
        lower |= c.is_ascii_lowercase();
        digit |= c.is_ascii_digit();
        punct |= PASSWORD_PUNCTUATION.contains(c);
    }

    upper && lower && digit && punct
}

/// Blank means empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Conjunction of non-blank checks over every required field.
pub fn is_step_complete(required_fields: &[&str]) -> bool {
    required_fields.iter().all(|field| !is_blank(field))
}
