//! User record and input validation helpers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Largest id handed out by [`random_user_id`] (inclusive).
pub const MAX_USER_ID: u32 = 1000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern compiles")
});

/// A single roster entry. Equality is structural over all fields, so two
/// users with the same id, name and email are interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Build a user with a fresh id from [`random_user_id`].
    pub fn with_random_id(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(random_user_id(), name, email)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Random id in `0..=MAX_USER_ID`. Ids are not unique across users.
pub fn random_user_id() -> u32 {
    // A v4 uuid carries 122 random bits from the OS generator; the crate is
    // already used for ids, so it doubles as the random source here.
    let entropy = uuid::Uuid::new_v4().as_u128();
    (entropy % (MAX_USER_ID as u128 + 1)) as u32
}

/// True when the input is empty or whitespace only.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

pub fn is_valid_email(input: &str) -> bool {
    !is_blank(input) && EMAIL_PATTERN.is_match(input)
}
