use crate::models::User;

/// Returns the first user whose username and password both match exactly.
pub fn authenticate<'a>(username: &str, password: &str, users: &'a [User]) -> Option<&'a User> {
    users.iter().find(|user| user.matches(username, password))
}
