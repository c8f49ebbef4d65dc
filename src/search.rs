use crate::model::User;

/// Users whose name or email contains `query`, ignoring case. An empty query
/// keeps every user. Order follows `users`.
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    if query.is_empty() {
        return users.to_vec();
    }
    let q = query.to_lowercase();
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&q) || u.email.to_lowercase().contains(&q))
        .cloned()
        .collect()
}
