pub type UserId = u64;

/// Stored credentials for one account. The password is only ever kept as a bcrypt hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}
