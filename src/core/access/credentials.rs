use std::fmt;

/// Role attached to a session. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored secret and role for one username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    pub password: String,
    pub role: Role,
}

/// Lookup of known accounts by username.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<CredentialEntry>;
}

/// Fixed in-memory account list.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    accounts: Vec<(String, CredentialEntry)>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two accounts the tool ships with.
    pub fn builtin() -> Self {
        Self::new()
            .with_account("admin", "123", Role::Admin)
            .with_account("user", "123", Role::User)
    }

    pub fn with_account(mut self, username: &str, password: &str, role: Role) -> Self {
        self.accounts.retain(|(name, _)| name != username);
        self.accounts.push((
            username.to_string(),
            CredentialEntry {
                password: password.to_string(),
                role,
            },
        ));
        self
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, username: &str) -> Option<CredentialEntry> {
        self.accounts
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, entry)| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_accounts() {
        let store = StaticCredentialStore::builtin();

        assert_eq!(store.lookup("admin").map(|e| e.role), Some(Role::Admin));
        assert_eq!(store.lookup("user").map(|e| e.role), Some(Role::User));
        assert!(store.lookup("Admin").is_none());
        assert!(store.lookup("").is_none());
    }

    #[test]
    fn test_with_account_replaces_existing() {
        let store = StaticCredentialStore::builtin().with_account("user", "secret", Role::Admin);
        let entry = store.lookup("user").unwrap();

        assert_eq!(entry.password, "secret");
        assert_eq!(entry.role, Role::Admin);
    }
}
