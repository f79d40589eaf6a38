//! Identity snapshot consumed by the auth flows.
//!
//! The user profile itself is owned by another part of the platform; auth
//! only reads the fields it needs to issue and validate tokens.

use serde::{Deserialize, Serialize};

/// Platform role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Client,
    Driver,
    Operator,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Driver => "DRIVER",
            Role::Operator => "OPERATOR",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CLIENT" => Some(Role::Client),
            "DRIVER" => Some(Role::Driver),
            "OPERATOR" => Some(Role::Operator),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Role::Client => 0,
            Role::Driver => 1,
            Role::Operator => 2,
            Role::Manager => 3,
            Role::Admin => 4,
        }
    }

    /// Whether holding `self` grants everything `other` grants.
    ///
    /// The hierarchy is a straight chain:
    /// ADMIN > MANAGER > OPERATOR > DRIVER > CLIENT.
    pub fn implies(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }
}

/// The slice of a user record the auth flows read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSubject {
    pub user_id: i64,
    /// Normalized E.164 phone number, the login identifier
    pub phone: String,
    pub roles: Vec<Role>,
    /// Monotonic counter compared against the `ver` claim
    pub token_version: i64,
    pub is_active: bool,
    pub is_blocked: bool,
}

impl AuthSubject {
    /// Whether any held role satisfies `required`
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.implies(required))
    }

    /// Role names in claim form
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.as_str().to_string()).collect()
    }

    /// Whether this subject may authenticate at all
    pub fn can_authenticate(&self) -> bool {
        self.is_active && !self.is_blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(roles: Vec<Role>) -> AuthSubject {
        AuthSubject {
            user_id: 42,
            phone: "+998901234567".to_string(),
            roles,
            token_version: 1,
            is_active: true,
            is_blocked: false,
        }
    }

    #[test]
    fn test_hierarchy_is_a_chain() {
        assert!(Role::Admin.implies(Role::Client));
        assert!(Role::Manager.implies(Role::Operator));
        assert!(Role::Operator.implies(Role::Driver));
        assert!(!Role::Driver.implies(Role::Operator));
        assert!(!Role::Client.implies(Role::Driver));
        assert!(Role::Driver.implies(Role::Driver));
    }

    #[test]
    fn test_has_role_uses_implication() {
        let manager = subject(vec![Role::Manager]);
        assert!(manager.has_role(Role::Operator));
        assert!(manager.has_role(Role::Client));
        assert!(!manager.has_role(Role::Admin));
    }

    #[test]
    fn test_blocked_subject_cannot_authenticate() {
        let mut user = subject(vec![Role::Client]);
        assert!(user.can_authenticate());
        user.is_blocked = true;
        assert!(!user.can_authenticate());
        user.is_blocked = false;
        user.is_active = false;
        assert!(!user.can_authenticate());
    }

    #[test]
    fn test_role_names_in_claim_form() {
        let user = subject(vec![Role::Driver, Role::Client]);
        assert_eq!(user.role_names(), vec!["DRIVER", "CLIENT"]);
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::Client, Role::Driver, Role::Operator, Role::Manager, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("ROOT"), None);
    }
}
