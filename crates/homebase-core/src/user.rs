use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, HomebaseError};
use crate::search::matches_term;

pub const SEED_ADMIN_ID: &str = "admin001";
pub const SEED_USER_ID: &str = "user001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const ALL: &[Role] = &[Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    // Session records written by older clients carry no timestamp.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Required by the account form but never persisted.
    #[serde(default)]
    pub password: Option<String>,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", self.password.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        if let Some(ref name) = self.name {
            require("name", name)?;
        }
        if let Some(ref email) = self.email {
            require("email", email)?;
        }
        Ok(())
    }
}

impl User {
    /// Return a copy with every field present in `update` overwritten.
    pub fn patched(&self, update: &UpdateUser) -> User {
        let mut next = self.clone();
        if let Some(ref name) = update.name {
            next.name = name.clone();
        }
        if let Some(ref email) = update.email {
            next.email = email.clone();
        }
        if let Some(role) = update.role {
            next.role = role;
        }
        next
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
}

/// Users matching `filter`, newest account first.
pub fn filter_users(users: &[User], filter: &UserFilter) -> Vec<User> {
    let mut out: Vec<User> = users
        .iter()
        .filter(|u| matches_term(filter.search.as_deref(), &[&u.name, &u.email]))
        .filter(|u| filter.role.map_or(true, |r| u.role == r))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// The seed accounts as every context sees them before `users` is first
/// written. Stamped at the Unix epoch so the default is identical everywhere.
pub fn default_users() -> Vec<User> {
    seed_users(DateTime::<Utc>::default())
}

/// The seed accounts, stamped with `now`.
pub fn seed_users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        User {
            id: SEED_ADMIN_ID.into(),
            name: "Admin User".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
            created_at: now,
        },
        User {
            id: SEED_USER_ID.into(),
            name: "Regular User".into(),
            email: "user@example.com".into(),
            role: Role::User,
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn user(id: &str, name: &str, role: Role, age_days: i64) -> User {
        User {
            id: id.into(),
            name: name.into(),
            email: format!("{id}@example.com"),
            role,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn role_parse_str_round_trip() {
        for r in Role::ALL {
            assert_eq!(Role::parse_str(r.as_str()), Some(*r));
        }
        assert_eq!(Role::parse_str("root"), None);
    }

    #[test]
    fn user_serializes_with_camel_case_keys() {
        let u = user("u1", "Ann", Role::Admin, 0);
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn session_record_without_timestamp_still_parses() {
        let u: User = serde_json::from_str(
            r#"{"id":"admin001","name":"Admin User","email":"admin@example.com","role":"admin"}"#,
        )
        .unwrap();
        assert!(u.is_admin());
    }

    #[test]
    fn create_user_requires_name_email_and_password() {
        let mut input = CreateUser {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            role: Role::User,
            password: Some("secret".into()),
        };
        assert!(input.validate().is_ok());

        input.password = None;
        assert_eq!(
            input.validate(),
            Err(HomebaseError::Validation("password is required".into()))
        );

        input.password = Some("secret".into());
        input.email = " ".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn patched_overwrites_only_present_fields() {
        let u = user("u1", "Ann", Role::User, 0);
        let next = u.patched(&UpdateUser {
            role: Some(Role::Admin),
            ..Default::default()
        });
        assert_eq!(next.role, Role::Admin);
        assert_eq!(next.name, "Ann");
        assert_eq!(next.created_at, u.created_at);
    }

    #[test]
    fn filter_users_by_search_and_role_newest_first() {
        let users = vec![
            user("a", "Alice Admin", Role::Admin, 3),
            user("b", "Bob", Role::User, 2),
            user("c", "Carol", Role::User, 1),
        ];

        let all = filter_users(&users, &UserFilter::default());
        let ids: Vec<&str> = all.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);

        let regular = filter_users(
            &users,
            &UserFilter {
                role: Some(Role::User),
                ..Default::default()
            },
        );
        assert_eq!(regular.len(), 2);

        let by_email = filter_users(
            &users,
            &UserFilter {
                search: Some("B@EXAMPLE".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id, "b");
    }

    #[test]
    fn seed_users_contains_one_admin_and_one_user() {
        let seeded = seed_users(Utc::now());
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].id, SEED_ADMIN_ID);
        assert!(seeded[0].is_admin());
        assert_eq!(seeded[1].id, SEED_USER_ID);
        assert_eq!(seeded[1].role, Role::User);
    }

    #[test]
    fn default_users_are_stable_across_calls() {
        let first = default_users();
        assert_eq!(first, default_users());
        assert_eq!(first[0].created_at.timestamp(), 0);
    }
}
