use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{QueueError, Result};

/// A user account. The password hash never leaves this module's store;
/// wire types carry the other fields.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_approved: bool,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User accounts, keyed by id, with email uniqueness enforced on signup.
#[derive(Debug, Default)]
pub struct Directory {
    profiles: HashMap<Uuid, Profile>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account. New users start as unapproved machinists
    /// until an admin lets them in.
    pub fn create_user(
        &mut self,
        email: &str,
        full_name: &str,
        password_hash: String,
    ) -> Result<Profile> {
        self.insert_user(email, full_name, password_hash, Role::Machinist, false)
    }

    /// Seed an approved admin account. Used at startup when the directory
    /// is empty.
    pub fn create_admin(
        &mut self,
        email: &str,
        full_name: &str,
        password_hash: String,
    ) -> Result<Profile> {
        self.insert_user(email, full_name, password_hash, Role::Admin, true)
    }

    fn insert_user(
        &mut self,
        email: &str,
        full_name: &str,
        password_hash: String,
        role: Role,
        is_approved: bool,
    ) -> Result<Profile> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(QueueError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if self.find_by_email(&email).is_some() {
            return Err(QueueError::Validation(format!(
                "An account already exists for {}",
                email
            )));
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            email,
            full_name: full_name.trim().to_string(),
            role,
            is_approved,
            password_hash,
            created_at: Utc::now(),
        };
        self.profiles.insert(profile.id, profile.clone());
        tracing::info!(user_id = %profile.id, role = %profile.role, "User registered");
        Ok(profile)
    }

    pub fn get(&self, id: &Uuid) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Profile> {
        let email = email.trim().to_lowercase();
        self.profiles.values().find(|p| p.email == email)
    }

    /// All accounts, newest first. Admin panel listing.
    pub fn list(&self) -> Vec<Profile> {
        let mut users: Vec<Profile> = self.profiles.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        users
    }

    /// id → display name map for resolving claimants in progress views.
    pub fn display_names(&self) -> HashMap<Uuid, String> {
        self.profiles
            .values()
            .map(|p| (p.id, p.full_name.clone()))
            .collect()
    }

    pub fn set_password_hash(&mut self, id: &Uuid, password_hash: String) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or(QueueError::UserNotFound(*id))?;
        profile.password_hash = password_hash;
        Ok(())
    }

    /// Approve or revoke an account. Admin accounts are off limits here.
    pub fn set_approval(&mut self, id: &Uuid, approved: bool) -> Result<Profile> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or(QueueError::UserNotFound(*id))?;
        if profile.role == Role::Admin {
            return Err(QueueError::Forbidden(
                "admin accounts cannot be modified".to_string(),
            ));
        }
        profile.is_approved = approved;
        tracing::info!(user_id = %id, approved, "User approval changed");
        Ok(profile.clone())
    }

    /// Change an account's role. Admin accounts are off limits here.
    pub fn set_role(&mut self, id: &Uuid, role: Role) -> Result<Profile> {
        let profile = self
            .profiles
            .get_mut(id)
            .ok_or(QueueError::UserNotFound(*id))?;
        if profile.role == Role::Admin {
            return Err(QueueError::Forbidden(
                "admin accounts cannot be modified".to_string(),
            ));
        }
        profile.role = role;
        tracing::info!(user_id = %id, role = %role, "User role changed");
        Ok(profile.clone())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_defaults_to_unapproved_machinist() {
        let mut dir = Directory::new();
        let p = dir
            .create_user("dana@shop.example", "Dana", "hash".to_string())
            .unwrap();
        assert_eq!(p.role, Role::Machinist);
        assert!(!p.is_approved);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut dir = Directory::new();
        dir.create_user("dana@shop.example", "Dana", "hash".to_string())
            .unwrap();
        let err = dir.create_user("Dana@Shop.Example", "Other", "hash".to_string());
        assert!(err.is_err());
    }

    #[test]
    fn admin_accounts_resist_approval_and_role_edits() {
        let mut dir = Directory::new();
        let admin = dir
            .create_admin("boss@shop.example", "Boss", "hash".to_string())
            .unwrap();
        assert!(dir.set_approval(&admin.id, false).is_err());
        assert!(dir.set_role(&admin.id, Role::Machinist).is_err());
    }

    #[test]
    fn approval_flips_for_regular_users() {
        let mut dir = Directory::new();
        let p = dir
            .create_user("dana@shop.example", "Dana", "hash".to_string())
            .unwrap();
        let updated = dir.set_approval(&p.id, true).unwrap();
        assert!(updated.is_approved);
        let updated = dir.set_approval(&p.id, false).unwrap();
        assert!(!updated.is_approved);
    }
}
