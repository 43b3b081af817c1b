//! In-memory repository for tests

use chrono::Utc;
use kernel::id::{RoleId, UserId};
use platform::password::HashedPassword;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entity::{NewUser, Permission, RoleRecord, User, UserCredentials};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::{Email, Role};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Store {
    users: Vec<(User, HashedPassword)>,
    roles: Vec<RoleRecord>,
    role_permissions: Vec<(RoleId, Permission)>,
    user_permissions: Vec<(UserId, String)>,
}

/// Credential store and role registry backed by a `Vec`
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryAuthRepository {
    /// Repository with the four standard roles (ids 1..=4)
    pub fn seeded() -> Self {
        let repo = Self::default();
        if let Ok(mut store) = repo.store.lock() {
            let now = Utc::now();
            for (i, role) in Role::ALL.iter().enumerate() {
                store.roles.push(RoleRecord {
                    id: RoleId::new(i as i64 + 1),
                    role_name: role.as_str().to_string(),
                    description: None,
                    created_at: now,
                });
            }
        }
        repo
    }

    pub fn grant_role_permission(&self, role_id: RoleId, permission: &str) {
        if let Ok(mut store) = self.store.lock() {
            let id = store.role_permissions.len() as i64 + 1;
            store.role_permissions.push((
                role_id,
                Permission {
                    id,
                    permission_name: permission.to_string(),
                    description: None,
                },
            ));
        }
    }

    pub fn grant_user_permission(&self, user_id: UserId, permission: &str) {
        if let Ok(mut store) = self.store.lock() {
            store.user_permissions.push((user_id, permission.to_string()));
        }
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| AuthError::Internal("store lock poisoned".to_string()))
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut store = self.lock()?;
        if store.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(AuthError::EmailExists);
        }
        let role_name = store
            .roles
            .iter()
            .find(|r| r.id == user.role_id)
            .map(|r| r.role_name.clone())
            .ok_or_else(|| AuthError::Internal("unknown role id".to_string()))?;
        let role = Role::parse(&role_name)
            .ok_or_else(|| AuthError::Internal(format!("Unknown role: {role_name}")))?;

        let id = UserId::new(store.users.len() as i64 + 1);
        let now = Utc::now();
        store.users.push((
            User {
                id,
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                role,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            user.password_hash.clone(),
        ));
        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let store = self.lock()?;
        Ok(store
            .users
            .iter()
            .find(|(u, _)| u.is_active && &u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> AuthResult<Option<UserCredentials>> {
        let store = self.lock()?;
        Ok(store
            .users
            .iter()
            .find(|(u, _)| u.is_active && &u.email == email)
            .map(|(u, hash)| UserCredentials {
                user: u.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let store = self.lock()?;
        Ok(store
            .users
            .iter()
            .find(|(u, _)| u.is_active && u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &Email) -> AuthResult<bool> {
        let store = self.lock()?;
        Ok(store.users.iter().any(|(u, _)| &u.email == email))
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut store = self.lock()?;
        match store.users.iter_mut().find(|(u, _)| u.is_active && u.id == id) {
            Some((user, _)) => {
                user.is_active = false;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_role(&self, id: UserId, role_id: RoleId) -> AuthResult<bool> {
        let mut store = self.lock()?;
        let Some(role) = store
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .and_then(|r| Role::parse(&r.role_name))
        else {
            return Ok(false);
        };
        match store.users.iter_mut().find(|(u, _)| u.is_active && u.id == id) {
            Some((user, _)) => {
                user.role = role;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_all(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>> {
        let store = self.lock()?;
        let mut users: Vec<User> = store
            .users
            .iter()
            .filter(|(u, _)| u.is_active)
            .map(|(u, _)| u.clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

impl RoleRepository for MemoryAuthRepository {
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<RoleRecord>> {
        let store = self.lock()?;
        Ok(store.roles.iter().find(|r| r.role_name == name).cloned())
    }

    async fn find_by_id(&self, id: RoleId) -> AuthResult<Option<RoleRecord>> {
        let store = self.lock()?;
        Ok(store.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn get_all(&self) -> AuthResult<Vec<RoleRecord>> {
        Ok(self.lock()?.roles.clone())
    }

    async fn has_permission(&self, user_id: UserId, permission: &str) -> AuthResult<bool> {
        let store = self.lock()?;
        let direct = store
            .user_permissions
            .iter()
            .any(|(id, name)| *id == user_id && name == permission);
        if direct {
            return Ok(true);
        }
        let Some(role) = store
            .users
            .iter()
            .find(|(u, _)| u.is_active && u.id == user_id)
            .map(|(u, _)| u.role)
        else {
            return Ok(false);
        };
        Ok(store.roles.iter().any(|r| {
            r.role_name == role.as_str()
                && store
                    .role_permissions
                    .iter()
                    .any(|(id, p)| *id == r.id && p.permission_name == permission)
        }))
    }

    async fn create(&self, name: &str, description: Option<&str>) -> AuthResult<RoleId> {
        let mut store = self.lock()?;
        let id = RoleId::new(store.roles.len() as i64 + 1);
        store.roles.push(RoleRecord {
            id,
            role_name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_permissions_by_role(&self, role_id: RoleId) -> AuthResult<Vec<Permission>> {
        let store = self.lock()?;
        Ok(store
            .role_permissions
            .iter()
            .filter(|(id, _)| *id == role_id)
            .map(|(_, p)| p.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_roles_are_resolvable_by_name() {
        let repo = MemoryAuthRepository::seeded();
        let admin = RoleRepository::find_by_name(&repo, "admin").await.unwrap();
        assert_eq!(admin.map(|r| r.id), Some(RoleId::new(1)));
        assert!(RoleRepository::find_by_name(&repo, "ADMIN").await.unwrap().is_none());
        assert_eq!(RoleRepository::get_all(&repo).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_has_permission_checks_direct_and_role_grants() {
        let repo = MemoryAuthRepository::seeded();
        let hash = platform::password::ClearTextPassword::new("Admin@123".to_string())
            .unwrap()
            .hash()
            .unwrap();
        let id = UserRepository::create(
            &repo,
            &NewUser {
                full_name: crate::domain::value_object::FullName::new("Ada").unwrap(),
                email: Email::new("ada@example.com").unwrap(),
                password_hash: hash,
                role_id: RoleId::new(3),
            },
        )
        .await
        .unwrap();

        assert!(!repo.has_permission(id, "grades.write").await.unwrap());

        repo.grant_role_permission(RoleId::new(3), "grades.write");
        assert!(repo.has_permission(id, "grades.write").await.unwrap());

        repo.grant_user_permission(id, "reports.read");
        assert!(repo.has_permission(id, "reports.read").await.unwrap());
        assert_eq!(repo.get_permissions_by_role(RoleId::new(3)).await.unwrap().len(), 1);
    }
}
