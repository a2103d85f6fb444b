use super::admin::{Admin, RouteGrant, WILDCARD_ROUTE};
use super::error::AuthError;
use super::repository::{AdminRepository, GrantRepository};
use async_trait::async_trait;
use sled::Db;
use std::path::Path;

const ADMINS_TREE: &str = "admins";
const ADMINS_BY_USERNAME_TREE: &str = "admins_by_username";
const GRANTS_TREE: &str = "route_grants";

const GRANT_KEY_SEPARATOR: u8 = 0;

#[derive(Clone)]
pub struct SledAdminRepository {
    db: Db,
}

impl SledAdminRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn admins_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ADMINS_TREE)?)
    }

    fn admins_by_username_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ADMINS_BY_USERNAME_TREE)?)
    }
}

#[async_trait]
impl AdminRepository for SledAdminRepository {
    async fn create(&self, admin: Admin) -> Result<Admin, AuthError> {
        if self.username_exists(&admin.username).await? {
            return Err(AuthError::AdminAlreadyExists);
        }

        let admins_tree = self.admins_tree()?;
        let username_tree = self.admins_by_username_tree()?;

        let admin_json = serde_json::to_vec(&admin)?;

        admins_tree.insert(admin.id.as_bytes(), admin_json)?;
        username_tree.insert(admin.username.as_bytes(), admin.id.as_bytes())?;

        Ok(admin)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AuthError> {
        let username_tree = self.admins_by_username_tree()?;

        match username_tree.get(username.as_bytes())? {
            Some(admin_id) => {
                let admins_tree = self.admins_tree()?;
                match admins_tree.get(&admin_id)? {
                    Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
                    None => Ok(None),
                }
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Admin>, AuthError> {
        let admins_tree = self.admins_tree()?;

        match admins_tree.get(id.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Admin>, AuthError> {
        let admins_tree = self.admins_tree()?;
        let mut admins = Vec::new();

        for item in admins_tree.iter() {
            let (_, data) = item?;
            admins.push(serde_json::from_slice(&data)?);
        }

        Ok(admins)
    }

    async fn delete(&self, id: &str) -> Result<(), AuthError> {
        let admins_tree = self.admins_tree()?;
        let username_tree = self.admins_by_username_tree()?;

        let data = admins_tree
            .get(id.as_bytes())?
            .ok_or(AuthError::AdminNotFound)?;
        let admin: Admin = serde_json::from_slice(&data)?;

        username_tree.remove(admin.username.as_bytes())?;
        admins_tree.remove(id.as_bytes())?;

        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let username_tree = self.admins_by_username_tree()?;
        Ok(username_tree.contains_key(username.as_bytes())?)
    }
}

/// Route grants keyed `admin_id \0 route`, so one admin's grants share a prefix
#[derive(Clone)]
pub struct SledGrantRepository {
    db: Db,
}

impl SledGrantRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn grants_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(GRANTS_TREE)?)
    }

    fn admin_prefix(admin_id: &str) -> Vec<u8> {
        let mut prefix = admin_id.as_bytes().to_vec();
        prefix.push(GRANT_KEY_SEPARATOR);
        prefix
    }

    fn grant_key(admin_id: &str, route: &str) -> Vec<u8> {
        let mut key = Self::admin_prefix(admin_id);
        key.extend_from_slice(route.as_bytes());
        key
    }

    fn validate_route(route: &str) -> Result<(), AuthError> {
        if route == WILDCARD_ROUTE || route.starts_with('/') {
            Ok(())
        } else {
            Err(AuthError::InvalidRoute(route.to_string()))
        }
    }
}

#[async_trait]
impl GrantRepository for SledGrantRepository {
    async fn grant(&self, admin_id: &str, route: &str) -> Result<RouteGrant, AuthError> {
        Self::validate_route(route)?;

        let grants_tree = self.grants_tree()?;
        let key = Self::grant_key(admin_id, route);

        if let Some(existing) = grants_tree.get(&key)? {
            return Ok(serde_json::from_slice(&existing)?);
        }

        let grant = RouteGrant::new(admin_id.to_string(), route.to_string());
        grants_tree.insert(key, serde_json::to_vec(&grant)?)?;

        Ok(grant)
    }

    async fn revoke(&self, admin_id: &str, route: &str) -> Result<bool, AuthError> {
        let grants_tree = self.grants_tree()?;
        Ok(grants_tree.remove(Self::grant_key(admin_id, route))?.is_some())
    }

    async fn list_for_admin(&self, admin_id: &str) -> Result<Vec<RouteGrant>, AuthError> {
        let grants_tree = self.grants_tree()?;
        let mut grants = Vec::new();

        for item in grants_tree.scan_prefix(Self::admin_prefix(admin_id)) {
            let (_, data) = item?;
            grants.push(serde_json::from_slice(&data)?);
        }

        Ok(grants)
    }

    async fn is_granted(&self, admin_id: &str, route: &str) -> Result<bool, AuthError> {
        let grants_tree = self.grants_tree()?;

        if grants_tree.contains_key(Self::grant_key(admin_id, route))? {
            return Ok(true);
        }

        Ok(grants_tree.contains_key(Self::grant_key(admin_id, WILDCARD_ROUTE))?)
    }

    async fn revoke_all(&self, admin_id: &str) -> Result<usize, AuthError> {
        let grants_tree = self.grants_tree()?;
        let mut count = 0;

        for item in grants_tree.scan_prefix(Self::admin_prefix(admin_id)) {
            let (key, _) = item?;
            if grants_tree.remove(key)?.is_some() {
                count += 1;
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn admin_repo(dir: &TempDir) -> SledAdminRepository {
        SledAdminRepository::new(dir.path().join("admins.sled")).unwrap()
    }

    fn grant_repo(dir: &TempDir) -> SledGrantRepository {
        SledGrantRepository::new(dir.path().join("grants.sled")).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_admin() {
        let temp_dir = TempDir::new().unwrap();
        let repo = admin_repo(&temp_dir);

        let admin = repo
            .create(Admin::new("alice".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, admin.id);

        let by_id = repo.find_by_id(&admin.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_admin_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = admin_repo(&temp_dir);

        repo.create(Admin::new("alice".to_string(), "hash".to_string()))
            .await
            .unwrap();
        let result = repo
            .create(Admin::new("alice".to_string(), "other".to_string()))
            .await;

        assert!(matches!(result, Err(AuthError::AdminAlreadyExists)));
    }

    #[tokio::test]
    async fn test_delete_admin() {
        let temp_dir = TempDir::new().unwrap();
        let repo = admin_repo(&temp_dir);

        let admin = repo
            .create(Admin::new("alice".to_string(), "hash".to_string()))
            .await
            .unwrap();
        repo.delete(&admin.id).await.unwrap();

        assert!(!repo.username_exists("alice").await.unwrap());
        assert!(repo.list_all().await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(&admin.id).await,
            Err(AuthError::AdminNotFound)
        ));
    }

    #[tokio::test]
    async fn test_exact_grant() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        repo.grant("a1", "/admin/delete").await.unwrap();

        assert!(repo.is_granted("a1", "/admin/delete").await.unwrap());
        assert!(!repo.is_granted("a1", "/admin/create").await.unwrap());
        assert!(!repo.is_granted("a2", "/admin/delete").await.unwrap());
    }

    #[tokio::test]
    async fn test_wildcard_grant() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        repo.grant("a1", WILDCARD_ROUTE).await.unwrap();

        assert!(repo.is_granted("a1", "/admin/delete").await.unwrap());
        assert!(repo.is_granted("a1", "/admin/grants/{admin_id}").await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        let first = repo.grant("a1", "/admin/delete").await.unwrap();
        let second = repo.grant("a1", "/admin/delete").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.list_for_admin("a1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_grant_rejects_relative_route() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        let result = repo.grant("a1", "admin/delete").await;
        assert!(matches!(result, Err(AuthError::InvalidRoute(_))));
    }

    #[tokio::test]
    async fn test_prefix_does_not_leak_between_admins() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        // "a1" is a byte prefix of "a10"; the separator keeps them apart
        repo.grant("a1", "/one").await.unwrap();
        repo.grant("a10", "/ten").await.unwrap();

        let grants = repo.list_for_admin("a1").await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].route, "/one");
    }

    #[tokio::test]
    async fn test_revoke() {
        let temp_dir = TempDir::new().unwrap();
        let repo = grant_repo(&temp_dir);

        repo.grant("a1", "/one").await.unwrap();
        repo.grant("a1", "/two").await.unwrap();

        assert!(repo.revoke("a1", "/one").await.unwrap());
        assert!(!repo.revoke("a1", "/one").await.unwrap());
        assert!(!repo.is_granted("a1", "/one").await.unwrap());

        assert_eq!(repo.revoke_all("a1").await.unwrap(), 1);
        assert!(repo.list_for_admin("a1").await.unwrap().is_empty());
    }
}
