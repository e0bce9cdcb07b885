//! Permission aggregation for site users.
//!
//! A user holds any number of roles and each role grants a set of
//! [`PermissionTo`] values. `UserTasks` answers "what may this user do" as
//! the deduplicated union over all of the user's roles, with an optional
//! in-memory cache in front of the database.
//!
//! ```rust,ignore
//! let tasks = UserTasks::from_config(db.clone(), &config);
//! if tasks.has_permission(user_id, PermissionTo::EditWikiPages).await? {
//!     // ...
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sea_orm::sea_query::Query;
use sea_orm::{ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tasvideos_core::{ApiError, Config};
use tokio::sync::RwLock;

use crate::models::{PermissionTo, role_permission, user, user_role};

/// Cached permission set for a user.
#[derive(Clone, Debug)]
struct CachedPermissions {
    permissions: HashSet<PermissionTo>,
    cached_at: Instant,
}

/// Cached entries plus a generation bumped by every invalidation.
///
/// A load only stores its result if no invalidation happened since it
/// started, so a slow load can never reinstate a dropped entry.
#[derive(Debug, Default)]
struct PermissionCache {
    entries: HashMap<i32, CachedPermissions>,
    generation: u64,
}

impl PermissionCache {
    fn fresh(&self, user_id: i32, ttl: Duration) -> Option<&HashSet<PermissionTo>> {
        self.entries
            .get(&user_id)
            .filter(|cached| cached.cached_at.elapsed() < ttl)
            .map(|cached| &cached.permissions)
    }

    fn store(
        &mut self,
        user_id: i32,
        generation: u64,
        permissions: HashSet<PermissionTo>,
        ttl: Duration,
    ) {
        if generation != self.generation {
            return;
        }
        self.entries.retain(|_, cached| cached.cached_at.elapsed() < ttl);
        self.entries.insert(
            user_id,
            CachedPermissions {
                permissions,
                cached_at: Instant::now(),
            },
        );
    }

    fn invalidate(&mut self, user_id: Option<i32>) {
        self.generation = self.generation.wrapping_add(1);
        match user_id {
            Some(id) => {
                self.entries.remove(&id);
            }
            None => self.entries.clear(),
        }
    }
}

/// Permission lookups for users, with optional per-user caching.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct UserTasks {
    db: DatabaseConnection,
    inner: Arc<UserTasksInner>,
}

struct UserTasksInner {
    cache: RwLock<PermissionCache>,
    /// `None` disables caching
    cache_ttl: Option<Duration>,
}

impl UserTasks {
    /// Create an uncached service: every call reads the database.
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_cache_ttl(db, None)
    }

    /// Create a service caching each user's permissions for `ttl`.
    pub fn with_cache_ttl(db: DatabaseConnection, ttl: Option<Duration>) -> Self {
        Self {
            db,
            inner: Arc::new(UserTasksInner {
                cache: RwLock::new(PermissionCache::default()),
                cache_ttl: ttl.filter(|t| !t.is_zero()),
            }),
        }
    }

    /// Create a service using `PERMISSION_CACHE_TTL_SECS` from the config.
    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_cache_ttl(db, config.permission_cache_ttl())
    }

    /// All permissions granted to the user through any of their roles.
    ///
    /// Unknown users and users without roles get an empty set. Stored
    /// permission ids this build does not recognize are skipped.
    pub async fn get_user_permissions_by_id(
        &self,
        user_id: i32,
    ) -> Result<HashSet<PermissionTo>, ApiError> {
        let Some(ttl) = self.inner.cache_ttl else {
            return self.load_permissions(user_id).await;
        };

        let generation = {
            let cache = self.inner.cache.read().await;
            if let Some(permissions) = cache.fresh(user_id, ttl) {
                return Ok(permissions.clone());
            }
            cache.generation
        };

        let permissions = self.load_permissions(user_id).await?;

        let mut cache = self.inner.cache.write().await;
        cache.store(user_id, generation, permissions.clone(), ttl);
        Ok(permissions)
    }

    /// The user's name, or `None` when no user has this id.
    pub async fn get_user_name_by_id(&self, user_id: i32) -> Result<Option<String>, ApiError> {
        let found = user::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(found.map(|u| u.user_name))
    }

    /// Whether the user holds `permission` through any role.
    pub async fn has_permission(
        &self,
        user_id: i32,
        permission: PermissionTo,
    ) -> Result<bool, ApiError> {
        let permissions = self.get_user_permissions_by_id(user_id).await?;
        Ok(permissions.contains(&permission))
    }

    /// Drop the cached permissions of one user.
    ///
    /// Call after changing that user's roles.
    pub async fn invalidate_user(&self, user_id: i32) {
        self.inner.cache.write().await.invalidate(Some(user_id));
    }

    /// Drop every cached entry, e.g. after editing a role's permissions.
    pub async fn invalidate_all(&self) {
        self.inner.cache.write().await.invalidate(None);
    }

    async fn load_permissions(&self, user_id: i32) -> Result<HashSet<PermissionTo>, ApiError> {
        let roles_of_user = Query::select()
            .column(user_role::Column::RoleId)
            .from(user_role::Entity)
            .and_where(user_role::Column::UserId.eq(user_id))
            .to_owned();

        let ids: Vec<i32> = role_permission::Entity::find()
            .select_only()
            .column(role_permission::Column::PermissionId)
            .distinct()
            .filter(role_permission::Column::RoleId.in_subquery(roles_of_user))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;

        let permissions = ids
            .into_iter()
            .filter_map(|id| match PermissionTo::try_from_value(&id) {
                Ok(permission) => Some(permission),
                Err(_) => {
                    tracing::warn!(user_id, permission_id = id, "skipping unknown permission");
                    None
                }
            })
            .collect();

        Ok(permissions)
    }
}
