use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EntityKind, Error, Result};
use crate::models::{NewUser, User, UserId};
use crate::store::UserStore;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn create(&self, user: NewUser) -> Result<User> {
        debug!(login = %user.login, "creating user");
        let user = self.users.create(user).await?;
        info!(user_id = user.id, "created user");
        Ok(user)
    }

    pub async fn update(&self, id: UserId, user: NewUser) -> Result<User> {
        debug!(user_id = id, "updating user");
        self.ensure_user(id).await?;
        let user = self.users.replace(id, user).await?;
        info!(user_id = id, "updated user");
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.users.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn add_friend(&self, a: UserId, b: UserId) -> Result<()> {
        self.ensure_user(a).await?;
        self.ensure_user(b).await?;
        self.users.add_friend(a, b).await?;
        info!(user_id = a, friend_id = b, "added friendship");
        Ok(())
    }

    pub async fn remove_friend(&self, a: UserId, b: UserId) -> Result<()> {
        self.ensure_user(a).await?;
        self.ensure_user(b).await?;
        self.users.remove_friend(a, b).await?;
        info!(user_id = a, friend_id = b, "removed friendship");
        Ok(())
    }

    pub async fn friend_ids(&self, id: UserId) -> Result<HashSet<UserId>> {
        self.ensure_user(id).await?;
        self.users.friend_ids(id).await
    }

    pub async fn friends(&self, id: UserId) -> Result<Vec<User>> {
        self.ensure_user(id).await?;
        let mut friends = self.users.friends(id).await?;
        friends.sort_by_key(|u| u.id);
        Ok(friends)
    }

    pub async fn common_friends(&self, a: UserId, b: UserId) -> Result<Vec<User>> {
        self.ensure_user(a).await?;
        self.ensure_user(b).await?;
        let mut common = self.users.common_friends(a, b).await?;
        common.sort_by_key(|u| u.id);
        Ok(common)
    }

    async fn ensure_user(&self, id: UserId) -> Result<()> {
        if self.users.exists(id).await? {
            Ok(())
        } else {
            warn!(user_id = id, "user not found");
            Err(Error::not_found(EntityKind::User, id))
        }
    }
}
