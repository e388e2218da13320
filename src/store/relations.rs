use std::collections::{HashMap, HashSet};

use crate::models::{FilmId, UserId};

/// Symmetric friendship edges. Both directions are kept in the index so a
/// lookup never has to scan the other side.
#[derive(Debug, Default)]
pub struct FriendshipSet {
    edges: HashMap<UserId, HashSet<UserId>>,
}

impl FriendshipSet {
    pub fn add(&mut self, a: UserId, b: UserId) {
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
    }

    pub fn remove(&mut self, a: UserId, b: UserId) {
        self.remove_directed(a, b);
        self.remove_directed(b, a);
    }

    fn remove_directed(&mut self, from: UserId, to: UserId) {
        if let Some(set) = self.edges.get_mut(&from) {
            set.remove(&to);
            if set.is_empty() {
                self.edges.remove(&from);
            }
        }
    }

    pub fn friends_of(&self, user: UserId) -> HashSet<UserId> {
        self.edges.get(&user).cloned().unwrap_or_default()
    }

    pub fn common(&self, a: UserId, b: UserId) -> HashSet<UserId> {
        let empty = HashSet::new();
        let first = self.edges.get(&a).unwrap_or(&empty);
        let second = self.edges.get(&b).unwrap_or(&empty);
        first.intersection(second).copied().collect()
    }
}

/// Directed (film, user) like pairs. Adds and removes are idempotent.
#[derive(Debug, Default)]
pub struct LikeSet {
    likes: HashMap<FilmId, HashSet<UserId>>,
}

impl LikeSet {
    pub fn add(&mut self, film: FilmId, user: UserId) {
        self.likes.entry(film).or_default().insert(user);
    }

    pub fn remove(&mut self, film: FilmId, user: UserId) {
        if let Some(set) = self.likes.get_mut(&film) {
            set.remove(&user);
            if set.is_empty() {
                self.likes.remove(&film);
            }
        }
    }

    pub fn count(&self, film: FilmId) -> u64 {
        self.likes.get(&film).map_or(0, |set| set.len() as u64)
    }

    pub fn counts(&self) -> HashMap<FilmId, u64> {
        self.likes.iter().map(|(film, set)| (*film, set.len() as u64)).collect()
    }
}
