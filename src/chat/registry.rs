use super::protocol::{ConnectionId, User};

/// Joined users, in join order.
#[derive(Debug, Default)]
pub struct Registry {
    users: Vec<User>,
}

impl Registry {
    /// Overwriting keeps the original join position.
    pub fn register(&mut self, id: &ConnectionId, user: User) {
        match self.users.iter_mut().find(|u| &u.id == id) {
            Some(slot) => *slot = user,
            None => self.users.push(user),
        }
    }

    pub fn unregister(&mut self, id: &ConnectionId) -> Option<User> {
        let idx = self.users.iter().position(|u| &u.id == id)?;
        Some(self.users.remove(idx))
    }

    pub fn list(&self) -> Vec<User> {
        self.users.clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.users.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
