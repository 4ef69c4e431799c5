// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use relcore_type::{
	Result,
	error::diagnostic::catalog::{object_already_exists, user_not_found},
	return_error,
};

use crate::Catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
	pub name: String,
	pub is_admin: bool,
	pub rights: HashSet<String>,
}

impl User {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			is_admin: false,
			rights: HashSet::new(),
		}
	}

	pub fn admin(name: impl Into<String>) -> Self {
		Self {
			is_admin: true,
			..Self::new(name)
		}
	}

	pub fn has_right(&self, right: &str) -> bool {
		self.is_admin || self.rights.contains(right)
	}
}

impl Catalog {
	pub fn create_user(&self, user: User) -> Result<()> {
		self.write(|registry| {
			if registry.users.contains_key(&user.name) {
				return_error!(object_already_exists("User", &user.name));
			}
			registry.users.insert(user.name.clone(), user);
			Ok(())
		})
	}

	pub fn user(&self, name: &str) -> Result<User> {
		match self.read(|registry| registry.users.get(name).cloned()) {
			Some(user) => Ok(user),
			None => return_error!(user_not_found(name)),
		}
	}

	pub fn grant(&self, user: &str, right: impl Into<String>) -> Result<()> {
		let right = right.into();
		self.write(|registry| match registry.users.get_mut(user) {
			Some(u) => {
				u.rights.insert(right);
				Ok(())
			}
			None => return_error!(user_not_found(user)),
		})
	}

	pub fn revoke(&self, user: &str, right: &str) -> Result<()> {
		self.write(|registry| match registry.users.get_mut(user) {
			Some(u) => {
				u.rights.remove(right);
				Ok(())
			}
			None => return_error!(user_not_found(user)),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::User;
	use crate::Catalog;

	#[test]
	fn test_grant_and_revoke() {
		let catalog = Catalog::new();
		catalog.create_user(User::new("alice")).unwrap();
		catalog.grant("alice", "Execute").unwrap();
		assert!(catalog.user("alice").unwrap().has_right("Execute"));
		catalog.revoke("alice", "Execute").unwrap();
		assert!(!catalog.user("alice").unwrap().has_right("Execute"));
	}

	#[test]
	fn test_admin_holds_every_right() {
		let catalog = Catalog::new();
		assert!(catalog.user("Admin").unwrap().has_right("anything"));
	}
}
