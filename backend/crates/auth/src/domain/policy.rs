//! Authorization Engine
//!
//! One decision table for every protected access. Handlers build an
//! [`Identity`], describe the target as a [`Resource`], and ask
//! [`authorize`] before reading or writing anything.
//!
//! | Resource  | Operation                 | Rule                                              |
//! |-----------|---------------------------|---------------------------------------------------|
//! | Admin     | any                       | admin only, else `Forbidden`                      |
//! | Content   | `Read`                    | published, owner or admin, else `NotFound`        |
//! | Content   | `Mutate`                  | owner or admin, else `Forbidden`                  |
//! | Content   | `RecordView`              | same as `Read`                                    |
//! | Content   | `Like` / `Comment`        | authenticated, then same as `Read`                |
//! | Content   | `Administer`              | admin only, else `Forbidden`                      |
//! | Account   | any                       | the account owner or an admin, else `Forbidden`   |
//!
//! A rule that needs an identity returns `Unauthenticated` for anonymous
//! callers, except reads of hidden content which stay `NotFound`.
//!
//! Role changes and deletions of users additionally go through
//! [`authorize_role_change`] / [`authorize_user_deletion`], which enforce
//! that an admin cannot demote themselves and that the last admin is kept.

use serde::Serialize;
use thiserror::Error;

use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::UserRole};

// ============================================================================
// Identity
// ============================================================================

/// Authenticated caller. The role is read from the store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(rename = "id")]
    pub user_id: UserId,
    #[serde(rename = "username")]
    pub user_name: UserName,
    pub role: UserRole,
}

/// Per-request caller identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    User(Principal),
}

impl Identity {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Identity::User(principal) => Some(principal),
            Identity::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.principal().map(|p| p.user_id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }

    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(|p| p.role.is_admin())
    }

    /// Caller is `owner`, or an admin.
    pub fn owns_or_administers(&self, owner: UserId) -> bool {
        self.principal()
            .is_some_and(|p| p.role.is_admin() || p.user_id == owner)
    }

    /// Principal or `Unauthenticated`.
    pub fn require(&self) -> Result<&Principal, Denial> {
        self.principal().ok_or(Denial::Unauthenticated)
    }
}

// ============================================================================
// Resources and operations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminArea {
    Users,
    Moderation,
    Feedback,
}

/// Ownership and visibility of a Work or Chapter.
///
/// A chapter uses its parent work's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentAccess {
    pub owner: UserId,
    pub is_published: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Admin(AdminArea),
    Content(ContentAccess),
    /// A user account, by id
    Account(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Mutate,
    RecordView,
    Like,
    Comment,
    Administer,
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Access denied")]
    Forbidden,
    /// Absent, or hidden from this caller
    #[error("Not found")]
    NotFound,
    #[error("Admins cannot remove their own admin role")]
    SelfDemotion,
    #[error("The last admin cannot be removed or demoted")]
    LastAdminProtected,
}

// ============================================================================
// Decision table
// ============================================================================

/// Decide whether `identity` may perform `operation` on `resource`.
pub fn authorize(
    identity: &Identity,
    operation: Operation,
    resource: Resource,
) -> Result<(), Denial> {
    match resource {
        Resource::Admin(_) => require_admin(identity),
        Resource::Account(target) => {
            identity.require()?;
            if identity.owns_or_administers(target) {
                Ok(())
            } else {
                Err(Denial::Forbidden)
            }
        }
        Resource::Content(content) => match operation {
            Operation::Read | Operation::RecordView => can_read(identity, content),
            Operation::Like | Operation::Comment => {
                identity.require()?;
                can_read(identity, content)
            }
            Operation::Mutate => {
                identity.require()?;
                if identity.owns_or_administers(content.owner) {
                    Ok(())
                } else {
                    Err(Denial::Forbidden)
                }
            }
            Operation::Administer => require_admin(identity),
        },
    }
}

fn require_admin(identity: &Identity) -> Result<(), Denial> {
    if identity.require()?.role.is_admin() {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

fn can_read(identity: &Identity, content: ContentAccess) -> Result<(), Denial> {
    if content.is_published || identity.owns_or_administers(content.owner) {
        Ok(())
    } else {
        Err(Denial::NotFound)
    }
}

/// Admin changes `target`'s role from `current` to `new`.
///
/// `admin_count` is the number of admins before the change.
pub fn authorize_role_change(
    identity: &Identity,
    target: UserId,
    current: UserRole,
    new: UserRole,
    admin_count: u64,
) -> Result<(), Denial> {
    authorize(identity, Operation::Administer, Resource::Admin(AdminArea::Users))?;

    let demotes_admin = current.is_admin() && !new.is_admin();
    if !demotes_admin {
        return Ok(());
    }
    if identity.user_id() == Some(target) {
        return Err(Denial::SelfDemotion);
    }
    if admin_count <= 1 {
        return Err(Denial::LastAdminProtected);
    }
    Ok(())
}

/// Admin deletes `target`, whose role is `target_role`.
pub fn authorize_user_deletion(
    identity: &Identity,
    target_role: UserRole,
    admin_count: u64,
) -> Result<(), Denial> {
    authorize(identity, Operation::Administer, Resource::Admin(AdminArea::Users))?;

    if target_role.is_admin() && admin_count <= 1 {
        return Err(Denial::LastAdminProtected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Identity {
        Identity::User(Principal {
            user_id: UserId::new(),
            user_name: UserName::new("someone").unwrap(),
            role,
        })
    }

    fn content(owner: UserId, is_published: bool) -> Resource {
        Resource::Content(ContentAccess {
            owner,
            is_published,
        })
    }

    #[test]
    fn test_admin_area() {
        let area = Resource::Admin(AdminArea::Moderation);
        assert_eq!(
            authorize(&Identity::Anonymous, Operation::Administer, area),
            Err(Denial::Unauthenticated)
        );
        assert_eq!(
            authorize(&principal(UserRole::User), Operation::Read, area),
            Err(Denial::Forbidden)
        );
        assert!(authorize(&principal(UserRole::Admin), Operation::Read, area).is_ok());
    }

    #[test]
    fn test_read_published_is_public() {
        let owner = UserId::new();
        assert!(authorize(&Identity::Anonymous, Operation::Read, content(owner, true)).is_ok());
        assert!(
            authorize(&Identity::Anonymous, Operation::RecordView, content(owner, true)).is_ok()
        );
    }

    #[test]
    fn test_read_hidden_is_not_found_for_strangers() {
        let owner_identity = principal(UserRole::User);
        let owner = owner_identity.user_id().unwrap();
        let hidden = content(owner, false);

        assert_eq!(
            authorize(&Identity::Anonymous, Operation::Read, hidden),
            Err(Denial::NotFound)
        );
        assert_eq!(
            authorize(&principal(UserRole::User), Operation::Read, hidden),
            Err(Denial::NotFound)
        );
        assert!(authorize(&owner_identity, Operation::Read, hidden).is_ok());
        assert!(authorize(&principal(UserRole::Admin), Operation::Read, hidden).is_ok());
    }

    #[test]
    fn test_mutation_requires_owner_or_admin() {
        let owner_identity = principal(UserRole::User);
        let target = content(owner_identity.user_id().unwrap(), true);

        assert!(authorize(&owner_identity, Operation::Mutate, target).is_ok());
        assert!(authorize(&principal(UserRole::Admin), Operation::Mutate, target).is_ok());
        assert_eq!(
            authorize(&principal(UserRole::User), Operation::Mutate, target),
            Err(Denial::Forbidden)
        );
        assert_eq!(
            authorize(&Identity::Anonymous, Operation::Mutate, target),
            Err(Denial::Unauthenticated)
        );
    }

    #[test]
    fn test_engagement_needs_identity_and_visibility() {
        let owner = UserId::new();
        assert_eq!(
            authorize(&Identity::Anonymous, Operation::Like, content(owner, true)),
            Err(Denial::Unauthenticated)
        );
        assert!(authorize(&principal(UserRole::User), Operation::Comment, content(owner, true)).is_ok());
        assert_eq!(
            authorize(&principal(UserRole::User), Operation::Like, content(owner, false)),
            Err(Denial::NotFound)
        );
    }

    #[test]
    fn test_account_self_service() {
        let me = principal(UserRole::User);
        let my_id = me.user_id().unwrap();

        assert!(authorize(&me, Operation::Mutate, Resource::Account(my_id)).is_ok());
        assert_eq!(
            authorize(&me, Operation::Mutate, Resource::Account(UserId::new())),
            Err(Denial::Forbidden)
        );
        assert!(
            authorize(&principal(UserRole::Admin), Operation::Mutate, Resource::Account(my_id))
                .is_ok()
        );
        assert_eq!(
            authorize(&Identity::Anonymous, Operation::Read, Resource::Account(my_id)),
            Err(Denial::Unauthenticated)
        );
    }

    #[test]
    fn test_admin_cannot_demote_self() {
        let admin = principal(UserRole::Admin);
        let id = admin.user_id().unwrap();
        assert_eq!(
            authorize_role_change(&admin, id, UserRole::Admin, UserRole::User, 5),
            Err(Denial::SelfDemotion)
        );
        assert!(authorize_role_change(&admin, id, UserRole::Admin, UserRole::Admin, 1).is_ok());
    }

    #[test]
    fn test_last_admin_is_protected() {
        let admin = principal(UserRole::Admin);
        let other = UserId::new();

        assert_eq!(
            authorize_role_change(&admin, other, UserRole::Admin, UserRole::User, 1),
            Err(Denial::LastAdminProtected)
        );
        assert!(authorize_role_change(&admin, other, UserRole::Admin, UserRole::User, 2).is_ok());
        assert!(authorize_role_change(&admin, other, UserRole::User, UserRole::Admin, 1).is_ok());

        assert_eq!(
            authorize_user_deletion(&admin, UserRole::Admin, 1),
            Err(Denial::LastAdminProtected)
        );
        assert!(authorize_user_deletion(&admin, UserRole::Admin, 2).is_ok());
        assert!(authorize_user_deletion(&admin, UserRole::User, 1).is_ok());
    }

    #[test]
    fn test_user_management_is_admin_only() {
        assert_eq!(
            authorize_user_deletion(&principal(UserRole::User), UserRole::User, 3),
            Err(Denial::Forbidden)
        );
        assert_eq!(
            authorize_role_change(
                &Identity::Anonymous,
                UserId::new(),
                UserRole::User,
                UserRole::Admin,
                1
            ),
            Err(Denial::Unauthenticated)
        );
    }
}
