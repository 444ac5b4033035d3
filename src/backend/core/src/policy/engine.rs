//! Access decisions.
//!
//! Every function here is pure: it answers "may this actor do this to that
//! resource?" from values already in hand. Handlers load what they need and
//! then call the matching `enforce_*` function before touching the store.

use tracing::debug;

use super::models::{Actor, UserAction};
use super::roles::Access;
use crate::error::{DocvaultError, Result};
use crate::models::{Document, User};
use crate::telemetry::PolicyMetrics;

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The action is allowed.
    Allow,
    /// The action is denied, with a reason safe to show the client.
    Deny(String),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    fn deny(reason: &str) -> Self {
        Self::Deny(reason.to_string())
    }

    /// Map a denial to `Forbidden`, recording it under `rule`.
    pub fn enforce(self, rule: &'static str) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => {
                PolicyMetrics::denied(rule);
                debug!(rule = rule, reason = %reason, "Policy denied request");
                Err(DocvaultError::forbidden(reason))
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Documents
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether `actor` may read `doc`.
///
/// Admins see everything. Otherwise public documents are visible to all,
/// role documents to users sharing the owner's role, and private documents
/// to their owner only.
pub fn can_view_document(actor: &Actor, doc: &Document) -> PolicyDecision {
    if actor.is_admin() {
        return PolicyDecision::Allow;
    }

    match doc.access {
        Access::Public => PolicyDecision::Allow,
        Access::Role if actor.role == doc.owner_role => PolicyDecision::Allow,
        Access::Private if actor.is(doc.owner_id) => PolicyDecision::Allow,
        Access::Role => PolicyDecision::deny("Document is restricted to its owner's role"),
        Access::Private => PolicyDecision::deny("Document is private"),
    }
}

/// Whether `actor` may update or delete `doc`: its owner or an admin.
pub fn can_modify_document(actor: &Actor, doc: &Document) -> PolicyDecision {
    if actor.is_admin() || actor.is(doc.owner_id) {
        PolicyDecision::Allow
    } else {
        PolicyDecision::deny("Only the owner can modify this document")
    }
}

/// Keep only the documents `actor` may read, preserving order.
pub fn filter_visible(actor: &Actor, docs: Vec<Document>) -> Vec<Document> {
    docs.into_iter()
        .filter(|doc| can_view_document(actor, doc).is_allowed())
        .collect()
}

pub fn enforce_view_document(actor: &Actor, doc: &Document) -> Result<()> {
    can_view_document(actor, doc).enforce("view_document")
}

pub fn enforce_modify_document(actor: &Actor, doc: &Document) -> Result<()> {
    can_modify_document(actor, doc).enforce("modify_document")
}

// ═══════════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether `actor` may perform `action` on `target`.
///
/// Accounts can be updated by themselves or by an admin. Role changes need an
/// admin. Admin accounts can never be deleted or have their role changed, not
/// even by another admin.
pub fn can_modify_user(actor: &Actor, target: &User, action: UserAction) -> PolicyDecision {
    if !actor.is(target.id) && !actor.is_admin() {
        return PolicyDecision::deny("You can only modify your own account");
    }

    match action {
        UserAction::Update => PolicyDecision::Allow,
        UserAction::Delete if target.is_admin() => {
            PolicyDecision::deny("Admin accounts cannot be deleted")
        }
        UserAction::Delete => PolicyDecision::Allow,
        UserAction::ChangeRole if target.is_admin() => {
            PolicyDecision::deny("The role of an admin account cannot be changed")
        }
        UserAction::ChangeRole if !actor.is_admin() => {
            PolicyDecision::deny("Only admins can change roles")
        }
        UserAction::ChangeRole => PolicyDecision::Allow,
    }
}

/// The ownership half of [`can_modify_user`], for when the target has not
/// been loaded yet: self or admin.
pub fn can_touch_account(actor: &Actor, target_id: i64) -> PolicyDecision {
    if actor.is(target_id) || actor.is_admin() {
        PolicyDecision::Allow
    } else {
        PolicyDecision::deny("You can only modify your own account")
    }
}

/// Whether `actor` may list all users: admins only.
pub fn can_list_users(actor: &Actor) -> PolicyDecision {
    if actor.is_admin() {
        PolicyDecision::Allow
    } else {
        PolicyDecision::deny("Only admins can list users")
    }
}

pub fn enforce_modify_user(actor: &Actor, target: &User, action: UserAction) -> Result<()> {
    let rule = match action {
        UserAction::Update => "update_user",
        UserAction::ChangeRole => "change_role",
        UserAction::Delete => "delete_user",
    };
    can_modify_user(actor, target, action).enforce(rule)
}

pub fn enforce_touch_account(actor: &Actor, target_id: i64) -> Result<()> {
    can_touch_account(actor, target_id).enforce("own_account")
}

pub fn enforce_list_users(actor: &Actor) -> Result<()> {
    can_list_users(actor).enforce("list_users")
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::policy::Role;
    use chrono::Utc;

    const ADMIN: Actor = Actor::new(1, Role::Admin);
    const ALICE: Actor = Actor::new(2, Role::Regular);
    const BOB: Actor = Actor::new(3, Role::Regular);

    fn user(id: i64, role: Role) -> User {
        let now = Utc::now();
        User {
            id,
            email: format!("user{}@x.com", id),
            password_hash: String::new(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            role,
            active_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn doc(owner: &Actor, access: Access) -> Document {
        let now = Utc::now();
        Document {
            id: 10,
            title: "t".to_string(),
            content: "c".to_string(),
            access,
            owner_id: owner.id,
            owner_role: owner.role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_public_documents_visible_to_all() {
        let d = doc(&ALICE, Access::Public);
        assert!(can_view_document(&BOB, &d).is_allowed());
        assert!(can_view_document(&ADMIN, &d).is_allowed());
    }

    #[test]
    fn test_private_documents_owner_only() {
        let d = doc(&ALICE, Access::Private);
        assert!(can_view_document(&ALICE, &d).is_allowed());
        assert!(can_view_document(&BOB, &d).is_denied());
        assert!(can_view_document(&ADMIN, &d).is_allowed());
    }

    #[test]
    fn test_role_documents_follow_owner_role() {
        let regular_doc = doc(&ALICE, Access::Role);
        assert!(can_view_document(&BOB, &regular_doc).is_allowed());

        let admin_doc = doc(&ADMIN, Access::Role);
        assert!(can_view_document(&BOB, &admin_doc).is_denied());
        assert!(can_view_document(&Actor::new(9, Role::Admin), &admin_doc).is_allowed());
    }

    #[test]
    fn test_modify_document_owner_or_admin() {
        let d = doc(&ALICE, Access::Public);
        assert!(can_modify_document(&ALICE, &d).is_allowed());
        assert!(can_modify_document(&ADMIN, &d).is_allowed());
        assert!(can_modify_document(&BOB, &d).is_denied());
    }

    #[test]
    fn test_filter_visible_keeps_order() {
        let docs = vec![
            doc(&ALICE, Access::Public),
            doc(&ALICE, Access::Private),
            doc(&BOB, Access::Private),
            doc(&ADMIN, Access::Role),
            doc(&BOB, Access::Role),
        ];
        let visible = filter_visible(&BOB, docs);
        let owners: Vec<(i64, Access)> = visible.iter().map(|d| (d.owner_id, d.access)).collect();
        assert_eq!(
            owners,
            vec![(2, Access::Public), (3, Access::Private), (3, Access::Role)]
        );
    }

    #[test]
    fn test_regular_users_cannot_modify_others() {
        let other = user(BOB.id, Role::Regular);
        for action in [UserAction::Update, UserAction::ChangeRole, UserAction::Delete] {
            assert!(can_modify_user(&ALICE, &other, action).is_denied());
        }
        assert!(can_touch_account(&ALICE, BOB.id).is_denied());
        assert!(can_touch_account(&ALICE, ALICE.id).is_allowed());
    }

    #[test]
    fn test_self_update_and_delete_allowed() {
        let me = user(ALICE.id, Role::Regular);
        assert!(can_modify_user(&ALICE, &me, UserAction::Update).is_allowed());
        assert!(can_modify_user(&ALICE, &me, UserAction::Delete).is_allowed());
        assert!(can_modify_user(&ALICE, &me, UserAction::ChangeRole).is_denied());
    }

    #[test]
    fn test_admin_accounts_are_protected() {
        let seeded = user(1, Role::Admin);
        let other_admin = Actor::new(5, Role::Admin);

        for actor in [ADMIN, other_admin] {
            assert!(can_modify_user(&actor, &seeded, UserAction::Delete).is_denied());
            assert!(can_modify_user(&actor, &seeded, UserAction::ChangeRole).is_denied());
        }
        assert!(can_modify_user(&other_admin, &seeded, UserAction::Update).is_allowed());
    }

    #[test]
    fn test_admin_manages_regular_accounts() {
        let target = user(ALICE.id, Role::Regular);
        for action in [UserAction::Update, UserAction::ChangeRole, UserAction::Delete] {
            assert!(can_modify_user(&ADMIN, &target, action).is_allowed());
        }
    }

    #[test]
    fn test_list_users_admin_only() {
        assert!(can_list_users(&ADMIN).is_allowed());
        assert!(can_list_users(&ALICE).is_denied());
    }

    #[test]
    fn test_enforce_maps_deny_to_forbidden() {
        let err = enforce_list_users(&ALICE).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.user_message(), "Only admins can list users");
        assert!(enforce_list_users(&ADMIN).is_ok());
    }
}
