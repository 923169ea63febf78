//! Registry integration tests: role and user CRUD, patch merges, protection
//! of seeded entities and id allocation, over a seeded temp root.

use tempfile::tempdir;

use warden::error::AppError;
use warden::roles::{PermissionSet, RolePatch, RoleRegistry, PROTECTED_ROLE_IDS};
use warden::seed;
use warden::store::DocumentStore;
use warden::users::{UserPatch, UserRegistry, UserStatus};

fn open_seeded(root: &std::path::Path) -> (UserRegistry, RoleRegistry) {
    let store = DocumentStore::new(root).expect("store");
    seed::ensure_defaults(&store).expect("seed");
    (UserRegistry::open(store.clone()), RoleRegistry::open(store))
}

#[test]
fn default_roles_cannot_be_deleted() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());

    for id in PROTECTED_ROLE_IDS {
        let err = roles.delete(id).expect_err("protected role delete must fail");
        assert!(matches!(err, AppError::Protected { .. }), "got {:?}", err);
    }
    assert_eq!(roles.list().len(), 3, "collection unchanged after refusals");
}

#[test]
fn created_role_gets_fresh_id_and_can_be_deleted() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());

    let perms = PermissionSet { read: true, write: true, delete: false, admin: false };
    let manager = roles.create("manager", perms).unwrap();
    assert!(manager.id > 3, "new ids must not collide with seeded ones");
    assert_eq!(manager.permissions, perms);

    assert!(roles.delete(manager.id).unwrap());
    assert!(roles.get(manager.id).is_none());
    assert_eq!(roles.list().len(), 3);
}

#[test]
fn role_ids_stay_unique_after_deletes() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());

    let a = roles.create("a", PermissionSet::default()).unwrap();
    let b = roles.create("b", PermissionSet::default()).unwrap();
    assert!(b.id > a.id);
    roles.delete(b.id).unwrap();
    let c = roles.create("c", PermissionSet::default()).unwrap();
    let ids: Vec<u64> = roles.list().iter().map(|r| r.id).collect();
    let mut dedup = ids.clone();
    dedup.sort_unstable();
    dedup.dedup();
    assert_eq!(ids.len(), dedup.len(), "no duplicate ids after delete+create, got {:?}", ids);
    assert!(!PROTECTED_ROLE_IDS.contains(&c.id));
}

#[test]
fn duplicate_role_names_are_accepted() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());
    let first = roles.create("ops", PermissionSet::default()).unwrap();
    let second = roles.create("ops", PermissionSet::all()).unwrap();
    assert_ne!(first.id, second.id);
    // Name lookup resolves by collection order
    assert_eq!(roles.find_by_name("ops").map(|r| r.id), Some(first.id));
}

#[test]
fn role_patch_only_changes_provided_fields() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());

    let perms = PermissionSet { read: true, write: false, delete: false, admin: false };
    let created = roles.create("auditor", perms).unwrap();

    let renamed = roles
        .update(created.id, RolePatch { name: Some("viewer".into()), ..Default::default() })
        .unwrap();
    assert_eq!(renamed.name, "viewer");
    assert_eq!(renamed.permissions, perms, "permissions preserved when not patched");

    let new_perms = PermissionSet { read: true, write: true, delete: true, admin: false };
    let repermed = roles
        .update(created.id, RolePatch { permissions: Some(new_perms), ..Default::default() })
        .unwrap();
    assert_eq!(repermed.name, "viewer", "name preserved when not patched");
    assert_eq!(repermed.permissions, new_perms, "a patched permission set replaces all four flags");
}

#[test]
fn role_update_of_missing_id_surfaces_not_found() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());
    let err = roles
        .update(4040, RolePatch { name: Some("ghost".into()), ..Default::default() })
        .expect_err("update of a missing id must error");
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
fn role_delete_of_missing_id_is_a_silent_miss() {
    let tmp = tempdir().unwrap();
    let (_, roles) = open_seeded(tmp.path());
    assert!(!roles.delete(4040).unwrap());
    assert_eq!(roles.list().len(), 3);
}

#[test]
fn seeded_users_cannot_be_deleted() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());

    for name in ["admin", "editor", "user"] {
        let id = users.find_by_username(name).unwrap().id;
        let err = users.delete(id).expect_err("seed user delete must fail");
        assert!(matches!(err, AppError::Protected { .. }));
    }
    assert_eq!(users.list().len(), 3, "collection unchanged after refusals");
}

#[test]
fn registered_user_can_be_deleted() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());

    let bob = users.register("bob", "pw", "bob@x.com", "user").unwrap();
    assert!(users.delete(bob.id).unwrap());
    assert!(users.find_by_username("bob").is_none());
    assert_eq!(users.list().len(), 3);
}

#[test]
fn user_delete_of_missing_id_is_a_silent_miss() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());
    assert!(!users.delete(4040).unwrap());
}

#[test]
fn user_patch_only_changes_provided_fields() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());

    let bob = users.register("bob", "pw", "bob@x.com", "user").unwrap();

    let promoted = users
        .update(bob.id, UserPatch { role: Some("editor".into()), ..Default::default() })
        .unwrap();
    assert_eq!(promoted.role, "editor");
    assert_eq!(promoted.email, "bob@x.com");
    assert_eq!(promoted.password, "pw");
    assert_eq!(promoted.status, UserStatus::Active);

    let suspended = users
        .update(bob.id, UserPatch { status: Some(UserStatus::Inactive), ..Default::default() })
        .unwrap();
    assert_eq!(suspended.role, "editor", "role preserved when not patched");
    assert_eq!(suspended.status, UserStatus::Inactive);
    assert_eq!(suspended.username, "bob", "username is never patchable");
}

#[test]
fn user_update_of_missing_id_surfaces_not_found() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());
    let err = users
        .update(4040, UserPatch { role: Some("admin".into()), ..Default::default() })
        .expect_err("update of a missing id must error");
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[test]
fn user_ids_are_unique_and_monotonic() {
    let tmp = tempdir().unwrap();
    let (users, _) = open_seeded(tmp.path());

    let a = users.register("a", "pw", "a@x.com", "user").unwrap();
    let b = users.register("b", "pw", "b@x.com", "user").unwrap();
    assert!(a.id > 3 && b.id > a.id);
}

#[test]
fn mutations_are_visible_after_reopen() {
    let tmp = tempdir().unwrap();
    {
        let (users, roles) = open_seeded(tmp.path());
        let bob = users.register("bob", "pw", "bob@x.com", "user").unwrap();
        users.update(bob.id, UserPatch { role: Some("editor".into()), ..Default::default() }).unwrap();
        roles.update(2, RolePatch { permissions: Some(PermissionSet::all()), ..Default::default() }).unwrap();
    }
    let (users, roles) = open_seeded(tmp.path());
    assert_eq!(users.find_by_username("bob").unwrap().role, "editor");
    assert_eq!(roles.get(2).unwrap().permissions, PermissionSet::all());
}
