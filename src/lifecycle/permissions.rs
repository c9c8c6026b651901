//! Role assignment rules.

use crate::models::usermodel::UserRole;

/// Whether `acting` may assign `target` to another user. Rules are checked
/// in order, first match wins:
/// 1. system_admin assigns anything
/// 2. admin assigns anything below admin
/// 3. moderator assigns support and user
/// 4. nobody else assigns roles
pub fn can_assign_role(acting: UserRole, target: UserRole) -> bool {
    match acting {
        UserRole::SystemAdmin => true,
        UserRole::Admin => target.level() < UserRole::Admin.level(),
        UserRole::Moderator => matches!(target, UserRole::Support | UserRole::User),
        _ => false,
    }
}

/// The set a given role may hand out, for the role-picker endpoint.
pub fn assignable_roles(acting: UserRole) -> Vec<UserRole> {
    UserRole::all()
        .into_iter()
        .filter(|target| can_assign_role(acting, *target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use UserRole::*;

    #[test]
    fn system_admin_assigns_everything() {
        for target in UserRole::all() {
            assert!(can_assign_role(SystemAdmin, target));
        }
    }

    #[test]
    fn admin_cannot_mint_admins() {
        assert!(can_assign_role(Admin, User));
        assert!(can_assign_role(Admin, Support));
        assert!(can_assign_role(Admin, Moderator));
        assert!(!can_assign_role(Admin, Admin));
        assert!(!can_assign_role(Admin, SystemAdmin));
    }

    #[test]
    fn moderator_assigns_support_and_user_only() {
        assert!(can_assign_role(Moderator, User));
        assert!(can_assign_role(Moderator, Support));
        assert!(!can_assign_role(Moderator, Moderator));
        assert!(!can_assign_role(Moderator, Admin));
        assert!(!can_assign_role(Moderator, SystemAdmin));
    }

    #[test]
    fn support_and_user_assign_nothing() {
        for acting in [Support, User] {
            for target in UserRole::all() {
                assert!(!can_assign_role(acting, target), "{:?} -> {:?}", acting, target);
            }
        }
    }

    #[test]
    fn assignable_sets_match_matrix() {
        assert_eq!(assignable_roles(SystemAdmin).len(), 5);
        assert_eq!(assignable_roles(Admin), vec![User, Support, Moderator]);
        assert_eq!(assignable_roles(Moderator), vec![User, Support]);
        assert!(assignable_roles(Support).is_empty());
        assert!(assignable_roles(User).is_empty());
    }

    #[test]
    fn assignable_role_names_are_static() {
        let names: Vec<&'static str> = assignable_roles(Admin)
            .into_iter()
            .map(|role| role.to_str())
            .collect();
        assert_eq!(names, vec!["user", "support", "moderator"]);
    }

    #[test]
    fn hierarchy_is_strictly_ordered() {
        let levels: Vec<u8> = UserRole::all().iter().map(|r| r.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
    }
}
