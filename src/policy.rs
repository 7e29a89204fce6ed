//! Role and ownership rules for every order and account operation.
//!
//! Everything here is a pure function of the actor and the resource owner so
//! services can ask before touching the store.

use crate::models::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ViewAdminDashboard,
    ViewTechnicianDashboard,
    /// `owner` is the technician the new order will belong to.
    CreateOrder,
    ViewOrder,
    EditOrder,
    DeleteOrder,
    ChangeStatus,
    CreateTechnician,
    ViewMetrics,
}

/// Which orders a listing may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    OwnedBy(i32),
}

impl OrderScope {
    #[must_use]
    pub const fn owner(&self) -> Option<i32> {
        match self {
            Self::All => None,
            Self::OwnedBy(id) => Some(*id),
        }
    }
}

#[must_use]
pub fn allowed(role: Role, operation: Operation, owner: Option<i32>, actor_id: i32) -> bool {
    let owns = owner == Some(actor_id);

    match (role, operation) {
        (Role::Admin, Operation::ViewTechnicianDashboard) => false,
        (Role::Admin, _) => true,

        (Role::Technician, Operation::ViewTechnicianDashboard) => true,
        (
            Role::Technician,
            Operation::CreateOrder
            | Operation::ViewOrder
            | Operation::EditOrder
            | Operation::ChangeStatus,
        ) => owns,
        (
            Role::Technician,
            Operation::ViewAdminDashboard
            | Operation::DeleteOrder
            | Operation::CreateTechnician
            | Operation::ViewMetrics,
        ) => false,
    }
}

#[must_use]
pub fn permits(actor: &Actor, operation: Operation, owner: Option<i32>) -> bool {
    allowed(actor.role, operation, owner, actor.id)
}

#[must_use]
pub const fn list_scope(actor: &Actor) -> OrderScope {
    match actor.role {
        Role::Admin => OrderScope::All,
        Role::Technician => OrderScope::OwnedBy(actor.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_ID: i32 = 1;
    const TECH_ID: i32 = 2;
    const OTHER_TECH_ID: i32 = 3;

    #[test]
    fn test_admin_may_do_everything_on_any_order() {
        for op in [
            Operation::ViewAdminDashboard,
            Operation::CreateOrder,
            Operation::ViewOrder,
            Operation::EditOrder,
            Operation::DeleteOrder,
            Operation::ChangeStatus,
            Operation::CreateTechnician,
            Operation::ViewMetrics,
        ] {
            assert!(allowed(Role::Admin, op, Some(TECH_ID), ADMIN_ID), "{op:?}");
            assert!(allowed(Role::Admin, op, None, ADMIN_ID), "{op:?}");
        }
    }

    #[test]
    fn test_dashboards_are_role_specific() {
        assert!(!allowed(Role::Admin, Operation::ViewTechnicianDashboard, None, ADMIN_ID));
        assert!(allowed(Role::Technician, Operation::ViewTechnicianDashboard, None, TECH_ID));
        assert!(!allowed(Role::Technician, Operation::ViewAdminDashboard, None, TECH_ID));
    }

    #[test]
    fn test_technician_limited_to_own_orders() {
        for op in [
            Operation::CreateOrder,
            Operation::ViewOrder,
            Operation::EditOrder,
            Operation::ChangeStatus,
        ] {
            assert!(allowed(Role::Technician, op, Some(TECH_ID), TECH_ID), "{op:?}");
            assert!(!allowed(Role::Technician, op, Some(OTHER_TECH_ID), TECH_ID), "{op:?}");
            assert!(!allowed(Role::Technician, op, None, TECH_ID), "{op:?}");
        }
    }

    #[test]
    fn test_technician_never_deletes_or_manages_accounts() {
        assert!(!allowed(Role::Technician, Operation::DeleteOrder, Some(TECH_ID), TECH_ID));
        assert!(!allowed(Role::Technician, Operation::CreateTechnician, None, TECH_ID));
        assert!(!allowed(Role::Technician, Operation::ViewMetrics, None, TECH_ID));
    }

    #[test]
    fn test_list_scope() {
        let admin = Actor {
            id: ADMIN_ID,
            username: "admin".to_string(),
            role: Role::Admin,
        };
        let tech = Actor {
            id: TECH_ID,
            username: "tech".to_string(),
            role: Role::Technician,
        };

        assert_eq!(list_scope(&admin), OrderScope::All);
        assert_eq!(list_scope(&tech), OrderScope::OwnedBy(TECH_ID));
        assert_eq!(list_scope(&tech).owner(), Some(TECH_ID));
        assert!(permits(&tech, Operation::EditOrder, Some(TECH_ID)));
    }
}
