//! The authenticated caller, passed explicitly into every service operation.

use uuid::Uuid;

use super::UserRole;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_staff: bool,
}

impl Principal {
    pub fn new(user_id: Uuid, role: UserRole, is_staff: bool) -> Self {
        Self {
            user_id,
            role,
            is_staff,
        }
    }

    /// Managers and staff users may moderate and read analytics.
    pub fn is_manager(&self) -> bool {
        self.is_staff || self.role.is_manager()
    }

    /// Allow the owner of `user_id`, or a manager.
    pub fn require_self_or_staff(&self, user_id: Uuid) -> AppResult<()> {
        if self.user_id == user_id || self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Allow only the owner of `user_id`.
    pub fn require_self(&self, user_id: Uuid) -> AppResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_role(&self, role: UserRole) -> AppResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_manager(&self) -> AppResult<()> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_or_staff() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let dater = Principal::new(me, UserRole::Dater, false);

        assert!(dater.require_self_or_staff(me).is_ok());
        assert!(matches!(
            dater.require_self_or_staff(other),
            Err(AppError::Forbidden)
        ));

        let staff_cupid = Principal::new(Uuid::new_v4(), UserRole::Cupid, true);
        assert!(staff_cupid.require_self_or_staff(other).is_ok());
        assert!(staff_cupid.require_manager().is_ok());
    }

    #[test]
    fn test_manager_role_counts_as_manager() {
        let manager = Principal::new(Uuid::new_v4(), UserRole::Manager, false);
        assert!(manager.require_manager().is_ok());
        assert!(manager.require_role(UserRole::Dater).is_err());
    }

    #[test]
    fn test_require_self_ignores_staff() {
        let staff = Principal::new(Uuid::new_v4(), UserRole::Manager, true);
        assert!(staff.require_self(Uuid::new_v4()).is_err());
    }
}
