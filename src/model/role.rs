/// Roles carried in the backend's `role` claim.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin,
    Company,
    Worker,
}

impl Role {
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim {
            "ROLE_ADMIN" => Some(Role::Admin),
            "ROLE_EMPRESA" => Some(Role::Company),
            "ROLE_TRABAJADOR" => Some(Role::Worker),
            _ => None,
        }
    }

    /// Dashboard a freshly logged-in user lands on.
    ///
    /// Only companies get the company dashboard; any other claim, known or
    /// not, goes to the worker one.
    pub fn home_for_claim(claim: &str) -> &'static str {
        match Self::from_claim(claim) {
            Some(Role::Company) => "/empresa",
            _ => "/trabajador",
        }
    }
}
