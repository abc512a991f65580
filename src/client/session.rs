use crate::models::user::UserProfile;

/// Who is using the form. Passed to the controller on submit.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(user: UserProfile) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn log_in(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    pub fn log_out(&mut self) {
        self.user = None;
    }
}
