//! Users, employees and roles.

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    roles::RoleOption,
    users::{User, UserId},
    validation::{EmployeeEdit, EmployeeForm, ProfileForm},
};
use mockall::automock;
use serde::Serialize;
use serde_json::json;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate<'a> {
    user_id: &'a UserId,

    #[serde(flatten)]
    form: &'a ProfileForm,
}

/// [`UsersService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpUsersService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpUsersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUsersService").finish_non_exhaustive()
    }
}

impl HttpUsersService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UsersService for HttpUsersService {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::ALL_USERS))
            .await?
            .into_data()
    }

    async fn list_roles(&self) -> Result<Vec<RoleOption>, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::ALL_ROLES))
            .await?
            .into_data()
    }

    async fn add_employee(&self, form: EmployeeForm) -> Result<String, ApiError> {
        form.validate()?;

        let request = ApiRequest::new(Endpoint::ADD_ADMIN_EMPLOYEE).with_body(&form)?;

        mutate(self.transport.as_ref(), request, "Employee added").await
    }

    async fn update_employee(&self, edit: EmployeeEdit) -> Result<String, ApiError> {
        edit.validate()?;

        let request = ApiRequest::new(Endpoint::UPDATE_USER).with_body(&edit)?;

        mutate(self.transport.as_ref(), request, "User updated").await
    }

    async fn update_profile(&self, user: UserId, form: ProfileForm) -> Result<String, ApiError> {
        let form = form.trimmed();

        form.validate()?;

        let request = ApiRequest::new(Endpoint::UPDATE_USER).with_body(&ProfileUpdate {
            user_id: &user,
            form: &form,
        })?;

        mutate(self.transport.as_ref(), request, "Profile updated").await
    }

    async fn delete_user(&self, user: UserId) -> Result<String, ApiError> {
        let request = ApiRequest::new(Endpoint::DELETE_USER).with_body(&json!({ "_id": user }))?;

        mutate(self.transport.as_ref(), request, "User deleted").await
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Every account.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Role catalogue for the employee form.
    async fn list_roles(&self) -> Result<Vec<RoleOption>, ApiError>;

    /// Create an employee account.
    async fn add_employee(&self, form: EmployeeForm) -> Result<String, ApiError>;

    /// Edit an employee's name, email, picture or role.
    async fn update_employee(&self, edit: EmployeeEdit) -> Result<String, ApiError>;

    /// Edit the signed-in user's own profile.
    async fn update_profile(&self, user: UserId, form: ProfileForm) -> Result<String, ApiError>;

    /// Delete an account.
    async fn delete_user(&self, user: UserId) -> Result<String, ApiError>;
}
