// Every top-level field is aliased `data` so responses unwrap with `format_result("data", ..)`.

pub const GQL_SIGN_IN: &str = r#"
mutation($email: String!, $password: String!) {
  data: signIn(email: $email, password: $password) {
    id
    token
    user {
      id
    }
  }
}
"#;

pub const GQL_CREATE_USER: &str = r#"
mutation($name: String!, $email: String!, $password: String!, $organizationRole: OrganizationRole!) {
  data: createUser(name: $name, email: $email, password: $password, organizationRole: $organizationRole) {
    id
    email
    name
    organizationRole
    activated
  }
}
"#;

pub const GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS: &str = r#"
mutation($name: String!, $email: String!, $organizationRole: OrganizationRole!, $projectID: ID!) {
  data: createUserFromEmailIfNotExists(name: $name, email: $email, organizationRole: $organizationRole, projectID: $projectID) {
    id
    email
    name
    organizationRole
    activated
  }
}
"#;

pub const GQL_UPDATE_PASSWORD: &str = r#"
mutation($email: String!, $oldPassword: String!, $newPassword1: String!, $newPassword2: String!) {
  data: updatePassword(email: $email, oldPassword: $oldPassword, newPassword1: $newPassword1, newPassword2: $newPassword2) {
    id
    email
  }
}
"#;

pub const GQL_RESET_PASSWORD: &str = r#"
mutation($email: String!) {
  data: resetPassword(email: $email) {
    id
    email
  }
}
"#;

pub const GQL_UPDATE_PROPERTIES_IN_USER: &str = r#"
mutation($email: String!, $name: String, $organizationId: String, $organizationRole: OrganizationRole, $activated: Boolean) {
  data: updatePropertiesInUser(email: $email, name: $name, organizationId: $organizationId, organizationRole: $organizationRole, activated: $activated) {
    id
    email
    name
    organizationRole
    activated
  }
}
"#;
