use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use kili::{
    cli::Command,
    format_result,
    mutations::user::{
        GQL_CREATE_USER, GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS, GQL_RESET_PASSWORD, GQL_SIGN_IN,
        GQL_UPDATE_PASSWORD, GQL_UPDATE_PROPERTIES_IN_USER,
    },
    signin, Executor, GraphQlError, MutationsUser, QueriesUser, UserPropertiesUpdate, UsersFilter,
};
use serde_json::{json, Value};

/// Records every call and answers with a canned response.
struct StubExecutor {
    response: Value,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubExecutor {
    fn returning(response: Value) -> Self {
        Self { response, calls: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn single_call(&self) -> (String, Value) {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one execute call");
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Executor for StubExecutor {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        self.calls.lock().unwrap().push((document.to_string(), variables));
        Ok(self.response.clone())
    }
}

struct FailingExecutor;

#[async_trait]
impl Executor for FailingExecutor {
    async fn execute(&self, _document: &str, _variables: Value) -> Result<Value> {
        bail!("connection refused")
    }
}

fn user_payload() -> Value {
    json!({ "data": { "data": { "id": "u1", "email": "a@b.com" } } })
}

#[tokio::test]
async fn sign_in_sends_credentials_unchanged() -> Result<()> {
    let stub = StubExecutor::returning(json!({
        "data": { "data": { "id": "s1", "token": "tok", "user": { "id": "u1" } } }
    }));

    let result = MutationsUser::new(&stub).signin("a@b.com", "pw").await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_SIGN_IN);
    assert_eq!(variables, json!({ "email": "a@b.com", "password": "pw" }));
    assert_eq!(result, format_result("data", stub.response.clone())?);
    assert_eq!(result["token"], "tok");
    Ok(())
}

#[tokio::test]
async fn free_sign_in_matches_bound_method() -> Result<()> {
    let bound = StubExecutor::returning(user_payload());
    let free = StubExecutor::returning(user_payload());

    let from_method = MutationsUser::new(&bound).signin("a@b.com", "pw").await?;
    let from_function = signin(&free, "a@b.com", "pw").await?;

    assert_eq!(from_method, from_function);
    assert_eq!(bound.calls(), free.calls());
    Ok(())
}

#[tokio::test]
async fn create_user_renames_organization_role() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());

    let result = MutationsUser::new(&stub)
        .create_user("Ann", "a@b.com", "secret", "ADMIN")
        .await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_CREATE_USER);
    assert_eq!(
        variables,
        json!({
            "name": "Ann",
            "email": "a@b.com",
            "password": "secret",
            "organizationRole": "ADMIN"
        })
    );
    assert_eq!(result, json!({ "id": "u1", "email": "a@b.com" }));
    Ok(())
}

#[tokio::test]
async fn create_user_from_email_sends_project_id() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());

    MutationsUser::new(&stub)
        .create_user_from_email_if_not_exists("Ann", "a@b.com", "LABELER", "project-1")
        .await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS);
    assert_eq!(
        variables,
        json!({
            "name": "Ann",
            "email": "a@b.com",
            "organizationRole": "LABELER",
            "projectID": "project-1"
        })
    );
    Ok(())
}

#[tokio::test]
async fn update_password_renames_every_password_field() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());

    MutationsUser::new(&stub)
        .update_password("a@b.com", "old", "new", "new")
        .await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_UPDATE_PASSWORD);
    assert_eq!(
        variables,
        json!({
            "email": "a@b.com",
            "oldPassword": "old",
            "newPassword1": "new",
            "newPassword2": "new"
        })
    );
    Ok(())
}

#[tokio::test]
async fn reset_password_sends_only_email() -> Result<()> {
    let stub = StubExecutor::returning(json!({ "data": { "data": { "id": "u1" } } }));

    let result = MutationsUser::new(&stub).reset_password("a@b.com").await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_RESET_PASSWORD);
    assert_eq!(variables, json!({ "email": "a@b.com" }));
    assert_eq!(result, json!({ "id": "u1" }));
    Ok(())
}

#[tokio::test]
async fn update_properties_with_only_email_sends_nulls() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());

    MutationsUser::new(&stub)
        .update_properties_in_user("a@b.com", &UserPropertiesUpdate::default())
        .await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_UPDATE_PROPERTIES_IN_USER);
    assert_eq!(
        variables,
        json!({
            "email": "a@b.com",
            "name": null,
            "organizationId": null,
            "organizationRole": null,
            "activated": null
        })
    );
    Ok(())
}

#[tokio::test]
async fn update_properties_key_count_is_constant() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());
    let mutations = MutationsUser::new(&stub);

    mutations
        .update_properties_in_user("a@b.com", &UserPropertiesUpdate::default())
        .await?;
    let update = UserPropertiesUpdate {
        name: Some("Ann".into()),
        organization_id: Some("org-2".into()),
        organization_role: Some("REVIEWER".into()),
        activated: Some(false),
    };
    mutations.update_properties_in_user("a@b.com", &update).await?;

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    let sizes: Vec<usize> = calls
        .iter()
        .map(|(_, vars)| vars.as_object().map(|o| o.len()).unwrap_or(0))
        .collect();
    assert_eq!(sizes, vec![5, 5]);
    assert_eq!(
        calls[1].1,
        json!({
            "email": "a@b.com",
            "name": "Ann",
            "organizationId": "org-2",
            "organizationRole": "REVIEWER",
            "activated": false
        })
    );
    Ok(())
}

#[tokio::test]
async fn server_errors_pass_through_format_result() -> Result<()> {
    let response = json!({
        "data": null,
        "errors": [{ "message": "Invalid credentials" }]
    });
    let stub = StubExecutor::returning(response.clone());

    let err = MutationsUser::new(&stub).signin("a@b.com", "wrong").await.unwrap_err();
    let expected = format_result("data", response).unwrap_err();

    assert_eq!(stub.calls().len(), 1);
    assert_eq!(err.to_string(), expected.to_string());
    assert_eq!(
        err.downcast_ref::<GraphQlError>().map(|e| e.messages.clone()),
        Some(vec!["Invalid credentials".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn executor_failures_propagate() {
    let err = MutationsUser::new(&FailingExecutor)
        .reset_password("a@b.com")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "connection refused");
    assert!(err.downcast_ref::<GraphQlError>().is_none());
}

#[tokio::test]
async fn operations_accept_trait_objects() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());
    let dynamic: &dyn Executor = &stub;

    signin(dynamic, "a@b.com", "pw").await?;
    MutationsUser::new(dynamic).reset_password("a@b.com").await?;

    assert_eq!(stub.calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn users_query_filters_and_selects_fields() -> Result<()> {
    let stub = StubExecutor::returning(json!({
        "data": { "data": [{ "email": "a@b.com", "organization": { "id": "org-1" } }] }
    }));
    let filter = UsersFilter {
        email: Some("a@b.com".into()),
        fields: vec!["email".into(), "organization.id".into()],
        first: 10,
        skip: 5,
        ..UsersFilter::default()
    };

    let result = QueriesUser::new(&stub).users(&filter).await?;

    let (document, variables) = stub.single_call();
    assert!(document.contains("data: users(where: $where, first: $first, skip: $skip)"));
    assert!(document.contains("email organization { id }"));
    assert_eq!(
        variables,
        json!({
            "first": 10,
            "skip": 5,
            "where": { "email": "a@b.com", "organization": { "id": null } }
        })
    );
    assert_eq!(result[0]["organization"]["id"], "org-1");
    Ok(())
}

#[tokio::test]
async fn users_query_rejects_bad_input_locally() {
    let stub = StubExecutor::returning(user_payload());
    let queries = QueriesUser::new(&stub);

    let too_many = UsersFilter { first: 101, ..UsersFilter::default() };
    assert!(queries.users(&too_many).await.is_err());

    let unknown_field = UsersFilter { fields: vec!["password".into()], ..UsersFilter::default() };
    assert!(queries.users(&unknown_field).await.is_err());

    let bare_object = UsersFilter { fields: vec!["organization".into()], ..UsersFilter::default() };
    assert!(queries.users(&bare_object).await.is_err());

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn update_user_command_maps_to_property_update() -> Result<()> {
    let stub = StubExecutor::returning(user_payload());
    let command = Command::UpdateUser {
        email: "a@b.com".into(),
        name: None,
        organization_id: Some("org-2".into()),
        organization_role: None,
        activated: Some(true),
    };

    let result = command.run(&stub).await?;

    let (document, variables) = stub.single_call();
    assert_eq!(document, GQL_UPDATE_PROPERTIES_IN_USER);
    assert_eq!(
        variables,
        json!({
            "email": "a@b.com",
            "name": null,
            "organizationId": "org-2",
            "organizationRole": null,
            "activated": true
        })
    );
    assert_eq!(result, json!({ "id": "u1", "email": "a@b.com" }));
    Ok(())
}

#[tokio::test]
async fn each_command_runs_its_own_operation() -> Result<()> {
    let cases = [
        (
            Command::SignIn { email: "a@b.com".into(), password: "pw".into() },
            GQL_SIGN_IN,
        ),
        (
            Command::CreateUser {
                name: "Ann".into(),
                email: "a@b.com".into(),
                password: "pw".into(),
                organization_role: "USER".into(),
            },
            GQL_CREATE_USER,
        ),
        (
            Command::CreateUserFromEmail {
                name: "Ann".into(),
                email: "a@b.com".into(),
                organization_role: "READER".into(),
                project_id: "p1".into(),
            },
            GQL_CREATE_USER_FROM_EMAIL_IF_NOT_EXISTS,
        ),
        (
            Command::UpdatePassword {
                email: "a@b.com".into(),
                old_password: "old".into(),
                new_password_1: "new".into(),
                new_password_2: "new".into(),
            },
            GQL_UPDATE_PASSWORD,
        ),
        (Command::ResetPassword { email: "a@b.com".into() }, GQL_RESET_PASSWORD),
    ];

    for (command, expected) in cases {
        let stub = StubExecutor::returning(user_payload());
        command.run(&stub).await?;
        let (document, _) = stub.single_call();
        assert_eq!(document, expected);
    }
    Ok(())
}

#[tokio::test]
async fn users_command_builds_filter() -> Result<()> {
    let stub = StubExecutor::returning(json!({ "data": { "data": [] } }));
    let command = Command::Users {
        email: None,
        organization_id: Some("org-1".into()),
        fields: vec!["id".into()],
        first: 20,
        skip: 40,
    };

    command.run(&stub).await?;

    let (_, variables) = stub.single_call();
    assert_eq!(
        variables,
        json!({
            "first": 20,
            "skip": 40,
            "where": { "email": null, "organization": { "id": "org-1" } }
        })
    );
    Ok(())
}
