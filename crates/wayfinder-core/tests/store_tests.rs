//! Store tests: remote error mapping and admin mutations

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wayfinder_core::{
    ChangeFilter, ChangeStream, NavConfig, NavError, NavStore, NavigationService,
    RemoteDataService, RemoteError,
};
use wayfinder_model::{
    default_nav_items, NavItem, NavItemId, Profile, RoleNavConfig, SessionEvent, UnreadTotals,
    UserId,
};
use wayfinder_test_utils::{administrator, campus_remote, root_ids, student};

mock! {
    pub Remote {}

    #[async_trait]
    impl RemoteDataService for Remote {
        async fn list_nav_items(&self) -> Result<Vec<NavItem>, RemoteError>;
        async fn list_role_configs(&self) -> Result<Vec<RoleNavConfig>, RemoteError>;
        async fn unread_totals(&self, user: &UserId) -> Result<UnreadTotals, RemoteError>;
        async fn subscribe(
            &self,
            table: &str,
            filter: &ChangeFilter,
        ) -> Result<ChangeStream, RemoteError>;
        async fn current_session(&self) -> Result<Option<Profile>, RemoteError>;
        async fn create_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError>;
        async fn update_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError>;
        async fn delete_nav_item(&self, caller: &Profile, id: &NavItemId) -> Result<(), RemoteError>;
    }
}

fn store_over(mock: MockRemote) -> NavStore {
    NavStore::new(Arc::new(mock), default_nav_items())
}

#[tokio::test]
async fn test_forbidden_write_is_unauthorized_and_not_retried() {
    let mut mock = MockRemote::new();
    mock.expect_create_nav_item()
        .times(1)
        .returning(|_, _| Err(RemoteError::Forbidden("row-level policy".into())));
    let store = store_over(mock);

    let err = store
        .create(&student(), NavItem::route("x", "X", "/x"))
        .await
        .unwrap_err();

    assert!(matches!(err, NavError::UnauthorizedAction(_)));
    assert!(err.is_permission_error());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unavailable_read_is_retryable_fetch_failure() {
    let mut mock = MockRemote::new();
    mock.expect_list_nav_items()
        .times(1)
        .returning(|| Err(RemoteError::Unavailable("timeout".into())));
    let store = store_over(mock);

    let err = store.list().await.unwrap_err();

    assert!(matches!(
        err,
        NavError::FetchFailure { operation: "list nav items", .. }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_decode_failure_is_not_retryable() {
    let mut mock = MockRemote::new();
    mock.expect_list_role_configs()
        .returning(|| Err(RemoteError::Decode("bad role 'janitor'".into())));
    let store = store_over(mock);

    let err = store.list_role_configs().await.unwrap_err();

    assert!(matches!(err, NavError::FetchFailure { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_list_or_default_falls_back_on_failure() {
    let mut mock = MockRemote::new();
    mock.expect_list_nav_items()
        .returning(|| Err(RemoteError::Unavailable("offline".into())));
    let store = store_over(mock);

    assert_eq!(store.list_or_default().await, default_nav_items());
}

#[tokio::test]
async fn test_delete_missing_item_is_not_found() {
    let mut mock = MockRemote::new();
    mock.expect_delete_nav_item()
        .with(eq(administrator()), eq(NavItemId::new("ghost")))
        .times(1)
        .returning(|_, id| Err(RemoteError::NotFound(id.to_string())));
    let store = store_over(mock);

    let err = store
        .delete(&administrator(), &NavItemId::new("ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, NavError::NotFound(ref what) if what == "ghost"));
}

#[tokio::test]
async fn test_restore_failure_surfaces_fetch_failure() {
    let mut mock = MockRemote::new();
    mock.expect_current_session()
        .returning(|| Err(RemoteError::Unavailable("auth down".into())));
    let service = NavigationService::new(Arc::new(mock), NavConfig::default()).unwrap();

    let err = service.restore_session().await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(service.profile(), None);
}

#[tokio::test]
async fn test_admin_changes_show_on_next_refresh() {
    let remote = Arc::new(campus_remote());
    let service = NavigationService::new(remote.clone(), NavConfig::default()).unwrap();
    service
        .handle_session_event(SessionEvent::SignedIn(student()))
        .await;
    let admin = administrator();

    let mut renamed = remote.item("dashboard").unwrap();
    renamed.label = "Home base".into();
    service.store().update(&admin, renamed).await.unwrap();
    service
        .store()
        .delete(&admin, &NavItemId::new("library"))
        .await
        .unwrap();
    service.refresh(&student()).await;

    let forest = service.forest();
    assert_eq!(
        root_ids(&forest),
        vec!["dashboard", "pedagogy", "comms", "logout"]
    );
    let dashboard = forest.find("dashboard").and_then(|idx| forest.item(idx)).unwrap();
    assert_eq!(dashboard.label, "Home base");
}

#[tokio::test]
async fn test_non_admin_mutations_are_refused_by_remote() {
    let remote = Arc::new(campus_remote());
    let store = NavStore::new(remote.clone(), default_nav_items());

    let err = store
        .delete(&student(), &NavItemId::new("dashboard"))
        .await
        .unwrap_err();

    assert!(err.is_permission_error());
    assert!(remote.item("dashboard").is_some());

    let created = store
        .create(&administrator(), NavItem::route("forum", "Forum", "/forum"))
        .await
        .unwrap();
    assert_eq!(created.id, NavItemId::new("forum"));

    let missing = store
        .update(&administrator(), NavItem::route("nope", "Nope", "/nope"))
        .await
        .unwrap_err();
    assert!(matches!(missing, NavError::NotFound(_)));
}
