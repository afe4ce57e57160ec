mod common;

use std::collections::BTreeSet;

use common::{FakeBackend, brand, company, task_type, user_in};
use taskdeck::utils::errors::ErrorKind;
use taskdeck::workflows::{AssignPage, EventBus, PageState};
use taskdeck_api::ManagerTier;
use taskdeck_core::ActorContext;
use taskdeck_models::{BrandAssignment, BrandId, CompanyId, RoleKey, TaskTypeId, User, UserId};

const ACME: &str = "Acme";
const SPEED: &str = "Speed E Com";

fn admin() -> User {
    user_in("admin-1", RoleKey::Admin, None, None)
}

fn seeded_backend() -> FakeBackend {
    let backend = FakeBackend::new();
    {
        let mut state = backend.state();
        state.companies = vec![company(ACME, &["t1", "t2"]), company(SPEED, &[])];
        state.users = vec![
            admin(),
            user_in("mgr-1", RoleKey::Manager, None, Some(ACME)),
            user_in("asst-1", RoleKey::Assistant, Some("mgr-1"), Some(ACME)),
            user_in("sbm-1", RoleKey::Sbm, None, Some(SPEED)),
            user_in("rm-1", RoleKey::Rm, Some("sbm-1"), Some(SPEED)),
            user_in("am-1", RoleKey::Am, Some("rm-1"), Some(SPEED)),
        ];
        state.brands = vec![
            brand("b-a", "Alpha", Some(ACME)),
            brand("b-b", "Beta", Some(ACME)),
            brand("b-c", "Gamma", Some(ACME)),
        ];
        state.task_types = vec![
            task_type("t1", "Follow Up", Some(ACME)),
            task_type("t2", "Escalation", Some(ACME)),
            task_type("t3", "Meeting Pending", None),
            task_type("t4", "CP Pending", None),
            task_type("t5", "Recharge Negative", None),
        ];
    }
    backend
}

fn mapping(company: &str, user: &str, brand: &str, name: &str, tts: &[&str]) -> BrandAssignment {
    BrandAssignment {
        company_name: company.to_string(),
        user_id: UserId::new(user),
        brand_id: BrandId::new(brand),
        brand_name: name.to_string(),
        task_type_ids: tts.iter().map(|t| TaskTypeId::new(*t)).collect(),
    }
}

fn page_for(backend: &FakeBackend, actor: User) -> AssignPage<FakeBackend> {
    AssignPage::new(backend.clone(), ActorContext::new(actor), EventBus::default())
}

#[tokio::test]
async fn apply_upserts_selection_and_removes_unchecked() {
    let backend = seeded_backend();
    backend.state().mappings = vec![
        mapping(ACME, "asst-1", "b-b", "Beta", &["t1"]),
        mapping(ACME, "asst-1", "b-c", "Gamma", &["t1"]),
    ];
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();

    // move the selection from {B, C} to {A, B}
    page.toggle_brand(&BrandId::new("b-c")).unwrap();
    page.toggle_brand(&BrandId::new("b-a")).unwrap();
    page.apply().await.unwrap();

    let state = backend.state();
    let batch = state.upsert_batches.last().unwrap();
    let upserted: BTreeSet<&str> = batch
        .iter()
        .filter(|m| !m.task_type_ids.is_empty())
        .map(|m| m.brand_id.as_str())
        .collect();
    let removed: BTreeSet<&str> = batch
        .iter()
        .filter(|m| m.task_type_ids.is_empty())
        .map(|m| m.brand_id.as_str())
        .collect();
    assert_eq!(upserted, BTreeSet::from(["b-a", "b-b"]));
    assert_eq!(removed, BTreeSet::from(["b-c"]));
    // the store dropped the emptied mapping instead of keeping an empty set
    assert!(!state.mappings.iter().any(|m| m.brand_id.as_str() == "b-c"));
    assert_eq!(page.state, PageState::Ready);
}

#[tokio::test]
async fn apply_publishes_a_change_event() {
    let backend = seeded_backend();
    backend.state().mappings = vec![mapping(ACME, "asst-1", "b-b", "Beta", &["t1"])];
    let bus = EventBus::default();
    let mut rx = bus.subscribe();
    let mut page = AssignPage::new(backend.clone(), ActorContext::new(admin()), bus);

    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();
    page.apply().await.unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.company_name, ACME);
    assert_eq!(event.user_id, UserId::new("asst-1"));
}

#[tokio::test]
async fn empty_apply_is_rejected_before_any_request() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();

    let err = page.apply().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(backend.state().upsert_batches.is_empty());
}

#[tokio::test]
async fn brands_without_task_types_are_rejected() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();
    page.toggle_brand(&BrandId::new("b-a")).unwrap();

    let err = page.apply().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(backend.state().upsert_batches.is_empty());
}

#[tokio::test]
async fn failed_apply_surfaces_error_and_resyncs() {
    let backend = seeded_backend();
    backend.state().mappings = vec![mapping(ACME, "asst-1", "b-b", "Beta", &["t1"])];
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();
    page.toggle_brand(&BrandId::new("b-a")).unwrap();

    backend.fail_next("mapping store unavailable");
    let err = page.apply().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api);
    assert!(matches!(page.state, PageState::Error(_)));
    // selection reverted to the server snapshot
    assert_eq!(
        page.selected_brands,
        BTreeSet::from([BrandId::new("b-b")])
    );
}

#[tokio::test]
async fn loading_a_user_drops_disallowed_pending_task_types() {
    let backend = seeded_backend();
    // t9 is not in Acme's allow-list
    backend.state().mappings =
        vec![mapping(ACME, "asst-1", "b-b", "Beta", &["t1", "t9"])];

    // a manager is subject to the allow-list
    let mut page = page_for(&backend, user_in("mgr-1", RoleKey::Manager, None, Some(ACME)));
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();
    assert_eq!(
        page.pending_task_types,
        BTreeSet::from([TaskTypeId::new("t1")])
    );

    // an admin bypasses it
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();
    page.select_user(&UserId::new("asst-1")).await.unwrap();
    assert_eq!(
        page.pending_task_types,
        BTreeSet::from([TaskTypeId::new("t1"), TaskTypeId::new("t9")])
    );
}

#[tokio::test]
async fn bulk_brand_creation_uses_fixed_task_types_when_allow_list_is_empty() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());
    page.select_company(SPEED).await.unwrap();

    let created = page
        .bulk_create_brands(
            &["NewBrand One".to_string(), "NewBrand Two".to_string()],
            "rm-1@taskdeck.test",
            "am-1@taskdeck.test",
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let state = backend.state();
    let batch = state.upsert_batches.last().unwrap();
    // two brands x two users
    assert_eq!(batch.len(), 4);
    let expected: BTreeSet<TaskTypeId> = ["t3", "t4", "t5"]
        .into_iter()
        .map(TaskTypeId::new)
        .collect();
    for upsert in batch {
        assert_eq!(upsert.task_type_ids, expected);
    }
    let users: BTreeSet<&str> = batch.iter().map(|m| m.user_id.as_str()).collect();
    assert_eq!(users, BTreeSet::from(["rm-1", "am-1"]));
}

#[tokio::test]
async fn bulk_brand_creation_is_speedecom_only() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());
    page.select_company(ACME).await.unwrap();

    let err = page
        .bulk_create_brands(
            &["NewBrand".to_string()],
            "rm-1@taskdeck.test",
            "am-1@taskdeck.test",
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn manager_company_assignment_checks_the_tier_role() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());
    let companies: BTreeSet<CompanyId> = [CompanyId::new(ACME)].into_iter().collect();

    let sbm = user_in("sbm-1", RoleKey::Sbm, None, Some(SPEED));
    page.set_manager_companies(ManagerTier::Sbm, &sbm, &companies)
        .await
        .unwrap();
    assert_eq!(backend.state().manager_company_calls.len(), 1);

    let err = page
        .set_manager_companies(ManagerTier::MdManager, &sbm, &companies)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn company_profile_restricts_visible_users() {
    let backend = seeded_backend();
    let mut page = page_for(&backend, admin());

    page.select_company(SPEED).await.unwrap();
    let roles: BTreeSet<&str> = page.users.iter().map(|u| u.role.as_str()).collect();
    assert_eq!(roles, BTreeSet::from(["sbm", "rm", "am"]));
}
