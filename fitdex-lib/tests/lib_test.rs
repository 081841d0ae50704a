use anyhow::Result;
use fitdex_lib::{
    AppService, Catalog, Config, CustomId, DbError, DeleteState, ExerciseId, ExerciseRemover,
    ExerciseResolver, ExerciseStore, ExerciseUpdate, Muscle, Navigator, OriginFilter, Route,
    DELETE_ACTION_INDEX,
};
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

// Helper function to create a test service with in-memory database
fn create_test_service() -> Result<AppService> {
    let store = ExerciseStore::open_in_memory()?;
    Ok(AppService {
        config: Config::default(),
        store,
        resolver: ExerciseResolver::new(Catalog::bundled()?),
        db_path: ":memory:".into(),
        config_path: "test_config.toml".into(),
    })
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Vec<Route>,
    back_calls: usize,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: Route) {
        self.routes.push(route);
    }
    fn go_back(&mut self) {
        self.back_calls += 1;
    }
}

// Wraps the real store and records what was asked of it
struct CountingRemover<'a> {
    store: &'a ExerciseStore,
    calls: RefCell<Vec<CustomId>>,
}

impl<'a> CountingRemover<'a> {
    fn new(store: &'a ExerciseStore) -> Self {
        Self {
            store,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ExerciseRemover for CountingRemover<'_> {
    fn remove(&self, id: CustomId) -> Result<u64, DbError> {
        self.calls.borrow_mut().push(id);
        self.store.remove(id)
    }
}

fn create_curl(service: &AppService) -> Result<ExerciseId> {
    service.create_exercise(
        "Cable Curl",
        Some("Elbows pinned."),
        &[Muscle::Biceps],
        &[Muscle::Forearms],
    )
}

fn wait_until_resolved(screen: &mut fitdex_lib::DetailsScreen) {
    for _ in 0..200 {
        if !screen.is_resolving() {
            return;
        }
        screen.tick();
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("custom exercise fetch did not finish");
}

#[test]
fn test_built_in_lookup_is_memoized() -> Result<()> {
    let mut service = create_test_service()?;
    let id: ExerciseId = "barbell_bench_press".parse()?;

    let first = service.resolve_exercise(&id).expect("bench press is bundled");
    let second = service.resolve_exercise(&id).expect("bench press is bundled");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(service.resolver.cached_len(), 1);

    // Misses are memoized too
    let missing: ExerciseId = "no_such_lift".parse()?;
    assert!(service.resolve_exercise(&missing).is_none());
    assert!(service.resolve_exercise(&missing).is_none());
    assert_eq!(service.resolver.cached_len(), 2);
    Ok(())
}

#[test]
fn test_built_in_details_render_localized_body_without_controls() -> Result<()> {
    let mut service = create_test_service()?;
    let screen = service.open_details("barbell_bench_press".parse()?);

    assert!(!screen.is_resolving());
    assert!(screen.header_controls().is_none());
    assert!(screen.actions().is_none());

    let body = screen.body().expect("built-in resolves synchronously");
    assert_eq!(body.title, "Bench press");
    assert_eq!(body.primary_caption, "Primary muscle");
    assert_eq!(body.primary_muscles, "Chest");
    assert_eq!(
        body.secondary,
        Some(("Secondary muscles".to_string(), "Shoulders, Triceps".to_string()))
    );
    assert!(body.notes.is_none());
    Ok(())
}

#[test]
fn test_single_secondary_uses_singular_caption() -> Result<()> {
    let mut service = create_test_service()?;
    let screen = service.open_details("plank".parse()?);
    let body = screen.body().expect("plank is bundled");
    assert_eq!(body.title, "Plank");
    assert_eq!(body.notes.as_deref(), Some("Hold without letting the hips sag."));
    assert_eq!(
        body.secondary,
        Some(("Secondary muscle".to_string(), "Obliques".to_string()))
    );

    let flyes = service.open_details("dumbbell_flyes".parse()?);
    assert!(flyes.body().expect("flyes are bundled").secondary.is_none());
    Ok(())
}

#[test]
fn test_unknown_ids_render_nothing() -> Result<()> {
    let mut service = create_test_service()?;

    let built_in = service.open_details("no_such_lift".parse()?);
    assert!(built_in.body().is_none());
    assert!(built_in.header_controls().is_none());

    let mut custom = service.open_details("custom_999".parse()?);
    wait_until_resolved(&mut custom);
    assert!(custom.exercise().is_none());
    assert!(custom.body().is_none());
    // Controls depend on the id, not on whether the record exists
    assert!(custom.header_controls().is_some());
    Ok(())
}

#[test]
fn test_custom_details_arrive_asynchronously() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;

    let mut screen = service.open_details(id.clone());
    let controls = screen
        .header_controls()
        .expect("custom exercises get controls while loading");
    assert_eq!(controls.edit_label, "Edit");
    assert_eq!(controls.overflow_actions, vec!["Delete".to_string()]);
    assert_eq!(controls.destructive_index, DELETE_ACTION_INDEX);

    wait_until_resolved(&mut screen);
    let body = screen.body().expect("record exists");
    assert_eq!(body.title, "Cable Curl");
    assert_eq!(body.notes.as_deref(), Some("Elbows pinned."));
    assert_eq!(body.primary_muscles, "Biceps");
    assert_eq!(screen.exercise().map(|e| e.id.clone()), Some(id));
    Ok(())
}

#[test]
fn test_custom_lookups_are_not_memoized() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;

    let before = service.resolve_exercise(&id).expect("record exists");
    service.edit_exercise(
        &id,
        ExerciseUpdate {
            name: Some("Spider Curl".into()),
            ..Default::default()
        },
    )?;
    let after = service.resolve_exercise(&id).expect("record exists");

    assert_eq!(before.name, "Cable Curl");
    assert_eq!(after.name, "Spider Curl");
    assert_eq!(service.resolver.cached_len(), 0);
    Ok(())
}

#[test]
fn test_pending_fetch_poll_and_wait() -> Result<()> {
    let service = create_test_service()?;
    let id = create_curl(&service)?;
    let custom_id = id.as_custom().expect("created ids are custom");

    let pending = service.store.fetch(custom_id);
    assert_eq!(pending.id(), custom_id);
    let exercise = pending.wait().expect("record exists");
    assert_eq!(exercise.name, "Cable Curl");

    let pending = service.store.fetch(custom_id);
    let polled = loop {
        if let Some(result) = pending.poll() {
            break result;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert!(polled.is_some());
    Ok(())
}

#[test]
fn test_delete_confirm_flow() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;
    let custom_id = id.as_custom().expect("created ids are custom");

    let mut screen = service.open_details(id);
    wait_until_resolved(&mut screen);
    let mut nav = RecordingNavigator::default();
    let remover = CountingRemover::new(&service.store);

    let actions = screen.actions_mut().expect("custom exercises have actions");
    assert!(actions.select_overflow(DELETE_ACTION_INDEX));
    assert_eq!(actions.state(), DeleteState::ConfirmingDelete);

    let result = actions.confirm_delete(&remover, &mut nav);
    assert!(matches!(result, Some(Ok(1))));
    assert_eq!(*remover.calls.borrow(), vec![custom_id]);
    assert_eq!(nav.back_calls, 1);

    assert!(screen.is_deleting());
    assert!(!screen.is_delete_dialog_visible());
    assert!(screen.body().is_none());
    assert!(screen.header_controls().is_none());
    assert!(service.get_custom_exercise(custom_id)?.is_none());
    Ok(())
}

#[test]
fn test_delete_dismiss_keeps_exercise() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;
    let custom_id = id.as_custom().expect("created ids are custom");

    let mut screen = service.open_details(id);
    let remover = CountingRemover::new(&service.store);
    let actions = screen.actions_mut().expect("custom exercises have actions");

    assert!(actions.select_overflow(DELETE_ACTION_INDEX));
    assert!(actions.dismiss_delete());
    assert_eq!(actions.state(), DeleteState::Idle);
    assert!(!screen.is_delete_dialog_visible());
    assert!(remover.calls.borrow().is_empty());
    assert!(service.get_custom_exercise(custom_id)?.is_some());
    Ok(())
}

#[test]
fn test_delete_dialog_waits_for_the_record() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;

    let mut screen = service.open_details(id);
    assert!(screen.is_resolving());
    screen
        .actions_mut()
        .expect("custom exercises have actions")
        .select_overflow(DELETE_ACTION_INDEX);
    assert!(!screen.is_delete_dialog_visible());
    assert!(screen.delete_dialog().is_none());

    screen.wait();
    assert!(screen.is_delete_dialog_visible());
    let (title, description) = screen.delete_dialog().expect("record exists");
    let body = screen.body().expect("record exists");
    assert_eq!(title, body.delete_dialog_title);
    assert_eq!(description, body.delete_dialog_description);
    assert_eq!(title, "Delete exercise");
    Ok(())
}

#[test]
fn test_missing_exercise_never_shows_delete_dialog() -> Result<()> {
    let mut service = create_test_service()?;
    let mut screen = service.open_details("custom_999".parse()?);
    wait_until_resolved(&mut screen);

    let actions = screen.actions_mut().expect("custom ids have actions");
    assert!(actions.select_overflow(DELETE_ACTION_INDEX));
    assert_eq!(actions.state(), DeleteState::ConfirmingDelete);

    assert!(screen.body().is_none());
    assert!(!screen.is_delete_dialog_visible());
    assert!(screen.delete_dialog().is_none());
    Ok(())
}

#[test]
fn test_edit_navigates_with_or_without_dialog() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;
    let custom_id = id.as_custom().expect("created ids are custom");

    let mut screen = service.open_details(id);
    let mut nav = RecordingNavigator::default();
    let actions = screen.actions_mut().expect("custom exercises have actions");

    assert!(actions.edit(&mut nav));
    actions.select_overflow(DELETE_ACTION_INDEX);
    assert!(actions.edit(&mut nav));
    // The dialog is left as it was
    assert!(actions.is_dialog_visible());

    assert_eq!(
        nav.routes,
        vec![Route::EditExercise(custom_id), Route::EditExercise(custom_id)]
    );
    assert_eq!(nav.back_calls, 0);
    Ok(())
}

#[test]
fn test_delete_of_vanished_exercise_still_goes_back() -> Result<()> {
    let mut service = create_test_service()?;
    let id = create_curl(&service)?;
    let custom_id = id.as_custom().expect("created ids are custom");

    let mut screen = service.open_details(id);
    // Removed behind the screen's back
    service.store.delete_by_id(custom_id)?;

    let mut nav = RecordingNavigator::default();
    let actions = screen.actions_mut().expect("custom exercises have actions");
    actions.select_overflow(DELETE_ACTION_INDEX);
    let result = actions.confirm_delete(&service.store, &mut nav);

    assert!(matches!(result, Some(Err(DbError::ExerciseNotFound(_)))));
    assert_eq!(nav.back_calls, 1);
    assert!(screen.is_deleting());
    Ok(())
}

#[test]
fn test_create_exercise_validation() -> Result<()> {
    let service = create_test_service()?;

    assert!(service
        .create_exercise("   ", None, &[Muscle::Chest], &[])
        .is_err());
    assert!(service.create_exercise("Press", None, &[], &[]).is_err());
    let overlap = service
        .create_exercise("Press", None, &[Muscle::Chest], &[Muscle::Chest])
        .unwrap_err();
    assert!(overlap.to_string().contains("both primary and secondary"));

    let id = service.create_exercise("  Landmine Press ", Some("  "), &[Muscle::Shoulders], &[])?;
    let stored = service
        .get_custom_exercise(id.as_custom().expect("created ids are custom"))?
        .expect("just created");
    assert_eq!(stored.name, "Landmine Press");
    assert!(stored.notes.is_none());
    assert!(stored.created_at.is_some());
    Ok(())
}

#[test]
fn test_create_exercise_unique_name() -> Result<()> {
    let service = create_test_service()?;
    service.create_exercise("Cable Curl", None, &[Muscle::Biceps], &[])?;

    let result = service.create_exercise("cable curl", None, &[Muscle::Biceps], &[]);
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Exercise name must be unique"));

    assert!(service
        .create_exercise("Preacher Curl", None, &[Muscle::Biceps], &[])
        .is_ok());
    Ok(())
}

#[test]
fn test_edit_exercise() -> Result<()> {
    let service = create_test_service()?;
    let id = create_curl(&service)?;
    service.create_exercise("Hammer Curl Variant", None, &[Muscle::Biceps], &[])?;

    let built_in: ExerciseId = "plank".parse()?;
    assert!(service
        .edit_exercise(
            &built_in,
            ExerciseUpdate {
                name: Some("Board".into()),
                ..Default::default()
            }
        )
        .unwrap_err()
        .to_string()
        .contains("cannot be edited"));

    assert!(service
        .edit_exercise(&id, ExerciseUpdate::default())
        .is_err());

    // Would make forearms both primary and secondary
    assert!(service
        .edit_exercise(
            &id,
            ExerciseUpdate {
                primary: Some(vec![Muscle::Forearms]),
                ..Default::default()
            }
        )
        .is_err());

    let taken = service
        .edit_exercise(
            &id,
            ExerciseUpdate {
                name: Some("hammer curl variant".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(taken.to_string().contains("already taken"));

    let updated = service.edit_exercise(
        &id,
        ExerciseUpdate {
            notes: Some(None),
            secondary: Some(vec![]),
            primary: Some(vec![Muscle::Forearms, Muscle::Biceps]),
            ..Default::default()
        },
    )?;
    assert_eq!(updated, 1);
    let stored = service
        .get_custom_exercise(id.as_custom().expect("created ids are custom"))?
        .expect("still there");
    assert!(stored.notes.is_none());
    assert!(stored.secondary.is_empty());
    assert_eq!(stored.primary, vec![Muscle::Forearms, Muscle::Biceps]);

    let missing: ExerciseId = "custom_4242".parse()?;
    assert!(service
        .edit_exercise(
            &missing,
            ExerciseUpdate {
                name: Some("Ghost".into()),
                ..Default::default()
            }
        )
        .is_err());
    Ok(())
}

#[test]
fn test_list_exercises_filters() -> Result<()> {
    let service = create_test_service()?;
    let id = create_curl(&service)?;

    let all = service.list_exercises(OriginFilter::All, None)?;
    let built_ins = service.list_exercises(OriginFilter::BuiltIn, None)?;
    let customs = service.list_exercises(OriginFilter::Custom, None)?;
    assert_eq!(all.len(), built_ins.len() + 1);
    assert_eq!(customs.len(), 1);
    assert_eq!(customs[0].id, id);
    assert!(built_ins.iter().all(|s| !s.id.is_custom()));

    // Sorted by display name, localized names included
    let names: Vec<String> = all.iter().map(|s| s.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(all.iter().any(|s| s.name == "Bench press"));

    // Forearms is only secondary on the custom curl
    let forearms = service.list_exercises(OriginFilter::Custom, Some(Muscle::Forearms))?;
    assert_eq!(forearms.len(), 1);
    let neck = service.list_exercises(OriginFilter::All, Some(Muscle::Neck))?;
    assert!(neck.iter().all(|s| !s.id.is_custom()));
    assert!(!neck.is_empty());
    Ok(())
}

#[test]
fn test_parse_exercise_id() {
    assert!(AppService::parse_exercise_id("").is_err());
    assert!(AppService::parse_exercise_id("custom_abc").is_err());
    assert_eq!(
        AppService::parse_exercise_id("custom_12").unwrap(),
        ExerciseId::Custom(CustomId::from_row_id(12))
    );
    assert_eq!(
        AppService::parse_exercise_id("plank").unwrap(),
        ExerciseId::BuiltIn("plank".into())
    );
}
