use super::*;

#[test]
fn test_apply_defaults_to_all() {
    let d = Directive::builder(Action::Apply).build().unwrap();
    assert_eq!(d.count(), Some(Count::All));
    assert_eq!(d.bound(), RunBound::All);
    assert!(d.use_transactions());
    assert!(!d.dry_run());
    assert!(d.warnings().is_empty());
}

#[test]
fn test_apply_with_count() {
    let d = Directive::builder(Action::Apply).count(Some(2)).build().unwrap();
    assert_eq!(d.bound(), RunBound::Count(2));
}

#[test]
fn test_apply_destination_wins_over_count() {
    let d = Directive::builder(Action::Apply)
        .destination(Some("20240101000000-add-users".to_string()))
        .count(Some(5))
        .build()
        .unwrap();
    assert_eq!(
        d.bound(),
        RunBound::To("20240101000000-add-users".to_string())
    );
    assert_eq!(d.count(), None);
    assert_eq!(d.warnings().len(), 1);
    assert!(d.warnings()[0].contains("destination takes precedence"));
}

#[test]
fn test_revert_defaults_to_one() {
    let d = Directive::builder(Action::Revert).build().unwrap();
    assert_eq!(d.count(), Some(Count::Limited(1)));
    assert_eq!(d.bound(), RunBound::Count(1));
}

#[test]
fn test_revert_ignores_destination() {
    let d = Directive::builder(Action::Revert)
        .destination(Some("somewhere".to_string()))
        .count(Some(3))
        .build()
        .unwrap();
    assert_eq!(d.destination(), None);
    assert_eq!(d.bound(), RunBound::Count(3));
    assert_eq!(
        d.warnings(),
        &["destination is not honored for revert; use count".to_string()]
    );
}

#[test]
fn test_reset_is_always_all() {
    let d = Directive::builder(Action::Reset)
        .count(Some(2))
        .build()
        .unwrap();
    assert_eq!(d.count(), Some(Count::All));
    assert_eq!(d.bound(), RunBound::All);
    assert!(d.warnings()[0].contains("ignoring --count 2"));

    let plain = Directive::builder(Action::Reset).build().unwrap();
    assert_eq!(plain.bound(), RunBound::All);
    assert!(plain.warnings().is_empty());
}

#[test]
fn test_create_requires_name() {
    let err = Directive::builder(Action::Create).build().unwrap_err();
    assert!(matches!(err, CoreError::InvalidDirective { .. }));

    let err = Directive::builder(Action::DatabaseDrop)
        .name(Some("   ".to_string()))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("a database name"));
}

#[test]
fn test_seed_mode_validation() {
    let d = Directive::builder(Action::Seed)
        .mode(Some("static".to_string()))
        .build()
        .unwrap();
    assert_eq!(d.seed_source(), SeedSource::Static);

    let d = Directive::builder(Action::Seed).build().unwrap();
    assert_eq!(d.seed_source(), SeedSource::VersionControlled);

    let err = Directive::builder(Action::Seed)
        .mode(Some("dynamic".to_string()))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("unknown seed mode 'dynamic'"));
}

#[test]
fn test_invalid_scope_rejected() {
    let err = Directive::builder(Action::Apply)
        .scope(Some("../etc".to_string()))
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidDirective { .. }));
}

#[test]
fn test_build_is_deterministic() {
    let make = || {
        Directive::builder(Action::Apply)
            .scope(Some("billing".to_string()))
            .mode(Some("fast".to_string()))
            .count(Some(4))
            .dry_run(true)
            .use_transactions(false)
            .build()
            .unwrap()
    };
    assert_eq!(make(), make());
}

#[test]
fn test_run_request_carries_flags() {
    let d = Directive::builder(Action::Revert)
        .scope(Some("billing".to_string()))
        .mode(Some("fast".to_string()))
        .count(Some(2))
        .dry_run(true)
        .use_transactions(false)
        .build()
        .unwrap();
    let req = d.run_request();
    assert_eq!(req.bound, RunBound::Count(2));
    assert_eq!(req.scope.as_ref().map(|s| s.as_str()), Some("billing"));
    assert_eq!(req.mode.as_deref(), Some("fast"));
    assert!(req.dry_run);
    assert!(!req.use_transactions);
}

#[test]
fn test_ledger_names_are_scope_qualified() {
    let scoped = Directive::builder(Action::Apply)
        .scope(Some("billing".to_string()))
        .build()
        .unwrap()
        .run_request();
    assert_eq!(scoped.ledger_name("20240101-a"), "billing/20240101-a");
    assert!(scoped.owns_ledger_entry("billing/20240101-a"));
    assert!(!scoped.owns_ledger_entry("20240101-a"));
    assert!(!scoped.owns_ledger_entry("billing2/20240101-a"));
    assert_eq!(scoped.unit_name("billing/20240101-a"), "20240101-a");

    let unscoped = Directive::builder(Action::Apply).build().unwrap().run_request();
    assert_eq!(unscoped.ledger_name("20240101-a"), "20240101-a");
    assert!(unscoped.owns_ledger_entry("20240101-a"));
    assert!(!unscoped.owns_ledger_entry("billing/20240101-a"));
}

#[test]
fn test_run_bound_exhaustion() {
    assert!(RunBound::Count(0).is_exhausted(0));
    assert!(!RunBound::Count(2).is_exhausted(1));
    assert!(RunBound::Count(2).is_exhausted(2));
    assert!(!RunBound::All.is_exhausted(1_000));
    assert!(!RunBound::To("x".to_string()).is_exhausted(1_000));
}
