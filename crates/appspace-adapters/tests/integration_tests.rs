//! End-to-end tests: the registry engine driven through the production
//! adapters.
//!
//! The fixtures mirror a typical bootstrap: a path table registered once,
//! appspaces declared from patterns, components resolved lazily by label
//! afterwards.

use std::sync::{Arc, Once};

use appspace_adapters::{SimpleEventBus, TableResolver};
use appspace_core::application::ports::Listener;
use appspace_core::prelude::*;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// The paths a test process "can import": a couple of callables and a few
/// plain values, with handles kept for identity assertions.
struct Fixture {
    resolver: TableResolver,
    sqrt: Component,
    fabs: Component,
    uppercase: Component,
}

impl Fixture {
    fn new() -> Self {
        init_logging();
        let resolver = TableResolver::new();

        let sqrt = Component::function(|args| {
            let n = number(args)?;
            Ok(Arc::new(n.sqrt()) as Object)
        });
        let fabs = Component::function(|args| {
            let n = number(args)?;
            Ok(Arc::new(n.abs()) as Object)
        });
        let uppercase = Component::object("ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string());

        resolver.insert("math.sqrt", sqrt.clone()).unwrap();
        resolver.insert("math.fabs", fabs.clone()).unwrap();
        resolver.insert("text.uppercase", uppercase.clone()).unwrap();
        resolver
            .insert_object("text.lowercase", "abcdefghijklmnopqrstuvwxyz".to_string())
            .unwrap();

        Self { resolver, sqrt, fabs, uppercase }
    }

    fn resolver(&self) -> Arc<dyn Resolver> {
        self.resolver.clone().into_resolver()
    }
}

fn number(args: &[Object]) -> AppspaceResult<f64> {
    args.first()
        .and_then(|arg| arg.clone().downcast::<f64>().ok())
        .map(|n| *n)
        .ok_or_else(|| AppspaceError::Internal { message: "expected one f64 argument".into() })
}

fn arg(n: f64) -> Object {
    Arc::new(n) as Object
}

fn as_f64(component: Component) -> f64 {
    *component.downcast::<f64>().unwrap()
}

// ── single, anonymous root ───────────────────────────────────────────────────

#[test]
fn single_entry_membership_and_identity() {
    let fixture = Fixture::new();
    let app = patterns(
        "",
        vec![("get", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    assert!(app.contains("get"));
    assert!(!app.contains("foo"));

    // resolved component is the registered object itself, not a copy
    let got = app.get("get").unwrap();
    assert!(got.ptr_eq(&fixture.sqrt));
    assert!(got.ptr_eq(&app.get("get").unwrap()));
}

#[test]
fn single_entry_call() {
    let fixture = Fixture::new();
    let app = patterns(
        "",
        vec![("get", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    assert_eq!(as_f64(app.call("get", &[arg(4.0)]).unwrap()), 2.0);
}

#[test]
fn single_missing_label_is_no_app() {
    let fixture = Fixture::new();
    let app = patterns(
        "",
        vec![("get", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    let err = app.call("missing", &[]).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("missing"));
}

// ── named root ───────────────────────────────────────────────────────────────

#[test]
fn named_root_is_reachable_by_its_own_label() {
    let fixture = Fixture::new();
    let app = patterns(
        "helpers",
        vec![("get", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    let helpers = app.branch("helpers").unwrap();
    assert!(helpers.contains("get"));
    assert!(!helpers.contains("foo"));

    // branch access and flat access reach the identical component
    let via_branch = helpers.get("get").unwrap();
    let via_flat = app.get("get").unwrap();
    assert!(via_branch.ptr_eq(&via_flat));
    assert!(via_branch.ptr_eq(&fixture.sqrt));
}

#[test]
fn named_root_missing_labels_error_at_both_levels() {
    let fixture = Fixture::new();
    let app = patterns(
        "helpers",
        vec![("get", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    assert!(app.get("make").unwrap_err().is_not_found());
    assert!(
        app.branch("helpers")
            .unwrap()
            .get("make")
            .unwrap_err()
            .is_not_found()
    );
}

// ── several entries, mixed lazy and eager ────────────────────────────────────

#[test]
fn mixed_entries_resolve_to_their_registered_objects() {
    let fixture = Fixture::new();
    let app = patterns(
        "helpers",
        vec![
            ("square", ComponentSpec::import("math.sqrt").unwrap()),
            // eager: the component goes in directly, no resolver involved
            ("fabulous", ComponentSpec::Value(fixture.fabs.clone())),
            ("lower", ComponentSpec::import("text.lowercase").unwrap()),
            ("upper", ComponentSpec::import("text.uppercase").unwrap()),
        ],
        fixture.resolver(),
    )
    .unwrap();

    let helpers = app.branch("helpers").unwrap();
    assert!(helpers.get("square").unwrap().ptr_eq(&fixture.sqrt));
    assert!(helpers.get("fabulous").unwrap().ptr_eq(&fixture.fabs));
    assert!(helpers.get("upper").unwrap().ptr_eq(&fixture.uppercase));

    assert_eq!(as_f64(helpers.call("square", &[arg(4.0)]).unwrap()), 2.0);
    assert_eq!(as_f64(helpers.call("fabulous", &[arg(-2.0)]).unwrap()), 2.0);
    assert_eq!(
        *helpers
            .call("lower", &[])
            .unwrap()
            .downcast::<String>()
            .unwrap(),
        "abcdefghijklmnopqrstuvwxyz"
    );
}

// ── branch includes ──────────────────────────────────────────────────────────

#[test]
fn included_branch_round_trips_to_the_same_object() {
    let fixture = Fixture::new();

    // a module exports its built appspace under the conventional attribute
    let appconf = patterns(
        "",
        vec![
            ("square", ComponentSpec::import("math.sqrt").unwrap()),
            ("fabulous", ComponentSpec::import("math.fabs").unwrap()),
        ],
        fixture.resolver(),
    )
    .unwrap();
    fixture
        .resolver
        .insert_conf("pkg.apps", "appconf", appconf)
        .unwrap();

    let app = patterns(
        "helpers",
        vec![("misc", include("pkg.apps").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    let misc = app.branch("helpers").unwrap().branch("misc").unwrap();
    assert!(misc.get("square").unwrap().ptr_eq(&fixture.sqrt));

    let path: LabelPath = "helpers.misc.square".parse().unwrap();
    assert!(app.traverse(&path).unwrap().ptr_eq(&fixture.sqrt));

    assert_eq!(as_f64(misc.call("fabulous", &[arg(-3.5)]).unwrap()), 3.5);
}

#[test]
fn include_falls_back_to_the_apps_attribute() {
    let fixture = Fixture::new();
    let exported = patterns(
        "",
        vec![("square", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();
    fixture.resolver.insert_conf("pkg.legacy", "apps", exported).unwrap();

    let app = patterns(
        "",
        vec![("misc", include("pkg.legacy").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    assert!(app.branch("misc").unwrap().contains("square"));
}

#[test]
fn include_of_a_plain_object_fails() {
    let fixture = Fixture::new();
    fixture
        .resolver
        .insert_object("pkg.broken.appconf", 42_i32)
        .unwrap();

    let app = patterns(
        "",
        vec![("misc", include("pkg.broken").unwrap())],
        fixture.resolver(),
    )
    .unwrap();

    let err = app.get("misc").unwrap_err();
    assert!(err.to_string().contains("not an appspace"));
}

// ── declarative patterns ─────────────────────────────────────────────────────

#[test]
fn declarative_patterns_build_the_same_surface() {
    let fixture = Fixture::new();
    let app = Patterns::new("helpers")
        .entry("square", ComponentSpec::import("math.sqrt").unwrap())
        .entry("fabulous", ComponentSpec::Value(fixture.fabs.clone()))
        .entry("upper", ComponentSpec::import("text.uppercase").unwrap())
        .entry("_hidden", ComponentSpec::value(0_i32))
        .build(fixture.resolver())
        .unwrap();

    let helpers = app.branch("helpers").unwrap();
    assert!(helpers.get("square").unwrap().ptr_eq(&fixture.sqrt));
    assert!(helpers.get("fabulous").unwrap().ptr_eq(&fixture.fabs));
    assert_eq!(as_f64(helpers.call("square", &[arg(9.0)]).unwrap()), 3.0);
    assert!(!app.contains("_hidden"));
}

#[test]
fn declarative_branch_and_namespace_compose() {
    let fixture = Fixture::new();
    let exported = patterns(
        "",
        vec![("square", ComponentSpec::import("math.sqrt").unwrap())],
        fixture.resolver(),
    )
    .unwrap();
    fixture.resolver.insert_conf("pkg.apps", "appconf", exported).unwrap();

    let app = Patterns::new("")
        .branch(BranchPatterns::new().include("misc", "pkg.apps"))
        .namespace(
            NamespacePatterns::new("text")
                .entry("upper", ComponentSpec::import("text.uppercase").unwrap()),
        )
        .build(fixture.resolver())
        .unwrap();

    // branches nest lazily; namespaces flatten to dotted labels
    assert!(app.branch("misc").unwrap().contains("square"));
    assert!(app.contains("text.upper"));
    assert!(app.get("text.upper").unwrap().ptr_eq(&fixture.uppercase));
}

// ── resolver conveniences ────────────────────────────────────────────────────

#[test]
fn provide_registers_and_returns_a_spec() {
    let fixture = Fixture::new();
    let spec = fixture.resolver.provide("app.version", "1.2.3".to_string()).unwrap();

    let app = patterns("", vec![("version", spec)], fixture.resolver()).unwrap();
    assert_eq!(
        *app.get("version").unwrap().downcast::<String>().unwrap(),
        "1.2.3"
    );
}

// ── events through the manager ───────────────────────────────────────────────

#[test]
fn manager_dispatches_through_a_real_bus() {
    let fixture = Fixture::new();
    let bus = SimpleEventBus::new();
    let manager = Arc::new(
        Manager::new(None, Namespace::default(), fixture.resolver())
            .with_event_bus(Arc::new(bus.clone())),
    );
    let app = Appspace::new(manager);

    let seen = Arc::new(std::sync::Mutex::new(0_usize));
    let sink = Arc::clone(&seen);
    let ready = Label::new("ready").unwrap();
    app.manager()
        .bind(
            &ready,
            Arc::new(move |_args: &[Object]| {
                *sink.lock().unwrap() += 1;
            }) as Listener,
        )
        .unwrap();

    app.manager().fire(&ready, &[]).unwrap();
    app.manager().fire(&ready, &[]).unwrap();

    assert_eq!(*seen.lock().unwrap(), 2);
    assert_eq!(bus.listener_count(&ready), 1);
}
