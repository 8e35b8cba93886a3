mod support;

use std::sync::atomic::Ordering;

use ec_site_benchmark::validation::{GateError, ValidationGate};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shop_bench_client::prelude::Method;
use support::{index_page, product_page, user_page, FakeDataset, ScriptedTarget};

const TOTAL_PAY: u64 = 1_234_567;

/// A shop that renders every page correctly, with `rows` entries in each purchase history.
fn healthy_shop(rows: u32, rendered_total: u64) -> ScriptedTarget {
    ScriptedTarget::ok().with_pages(move |path| match path {
        "/?page=10" => Some(index_page(10, "20件のレビュー")),
        "/?page=0" => Some(index_page(0, "21件のレビュー")),
        "/products/1500" => Some(product_page()),
        p if p.starts_with("/users/") => Some(user_page(rendered_total, rows, 10000)),
        _ => None,
    })
}

#[test]
fn user_page_with_full_history_passes() {
    let target = healthy_shop(30, TOTAL_PAY);
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);

    ValidationGate::new(&target, &dataset)
        .validate_user(1500, false)
        .unwrap();

    // Pages are inspected without cookies.
    assert_eq!(None, target.calls()[0].cookie);
}

#[test]
fn short_history_is_reported() {
    let target = healthy_shop(29, TOTAL_PAY);
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);

    let err = ValidationGate::new(&target, &dataset)
        .validate_user(1500, false)
        .unwrap_err();

    match err {
        GateError::InvalidContent {
            view,
            context,
            mismatches,
        } => {
            assert_eq!("user", view);
            assert_eq!("user 1500", context);
            assert_eq!(
                vec!["purchase history count: expected 30, got 29".to_string()],
                mismatches
            );
        }
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn total_mismatch_is_reported() {
    let target = healthy_shop(30, TOTAL_PAY + 1);
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);

    let err = ValidationGate::new(&target, &dataset)
        .validate_user(1500, false)
        .unwrap_err();

    match err {
        GateError::InvalidContent { mismatches, .. } => {
            assert_eq!(1, mismatches.len());
            assert!(mismatches[0].starts_with("total spent"), "{}", mismatches[0]);
        }
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn logged_in_user_page_expects_latest_purchase_first() {
    let target = ScriptedTarget::ok().with_pages(|_| Some(user_page(TOTAL_PAY, 30, 42)));
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);
    let gate = ValidationGate::new(&target, &dataset);

    gate.validate_user(7, false).unwrap();
    assert!(matches!(
        gate.validate_user(7, true),
        Err(GateError::InvalidContent { .. })
    ));
}

#[test]
fn index_and_product_pages_pass() {
    let target = healthy_shop(30, TOTAL_PAY);
    let dataset = FakeDataset::default();
    let gate = ValidationGate::new(&target, &dataset);

    gate.validate_index(10, false).unwrap();
    gate.validate_index(0, true).unwrap();
    gate.validate_product().unwrap();
}

#[test]
fn review_count_must_match_login_state() {
    let target = healthy_shop(30, TOTAL_PAY);
    let dataset = FakeDataset::default();

    let err = ValidationGate::new(&target, &dataset)
        .validate_index(10, true)
        .unwrap_err();

    match err {
        GateError::InvalidContent { mismatches, .. } => assert_eq!(
            vec![
                "first product reviews: expected Some(\"21件のレビュー\"), got Some(\"20件のレビュー\")"
                    .to_string()
            ],
            mismatches
        ),
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn missing_page_is_invalid_content() {
    let target = ScriptedTarget::ok();
    let dataset = FakeDataset::default();

    let err = ValidationGate::new(&target, &dataset)
        .validate_product()
        .unwrap_err();

    assert!(matches!(err, GateError::InvalidContent { view: "product", .. }));
}

#[test]
fn full_gate_passes_against_healthy_shop() {
    let target = healthy_shop(30, TOTAL_PAY);
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);

    ValidationGate::new(&target, &dataset)
        .run(&mut StdRng::seed_from_u64(1))
        .unwrap();

    assert_eq!(1, dataset.resets.load(Ordering::SeqCst));

    let calls = target.calls();
    assert_eq!("/initialize", calls[0].path);
    assert_eq!(
        vec!["/initialize", "/?page=10", "/products/1500", "/users/1500", "/login"],
        calls[..5].iter().map(|c| c.path.as_str()).collect::<Vec<_>>()
    );

    let buy = calls
        .iter()
        .find(|c| c.path == "/products/buy/10000")
        .unwrap();
    assert_eq!(Method::Post, buy.method);
    assert_eq!(Some("connect.sid=session-0"), buy.cookie.as_deref());

    let comment = calls.iter().find(|c| c.path == "/comments/10000").unwrap();
    assert_eq!(Some("connect.sid=session-0"), comment.cookie.as_deref());
    assert_eq!("/?page=0", calls.last().unwrap().path);
}

#[test]
fn rejected_login_is_fatal() {
    let target = ScriptedTarget::with_status(|request| match request.path() {
        "/login" => 401,
        _ => 200,
    })
    .with_pages(|path| match path {
        "/?page=10" => Some(index_page(10, "20件のレビュー")),
        "/products/1500" => Some(product_page()),
        _ => Some(user_page(TOTAL_PAY, 30, 10000)),
    });
    let dataset = FakeDataset::with_total_pay(TOTAL_PAY);

    let err = ValidationGate::new(&target, &dataset)
        .run(&mut StdRng::seed_from_u64(1))
        .unwrap_err();

    assert!(matches!(
        err,
        GateError::Rejected {
            action: "login",
            status: 401
        }
    ));
}

#[test]
fn unreachable_target_is_not_a_content_error() {
    let target = ScriptedTarget::unreachable();
    let dataset = FakeDataset::default();
    let gate = ValidationGate::new(&target, &dataset);

    assert!(matches!(
        gate.validate_product(),
        Err(GateError::Unreachable { .. })
    ));
    assert!(matches!(
        gate.initialize_target(),
        Err(GateError::Reset { .. })
    ));
}
