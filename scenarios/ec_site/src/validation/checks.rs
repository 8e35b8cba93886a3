//! Structural expectations for the pages the gate inspects.
//!
//! Each check returns one line per failed expectation, empty when the page is as expected.

use std::fmt::Debug;

use chrono::NaiveDateTime;
use shop_bench_client::prelude::endpoints::PRODUCT_COUNT;

use crate::validation::dom::Document;

/// Products shown per listing page.
pub const LISTING_ITEMS: usize = 50;
/// Purchase history entries shown on a user page.
pub const USER_HISTORY_ROWS: usize = 30;
/// Purchase times are rendered in the shop's local time without an offset.
pub const PURCHASE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REVIEWS_LABEL: &str = "20件のレビュー";
const REVIEWS_LABEL_AFTER_COMMENT: &str = "21件のレビュー";

#[derive(Debug, Default)]
struct Mismatches(Vec<String>);

impl Mismatches {
    fn compare<T: PartialEq + Debug>(&mut self, what: &str, expected: T, actual: T) {
        if expected != actual {
            self.0
                .push(format!("{what}: expected {expected:?}, got {actual:?}"));
        }
    }

    fn fail(&mut self, message: String) {
        self.0.push(message);
    }
}

pub fn reviews_label(after_comment: bool) -> &'static str {
    if after_comment {
        REVIEWS_LABEL_AFTER_COMMENT
    } else {
        REVIEWS_LABEL
    }
}

/// The product listing at `/?page={page}`.
///
/// Products are listed newest first, 50 to a page, so the page's first product id is known. After
/// the gate's own review has been posted the newest product has one more review.
pub fn check_index(doc: &Document, page: u32, logged_in: bool) -> anyhow::Result<Vec<String>> {
    let mut mismatches = Mismatches::default();
    let listing = LISTING_ITEMS as u32;
    let first_id = match PRODUCT_COUNT.checked_sub(page.saturating_mul(listing)) {
        Some(id) if id >= listing => id,
        _ => {
            let last_page = PRODUCT_COUNT / listing - 1;
            mismatches.fail(format!("page: expected at most {last_page}, got {page}"));
            return Ok(mismatches.0);
        }
    };

    mismatches.compare(
        "product count",
        LISTING_ITEMS,
        doc.children_count(".row")?,
    );

    mismatches.compare(
        "login link",
        Some("/login".to_string()),
        doc.nth_attr("a", 1, "href")?,
    );
    mismatches.compare(
        "first product link",
        Some(format!("/products/{first_id}")),
        doc.nth_attr("a", 2, "href")?,
    );
    mismatches.compare(
        "fifth product link",
        Some(format!("/products/{}", first_id - 4)),
        doc.nth_attr("a", 10, "href")?,
    );

    mismatches.compare(
        "first product reviews",
        Some(reviews_label(logged_in).to_string()),
        doc.nth_text("h4", 2)?,
    );
    mismatches.compare(
        "tenth product reviews",
        Some(REVIEWS_LABEL.to_string()),
        doc.nth_text("h4", 11)?,
    );

    mismatches.compare(
        "product panel children",
        2,
        doc.first_children_count(".panel-default")?,
    );
    mismatches.compare(
        "product panel body children",
        7,
        doc.first_children_count(".panel-body")?,
    );
    mismatches.compare(
        "product detail list items",
        5,
        doc.nested_children_count(".col-md-4", ".panel-body ul")?,
    );

    for i in [0usize, 6, 12, 18, 24] {
        mismatches.compare(
            &format!("image {i}"),
            Some(format!("/images/image{}.jpg", (99 - i) % 5)),
            doc.nth_attr("img", i, "src")?,
        );
    }

    Ok(mismatches.0)
}

/// The detail page of product 1500.
pub fn check_product(doc: &Document) -> anyhow::Result<Vec<String>> {
    let mut mismatches = Mismatches::default();

    mismatches.compare(
        "product image",
        Some("/images/image4.jpg".to_string()),
        doc.nth_attr("img", 0, "src")?,
    );
    mismatches.compare(
        "jumbotron children",
        5,
        doc.children_count(".row div.jumbotron")?,
    );

    let description = doc.nth_text(".row div.jumbotron p", 1)?;
    if !description.as_deref().is_some_and(|d| d.contains("1499")) {
        mismatches.fail(format!(
            "description: expected to mention 1499, got {description:?}"
        ));
    }

    // Nothing has been bought yet, so there is no purchase notice.
    mismatches.compare(
        "purchase notice children",
        1,
        doc.children_count(".jumbotron div.container")?,
    );

    Ok(mismatches.0)
}

/// A user's purchase history page.
///
/// `total_pay` is the user's total computed from the database. Once the gate has made its own
/// purchase the newest history entry must be that product.
pub fn check_user(
    doc: &Document,
    logged_in: bool,
    total_pay: u64,
    purchased_product_id: u32,
) -> anyhow::Result<Vec<String>> {
    let mut mismatches = Mismatches::default();

    mismatches.compare(
        "purchase history count",
        USER_HISTORY_ROWS,
        doc.children_count(".row")?,
    );
    mismatches.compare(
        "history panel children",
        2,
        doc.first_children_count(".panel-default")?,
    );
    mismatches.compare(
        "history panel body children",
        7,
        doc.first_children_count(".panel-body")?,
    );
    mismatches.compare(
        "total spent",
        Some(format!("合計金額: {total_pay}円")),
        doc.nth_text(".container h4", 0)?,
    );

    if logged_in {
        let latest = doc.nth_attr(".panel-heading a", 0, "href")?;
        let expected_id = purchased_product_id.to_string();
        if !latest.as_deref().is_some_and(|href| href.contains(&expected_id)) {
            mismatches.fail(format!(
                "latest purchase: expected a link to product {purchased_product_id}, got {latest:?}"
            ));
        }

        let purchased_at = doc.nth_text(".panel-body p", 2)?;
        let parses = purchased_at
            .as_deref()
            .is_some_and(|t| NaiveDateTime::parse_from_str(t, PURCHASE_TIME_FORMAT).is_ok());
        if !parses {
            mismatches.fail(format!(
                "purchase time: expected the format {PURCHASE_TIME_FORMAT:?}, got {purchased_at:?}"
            ));
        }
    }

    Ok(mismatches.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_past_the_listing_is_a_mismatch() {
        let doc = Document::parse("<html></html>");

        assert_eq!(
            vec!["page: expected at most 199, got 200".to_string()],
            check_index(&doc, 200, false).unwrap()
        );
        assert_eq!(
            vec!["page: expected at most 199, got 4000000000".to_string()],
            check_index(&doc, 4_000_000_000, false).unwrap()
        );
    }

    #[test]
    fn padded_labels_do_not_match() {
        let doc = Document::parse(
            r#"<div class="container"><h4>
                合計金額: 100円
            </h4></div>"#,
        );

        let mismatches = check_user(&doc, false, 100, 10000).unwrap();

        assert!(
            mismatches.iter().any(|m| m.starts_with("total spent")),
            "{mismatches:?}"
        );
    }

    #[test]
    fn exact_total_label_matches() {
        let doc = Document::parse(r#"<div class="container"><h4>合計金額: 100円</h4></div>"#);

        let mismatches = check_user(&doc, false, 100, 10000).unwrap();

        assert!(
            !mismatches.iter().any(|m| m.starts_with("total spent")),
            "{mismatches:?}"
        );
    }
}
