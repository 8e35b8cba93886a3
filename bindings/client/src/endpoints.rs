//! The fixed set of calls the target web shop serves.

use crate::request::Request;

/// Users are seeded with ids `1..=USER_COUNT`.
pub const USER_COUNT: u32 = 5000;
/// Products are seeded with ids `1..=PRODUCT_COUNT`.
pub const PRODUCT_COUNT: u32 = 10000;
/// The user who buys far more than anyone else, over-represented in generated traffic.
pub const HEAVY_USER_ID: u32 = 1234;
/// Number of distinct product images served under `/images`.
pub const IMAGE_COUNT: u32 = 5;

pub const COMMENT_PHRASES: [&str; 3] = [
    "爆買いしてよかった。",
    "二度と買わない。",
    "友達にも勧めます。",
];

pub fn initialize() -> Request {
    Request::get("/initialize")
}

pub fn index(page: u32) -> Request {
    Request::get(format!("/?page={page}"))
}

pub fn image(image_id: u32) -> Request {
    Request::get(format!("/images/image{image_id}.jpg"))
}

pub fn product(product_id: u32) -> Request {
    Request::get(format!("/products/{product_id}"))
}

pub fn user_page(user_id: u32) -> Request {
    Request::get(format!("/users/{user_id}"))
}

pub fn login(email: &str, password: &str) -> Request {
    Request::post("/login")
        .with_form_field("email", email)
        .with_form_field("password", password)
}

pub fn logout() -> Request {
    Request::get("/logout")
}

pub fn buy(product_id: u32) -> Request {
    Request::post(format!("/products/buy/{product_id}"))
}

pub fn comment(product_id: u32, content: impl Into<String>) -> Request {
    Request::post(format!("/comments/{product_id}")).with_form_field("content", content)
}

/// The body posted as a review: the phrase prefixed with `この商品は`, five times over.
pub fn comment_content(phrase: &str) -> String {
    format!("この商品は{phrase}").repeat(5)
}
