//! Checks run once against a freshly reset shop before any load is applied.
//!
//! The gate resets the shop, then inspects the listing, product and user pages. It also makes one
//! purchase and posts one review and checks that both show up. Any failure is fatal to the run.

mod checks;
mod dom;
mod error;

use std::time::{Duration, Instant};

use rand::Rng;
use shop_bench_client::prelude::{
    endpoints, Dataset, Page, Request, Session, Target, TimeoutClass,
};

pub use checks::{reviews_label, LISTING_ITEMS, PURCHASE_TIME_FORMAT, USER_HISTORY_ROWS};
pub use dom::Document;
pub use error::GateError;

/// How long the shop may take to reset before the run is abandoned.
pub const RESET_LIMIT: Duration = Duration::from_secs(10 * 60);
/// Listing page inspected before the gate changes anything.
pub const VALIDATION_PAGE: u32 = 10;
/// Product and user whose pages are inspected before the gate changes anything.
pub const VALIDATION_PRODUCT_ID: u32 = 1500;
pub const VALIDATION_USER_ID: u32 = 1500;
/// The newest product, bought and reviewed by the gate.
pub const PURCHASED_PRODUCT_ID: u32 = endpoints::PRODUCT_COUNT;

pub type GateResult<T> = Result<T, GateError>;

pub struct ValidationGate<'a> {
    target: &'a dyn Target,
    dataset: &'a dyn Dataset,
}

impl<'a> ValidationGate<'a> {
    pub fn new(target: &'a dyn Target, dataset: &'a dyn Dataset) -> Self {
        Self { target, dataset }
    }

    /// Reset the shop and run every check in order, stopping at the first failure.
    pub fn run(&self, rng: &mut impl Rng) -> GateResult<()> {
        self.initialize_target()?;
        self.dataset
            .reset_scratch_tables()
            .map_err(|source| GateError::Dataset { source })?;

        self.validate_index(VALIDATION_PAGE, false)?;
        self.validate_product()?;
        self.validate_user(VALIDATION_USER_ID, false)?;

        let user_id = rng.gen_range(1..=endpoints::USER_COUNT);
        let credentials = self
            .dataset
            .credentials(user_id)
            .map_err(|source| GateError::Dataset { source })?;

        let mut session = Session::new();
        session = self.act(
            "login",
            endpoints::login(&credentials.email, &credentials.password),
            &session,
        )?;
        session = self.act("purchase", endpoints::buy(PURCHASED_PRODUCT_ID), &session)?;
        self.validate_user(user_id, true)?;

        let phrase =
            endpoints::COMMENT_PHRASES[rng.gen_range(0..endpoints::COMMENT_PHRASES.len())];
        self.act(
            "review",
            endpoints::comment(PURCHASED_PRODUCT_ID, endpoints::comment_content(phrase)),
            &session,
        )?;
        self.validate_index(0, true)?;

        log::info!("Validation passed");
        Ok(())
    }

    /// Ask the shop to restore its initial data, bounded by [RESET_LIMIT].
    pub fn initialize_target(&self) -> GateResult<()> {
        log::info!("Resetting the target shop");
        let started = Instant::now();
        let response = self
            .target
            .try_call(&endpoints::initialize(), &Session::new(), TimeoutClass::Reset)
            .map_err(|source| GateError::Reset { source })?;
        let elapsed = started.elapsed();

        if elapsed > RESET_LIMIT {
            return Err(GateError::ResetTimeout {
                elapsed,
                limit: RESET_LIMIT,
            });
        }
        if response.status != 200 {
            return Err(GateError::Rejected {
                action: "reset",
                status: response.status,
            });
        }

        log::info!("Target reset in {elapsed:?}");
        Ok(())
    }

    /// The listing page `page`. `logged_in` is set once the gate's own review has been posted.
    pub fn validate_index(&self, page: u32, logged_in: bool) -> GateResult<()> {
        let context = format!("page {page}");
        let path = endpoints::index(page).path().to_string();
        let doc = self.fetch_document("index", &context, &path)?;
        let mismatches = checks::check_index(&doc, page, logged_in)
            .map_err(|source| GateError::Inspect { view: "index", source })?;
        report("index", context, mismatches)
    }

    pub fn validate_product(&self) -> GateResult<()> {
        let context = format!("product {VALIDATION_PRODUCT_ID}");
        let path = endpoints::product(VALIDATION_PRODUCT_ID).path().to_string();
        let doc = self.fetch_document("product", &context, &path)?;
        let mismatches = checks::check_product(&doc)
            .map_err(|source| GateError::Inspect { view: "product", source })?;
        report("product", context, mismatches)
    }

    /// A user's history page, compared against the total recorded in the dataset.
    pub fn validate_user(&self, user_id: u32, logged_in: bool) -> GateResult<()> {
        let context = format!("user {user_id}");
        let total_pay = self
            .dataset
            .total_pay(user_id)
            .map_err(|source| GateError::Dataset { source })?;
        let path = endpoints::user_page(user_id).path().to_string();
        let doc = self.fetch_document("user", &context, &path)?;
        let mismatches = checks::check_user(&doc, logged_in, total_pay, PURCHASED_PRODUCT_ID)
            .map_err(|source| GateError::Inspect { view: "user", source })?;
        report("user", context, mismatches)
    }

    fn fetch(&self, path: &str) -> GateResult<Page> {
        // Pages are always inspected as an anonymous visitor.
        self.target
            .fetch_page(path, &Session::new())
            .map_err(|source| GateError::Unreachable {
                path: path.to_string(),
                source,
            })
    }

    fn fetch_document(
        &self,
        view: &'static str,
        context: &str,
        path: &str,
    ) -> GateResult<Document> {
        let page = self.fetch(path)?;
        if page.status != 200 {
            report(
                view,
                context.to_string(),
                vec![format!("status: expected 200, got {}", page.status)],
            )?;
        }
        Ok(Document::parse(&page.body))
    }

    fn act(
        &self,
        action: &'static str,
        request: Request,
        session: &Session,
    ) -> GateResult<Session> {
        let response = self
            .target
            .try_call(&request, session, TimeoutClass::Normal)
            .map_err(|source| GateError::Unreachable {
                path: request.path().to_string(),
                source,
            })?;
        match response.status {
            200 | 303 => Ok(response.session),
            status => Err(GateError::Rejected { action, status }),
        }
    }
}

fn report(view: &'static str, context: String, mismatches: Vec<String>) -> GateResult<()> {
    if mismatches.is_empty() {
        log::debug!("The {view} page ({context}) is valid");
        return Ok(());
    }
    for mismatch in &mismatches {
        log::error!("Invalid {view} page ({context}): {mismatch}");
    }
    Err(GateError::InvalidContent {
        view,
        context,
        mismatches,
    })
}
