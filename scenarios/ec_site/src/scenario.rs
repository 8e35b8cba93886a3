//! The three scripted users that make up the benchmark's traffic.
//!
//! Each function runs one pass of its script and reports whether the deadline was seen at one of
//! its checkpoints. Calls never fail, a failed call is only a worse score.

use rand::seq::SliceRandom;
use rand::Rng;
use shop_bench_client::prelude::{endpoints, Dataset, Target};
use shop_bench_runner::prelude::{Checkpoint, ScenarioFlow};

use crate::shopper::{random_product_id, random_user_id, Shopper};

/// Images fetched per listing page, cycling through the five product images.
const IMAGES_PER_PAGE: u32 = 50;
const PURCHASES_PER_SPREE: usize = 20;
const COMMENTS_PER_SPREE: usize = 5;

/// Logs in and pages through the product list, loading every image, without buying anything.
pub fn browsing(
    target: &dyn Target,
    dataset: &dyn Dataset,
    checkpoint: &mut dyn Checkpoint,
    rng: &mut impl Rng,
) -> anyhow::Result<ScenarioFlow> {
    let credentials = dataset.credentials(random_user_id(rng))?;
    let mut shopper = Shopper::new(target);

    shopper.login(&credentials);
    shopper.index(0);
    for i in 0..IMAGES_PER_PAGE {
        shopper.image(i % endpoints::IMAGE_COUNT);
    }
    if shopper.checkpoint(checkpoint) {
        return Ok(ScenarioFlow::Stop);
    }

    shopper.index(rng.gen_range(50..=99));
    shopper.index(rng.gen_range(100..=149));
    for i in 0..IMAGES_PER_PAGE {
        shopper.image(i % endpoints::IMAGE_COUNT);
    }
    if shopper.checkpoint(checkpoint) {
        return Ok(ScenarioFlow::Stop);
    }

    // Real users reload a product page a few times before making up their mind.
    shopper.index(rng.gen_range(150..=199));
    let product_id = random_product_id(rng);
    for _ in 0..3 {
        shopper.product(product_id);
    }
    shopper.logout();

    Ok(ScenarioFlow::from_stopped(shopper.checkpoint(checkpoint)))
}

/// Looks at other people's purchase histories without logging in, mostly the heavy buyer's.
pub fn profile_watching(
    target: &dyn Target,
    checkpoint: &mut dyn Checkpoint,
    rng: &mut impl Rng,
) -> anyhow::Result<ScenarioFlow> {
    let mut shopper = Shopper::new(target);

    shopper.index(0);
    shopper.user_page(endpoints::HEAVY_USER_ID);
    for _ in 0..3 {
        shopper.user_page(random_user_id(rng));
    }

    Ok(ScenarioFlow::from_stopped(shopper.checkpoint(checkpoint)))
}

/// Buys in bulk and leaves reviews. Half of the sprees are made by the heavy buyer.
pub fn buying_spree(
    target: &dyn Target,
    dataset: &dyn Dataset,
    checkpoint: &mut dyn Checkpoint,
    rng: &mut impl Rng,
) -> anyhow::Result<ScenarioFlow> {
    let user_id = if rng.gen_bool(0.5) {
        endpoints::HEAVY_USER_ID
    } else {
        random_user_id(rng)
    };
    let credentials = dataset.credentials(user_id)?;
    let mut shopper = Shopper::new(target);

    shopper.login(&credentials);
    shopper.index(rng.gen_range(100..=199));
    for _ in 0..PURCHASES_PER_SPREE {
        shopper.buy(random_product_id(rng));
    }
    if shopper.checkpoint(checkpoint) {
        return Ok(ScenarioFlow::Stop);
    }

    for _ in 0..COMMENTS_PER_SPREE {
        let phrase = endpoints::COMMENT_PHRASES
            .choose(rng)
            .copied()
            .unwrap_or(endpoints::COMMENT_PHRASES[0]);
        shopper.comment(random_product_id(rng), endpoints::comment_content(phrase));
    }
    shopper.logout();

    Ok(ScenarioFlow::from_stopped(shopper.checkpoint(checkpoint)))
}
