use rand::Rng;
use shop_bench_client::prelude::{
    endpoints, Credentials, Request, Session, Target, TimeoutClass,
};
use shop_bench_runner::prelude::{Batch, Checkpoint};

/// One simulated user working through a scenario.
///
/// Carries the user's session from call to call and scores every response into the current batch.
pub struct Shopper<'a> {
    target: &'a dyn Target,
    session: Session,
    batch: Batch,
}

impl<'a> Shopper<'a> {
    /// A new user with no cookies.
    pub fn new(target: &'a dyn Target) -> Self {
        Self {
            target,
            session: Session::new(),
            batch: Batch::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    fn send(&mut self, request: Request) -> u16 {
        let response = self
            .target
            .call(&request, &self.session, TimeoutClass::Normal);
        self.session = response.session;
        self.batch.record(response.status);
        response.status
    }

    pub fn index(&mut self, page: u32) -> u16 {
        self.send(endpoints::index(page))
    }

    pub fn image(&mut self, image_id: u32) -> u16 {
        self.send(endpoints::image(image_id))
    }

    pub fn product(&mut self, product_id: u32) -> u16 {
        self.send(endpoints::product(product_id))
    }

    pub fn user_page(&mut self, user_id: u32) -> u16 {
        self.send(endpoints::user_page(user_id))
    }

    pub fn login(&mut self, credentials: &Credentials) -> u16 {
        self.send(endpoints::login(&credentials.email, &credentials.password))
    }

    pub fn logout(&mut self) -> u16 {
        self.send(endpoints::logout())
    }

    pub fn buy(&mut self, product_id: u32) -> u16 {
        self.send(endpoints::buy(product_id))
    }

    pub fn comment(&mut self, product_id: u32, content: String) -> u16 {
        self.send(endpoints::comment(product_id, content))
    }

    /// Flush the batch. Returns `true` once the deadline has passed.
    pub fn checkpoint(&mut self, checkpoint: &mut dyn Checkpoint) -> bool {
        self.batch.flush(checkpoint)
    }
}

pub fn random_user_id(rng: &mut impl Rng) -> u32 {
    rng.gen_range(1..=endpoints::USER_COUNT)
}

pub fn random_product_id(rng: &mut impl Rng) -> u32 {
    rng.gen_range(1..=endpoints::PRODUCT_COUNT)
}
