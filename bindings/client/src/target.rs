use crate::request::{Page, Request, Response, TimeoutClass, TRANSPORT_FAILURE_STATUS};
use crate::session::Session;

/// Something that can serve the target shop's endpoints.
///
/// [crate::client::TargetClient] is the real implementation. Scenario and validation code is
/// written against this trait so that it can be driven by an in-process fake.
pub trait Target: Send + Sync {
    /// Make a call, surfacing transport failures as errors.
    fn try_call(
        &self,
        request: &Request,
        session: &Session,
        timeout: TimeoutClass,
    ) -> anyhow::Result<Response>;

    /// Fetch a page with a `GET` and return its body.
    fn fetch_page(&self, path: &str, session: &Session) -> anyhow::Result<Page>;

    /// Make a call that cannot fail.
    ///
    /// A transport failure is reported as [TRANSPORT_FAILURE_STATUS] together with the session
    /// that was sent, so that callers can score every outcome as a status code.
    fn call(&self, request: &Request, session: &Session, timeout: TimeoutClass) -> Response {
        match self.try_call(request, session, timeout) {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Call to {} failed: {e:#}", request.path());
                Response {
                    status: TRANSPORT_FAILURE_STATUS,
                    session: session.clone(),
                }
            }
        }
    }
}
