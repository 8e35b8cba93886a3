#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use shop_bench_client::prelude::{
    Credentials, Dataset, Method, Page, Request, Response, Session, Target, TimeoutClass,
};
use shop_bench_runner::prelude::Checkpoint;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub form: Vec<(String, String)>,
    pub cookie: Option<String>,
}

impl Call {
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

type StatusFn = Box<dyn Fn(&Request) -> u16 + Send + Sync>;
type PageFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// An in-process shop that answers from scripts and remembers every call made to it.
pub struct ScriptedTarget {
    calls: Mutex<Vec<Call>>,
    status: StatusFn,
    pages: PageFn,
    logins: AtomicUsize,
    unreachable: bool,
}

impl ScriptedTarget {
    pub fn ok() -> Self {
        Self::with_status(|_| 200)
    }

    pub fn with_status(status: impl Fn(&Request) -> u16 + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Box::new(status),
            pages: Box::new(|_| None),
            logins: AtomicUsize::new(0),
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::ok()
        }
    }

    pub fn with_pages(
        mut self,
        pages: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.pages = Box::new(pages);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.path.clone()).collect()
    }

    fn record(&self, method: Method, path: &str, form: &[(String, String)], session: &Session) {
        self.calls.lock().push(Call {
            method,
            path: path.to_string(),
            form: form.to_vec(),
            cookie: session.cookie_header(),
        });
    }
}

impl Target for ScriptedTarget {
    fn try_call(
        &self,
        request: &Request,
        session: &Session,
        _timeout: TimeoutClass,
    ) -> anyhow::Result<Response> {
        self.record(request.method(), request.path(), request.form(), session);
        if self.unreachable {
            anyhow::bail!("connection refused");
        }

        let session = if request.path() == "/login" {
            let n = self.logins.fetch_add(1, Ordering::SeqCst);
            session.with_set_cookies([format!("connect.sid=session-{n}; Path=/").as_str()])
        } else {
            session.clone()
        };

        Ok(Response {
            status: (self.status)(request),
            session,
        })
    }

    fn fetch_page(&self, path: &str, session: &Session) -> anyhow::Result<Page> {
        self.record(Method::Get, path, &[], session);
        if self.unreachable {
            anyhow::bail!("connection refused");
        }

        Ok(match (self.pages)(path) {
            Some(body) => Page { status: 200, body },
            None => Page {
                status: 404,
                body: String::new(),
            },
        })
    }
}

#[derive(Debug, Default)]
pub struct FakeDataset {
    pub total_pay: u64,
    pub resets: AtomicUsize,
}

impl FakeDataset {
    pub fn with_total_pay(total_pay: u64) -> Self {
        Self {
            total_pay,
            ..Self::default()
        }
    }
}

impl Dataset for FakeDataset {
    fn credentials(&self, user_id: u32) -> anyhow::Result<Credentials> {
        Ok(Credentials {
            user_id,
            email: format!("user{user_id}@example.com"),
            password: "password".to_string(),
        })
    }

    fn total_pay(&self, _user_id: u32) -> anyhow::Result<u64> {
        Ok(self.total_pay)
    }

    fn reset_scratch_tables(&self) -> anyhow::Result<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Collects flushed batch scores, reporting the deadline as passed after `stop_after` batches.
#[derive(Debug, Default)]
pub struct Recorder {
    pub batches: Vec<i64>,
    pub stop_after: Option<usize>,
}

impl Recorder {
    pub fn stopping_after(batches: usize) -> Self {
        Self {
            batches: Vec::new(),
            stop_after: Some(batches),
        }
    }
}

impl Checkpoint for Recorder {
    fn checkpoint(&mut self, batch: i64) -> bool {
        self.batches.push(batch);
        self.stop_after.is_some_and(|n| self.batches.len() >= n)
    }
}

pub const PURCHASE_TIME: &str = "2026-10-18 12:34:56";

fn product_panel(product_id: u32, image: usize, reviews: &str) -> String {
    format!(
        r#"<div class="col-md-4">
  <div class="panel panel-default">
    <div class="panel-heading"><a href="/products/{product_id}">商品{product_id}</a></div>
    <div class="panel-body">
      <a href="/products/{product_id}"><img src="/images/image{image}.jpg"></a>
      <h4>{reviews}</h4>
      <ul><li>a</li><li>b</li><li>c</li><li>d</li><li>e</li></ul>
      <p>1000円</p>
      <p>説明</p>
      <p>{PURCHASE_TIME}</p>
      <p>詳細</p>
    </div>
  </div>
</div>"#
    )
}

/// A listing page as the shop renders it, newest product first.
pub fn index_page(page: u32, first_reviews: &str) -> String {
    let first_id = 10000 - page * 50;
    let panels = (0..50u32)
        .map(|k| {
            let reviews = if k == 0 { first_reviews } else { "20件のレビュー" };
            product_panel(first_id - k, (99 - k as usize) % 5, reviews)
        })
        .collect::<String>();
    format!(
        r#"<html><body>
<nav><a href="/">ISHOCON</a><a href="/login">ログイン</a><h4>ようこそ</h4><h4>新着</h4></nav>
<div class="container"><div class="row">{panels}</div></div>
</body></html>"#
    )
}

pub fn product_page() -> String {
    r#"<html><body>
<div class="container"><div class="row">
  <div class="jumbotron">
    <img src="/images/image4.jpg">
    <h2>商品1500</h2>
    <p>1500円</p>
    <p>これは商品1499の次の商品です</p>
    <div class="container"><p>まだ購入していません</p></div>
  </div>
</div></div>
</body></html>"#
        .to_string()
}

/// A purchase history with `rows` entries, the newest for `latest_product_id`.
pub fn user_page(total_pay: u64, rows: u32, latest_product_id: u32) -> String {
    let panels = (0..rows)
        .map(|k| {
            let product_id = if k == 0 { latest_product_id } else { k };
            product_panel(product_id, 0, "20件のレビュー")
        })
        .collect::<String>();
    format!(
        r#"<html><body>
<div class="container">
  <h4>合計金額: {total_pay}円</h4>
  <div class="row">{panels}</div>
</div>
</body></html>"#
    )
}
