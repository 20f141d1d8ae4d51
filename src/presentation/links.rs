//! HAL-style representations: `_links`, `_embedded` and `page` metadata.
//!
//! Route templates are plain data; every href is the request's
//! `scheme://host` followed by one of these paths.

use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::Payment;
use crate::domain::user::User;
use actix_web::HttpRequest;
use serde::Serialize;
use std::collections::BTreeMap;

pub const USERS_PATH: &str = "/api/v1/users";
pub const LOGIN_PATH: &str = "/api/v1/users/login";
pub const SIGNUP_PATH: &str = "/api/v1/users/signup";
pub const PAYMENTS_PATH: &str = "/api/v1/payments";

pub const REL_SELF: &str = "self";
pub const REL_USERS: &str = "users";
pub const REL_USER: &str = "user";
pub const REL_PAYMENTS: &str = "payments";
pub const REL_LOGIN: &str = "login";
pub const REL_CREATE: &str = "create";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
}

pub type Links = BTreeMap<String, Link>;

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        let info = req.connection_info();
        Self::new(format!("{}://{}", info.scheme(), info.host()))
    }

    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn users(&self) -> String {
        self.href(USERS_PATH)
    }

    pub fn login(&self) -> String {
        self.href(LOGIN_PATH)
    }

    pub fn user(&self, user_id: u64) -> String {
        format!("{}/{}", self.users(), user_id)
    }

    pub fn user_payments(&self, user_id: u64) -> String {
        format!("{}/payments", self.user(user_id))
    }

    pub fn payments(&self) -> String {
        self.href(PAYMENTS_PATH)
    }

    pub fn payment(&self, payment_id: u64) -> String {
        format!("{}/{}", self.payments(), payment_id)
    }

    fn paged(&self, collection_href: &str, page: PageRequest) -> String {
        format!("{}?page={}&size={}", collection_href, page.page, page.size)
    }
}

#[derive(Debug, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: Links::new(),
        }
    }

    pub fn with_link(mut self, rel: &str, href: String) -> Self {
        self.links.insert(rel.to_string(), Link { href });
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

#[derive(Debug, Serialize)]
pub struct PagedModel<T> {
    #[serde(rename = "_embedded")]
    pub embedded: BTreeMap<String, Vec<EntityModel<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

impl<T> PagedModel<T> {
    pub fn with_link(mut self, rel: &str, href: String) -> Self {
        self.links.insert(rel.to_string(), Link { href });
        self
    }
}

pub fn user_model(links: &LinkBuilder, user: User) -> EntityModel<User> {
    let id = user.id;
    EntityModel::new(user)
        .with_link(REL_SELF, links.user(id))
        .with_link(REL_PAYMENTS, links.user_payments(id))
}

pub fn payment_model(links: &LinkBuilder, payment: Payment) -> EntityModel<Payment> {
    let (id, user_id) = (payment.id, payment.user_id);
    EntityModel::new(payment)
        .with_link(REL_SELF, links.payment(id))
        .with_link(REL_USER, links.user(user_id))
}

/// Wraps one page of records, converting each with `assembler` and adding
/// `first`/`prev`/`self`/`next`/`last` navigation against `collection_href`.
pub fn paged_model<T, U, F>(
    page: Page<T>,
    collection_href: &str,
    relation: &str,
    links: &LinkBuilder,
    assembler: F,
) -> PagedModel<U>
where
    F: Fn(&LinkBuilder, T) -> EntityModel<U>,
{
    let request = PageRequest {
        page: page.number,
        size: page.size,
    };
    let metadata = PageMetadata {
        size: page.size,
        total_elements: page.total_elements,
        total_pages: page.total_pages(),
        number: page.number,
    };

    let mut nav = Links::new();
    let mut add = |rel: &str, target: PageRequest| {
        nav.insert(
            rel.to_string(),
            Link {
                href: links.paged(collection_href, target),
            },
        );
    };
    if metadata.total_pages > 1 {
        add("first", request.with_page(0));
        add("last", request.with_page(metadata.total_pages - 1));
    }
    if page.has_previous() {
        add("prev", request.with_page(page.number - 1));
    }
    if page.has_next() {
        add("next", request.with_page(page.number + 1));
    }
    add(REL_SELF, request);

    let items = page
        .content
        .into_iter()
        .map(|item| assembler(links, item))
        .collect();
    let mut embedded = BTreeMap::new();
    embedded.insert(relation.to_string(), items);

    PagedModel {
        embedded,
        links: nav,
        page: metadata,
    }
}
