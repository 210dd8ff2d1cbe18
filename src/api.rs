//! One-shot verb functions.
//!
//! Each call builds a fresh [`RequestBuilder`] with the default configuration.
//! Use a builder directly to share session headers or a connection pool.

use crate::builder::RequestBuilder;
use crate::error::Result;
use crate::options::RequestOption;
use crate::response::Response;
use reqwest::Method;

pub fn get<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    RequestBuilder::new().send(Method::GET, url, options)
}

pub fn post<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    RequestBuilder::new().send(Method::POST, url, options)
}

pub fn put<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    RequestBuilder::new().send(Method::PUT, url, options)
}

pub fn patch<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    RequestBuilder::new().send(Method::PATCH, url, options)
}

pub fn delete<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    RequestBuilder::new().send(Method::DELETE, url, options)
}
