//! Redirect resolution helpers.
//!
//! Used by the transport executor when redirect-following is enabled.
//! When following is disabled, the executor stops at the first redirect
//! response and returns it as-is; classification happens upstream.

use grapnel_core::{Error, Method, Request, Response, Result};
use url::Url;

/// Maximum number of redirect hops the executor will follow.
pub const MAX_REDIRECTS: usize = 10;

/// Check if a status code is an auto-followed redirect.
pub(crate) fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Determine the method for the redirected request.
///
/// - 301, 302, 303: always use GET (standard browser behavior)
/// - 307, 308: preserve original method
pub(crate) fn redirect_method(status: u16, original: Method) -> Method {
    match status {
        307 | 308 => original,
        _ => Method::Get,
    }
}

/// Build the follow-up request for a redirect response, resolving the
/// `Location` header against the current request URL.
///
/// GET follow-ups drop the body; 307/308 re-send it.
pub(crate) fn follow_up(request: Request, response: &Response) -> Result<Request> {
    let location = response
        .header("Location")
        .ok_or_else(|| Error::connection("redirect response missing Location header"))?;

    let next_url = resolve_location(request.url(), location)?;
    let next_method = redirect_method(response.status(), request.method());

    let (_, _, headers, body) = request.into_parts();
    let body = match next_method {
        Method::Get | Method::Head => None,
        _ => body,
    };

    Ok(Request::from_parts(next_method, next_url, headers, body))
}

fn resolve_location(base: &Url, location: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(location) {
        return Ok(url);
    }
    base.join(location).map_err(Error::InvalidUrl)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;

    #[test]
    fn redirect_statuses() {
        assert!(is_redirect(301));
        assert!(is_redirect(302));
        assert!(is_redirect(303));
        assert!(is_redirect(307));
        assert!(is_redirect(308));

        assert!(!is_redirect(200));
        assert!(!is_redirect(300));
        assert!(!is_redirect(304));
        assert!(!is_redirect(404));
    }

    #[test]
    fn redirect_method_switches_to_get() {
        assert_eq!(redirect_method(301, Method::Post), Method::Get);
        assert_eq!(redirect_method(302, Method::Put), Method::Get);
        assert_eq!(redirect_method(303, Method::Delete), Method::Get);
    }

    #[test]
    fn redirect_method_preserved_for_307_308() {
        assert_eq!(redirect_method(307, Method::Post), Method::Post);
        assert_eq!(redirect_method(308, Method::Put), Method::Put);
    }

    #[test]
    fn follow_up_resolves_relative_location() {
        let url = Url::parse("https://example.com/old/path").expect("url");
        let request = Request::new(Method::Get, url);

        let mut headers = HashMap::new();
        headers.insert("Location".to_owned(), "/new/path".to_owned());
        let response = Response::new(302, headers, Bytes::new());

        let next = follow_up(request, &response).expect("follow up");
        assert_eq!(next.url().as_str(), "https://example.com/new/path");
        assert_eq!(next.method(), Method::Get);
    }

    #[test]
    fn follow_up_drops_body_on_get_switch() {
        let url = Url::parse("https://example.com/submit").expect("url");
        let request = Request::from_parts(
            Method::Post,
            url,
            HashMap::new(),
            Some(Bytes::from_static(b"payload")),
        );

        let mut headers = HashMap::new();
        headers.insert("Location".to_owned(), "https://example.com/done".to_owned());
        let response = Response::new(303, headers, Bytes::new());

        let next = follow_up(request, &response).expect("follow up");
        assert_eq!(next.method(), Method::Get);
        assert!(next.body().is_none());
    }

    #[test]
    fn follow_up_keeps_body_on_307() {
        let url = Url::parse("https://example.com/submit").expect("url");
        let request = Request::from_parts(
            Method::Post,
            url,
            HashMap::new(),
            Some(Bytes::from_static(b"payload")),
        );

        let mut headers = HashMap::new();
        headers.insert("Location".to_owned(), "/moved".to_owned());
        let response = Response::new(307, headers, Bytes::new());

        let next = follow_up(request, &response).expect("follow up");
        assert_eq!(next.method(), Method::Post);
        assert_eq!(next.body().map(Bytes::as_ref), Some(b"payload".as_slice()));
    }

    #[test]
    fn follow_up_without_location_fails() {
        let url = Url::parse("https://example.com/x").expect("url");
        let request = Request::new(Method::Get, url);
        let response = Response::new(302, HashMap::new(), Bytes::new());

        assert!(follow_up(request, &response).is_err());
    }
}
