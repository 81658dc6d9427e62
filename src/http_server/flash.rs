//! One-shot messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "booking_flash";
const SEPARATOR: char = '\n';

/// Queue `message` for the next page that calls [`take`].
pub fn push(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    let mut messages = pending(&jar);
    messages.push(message.into());

    let value = urlencoding::encode(&messages.join(&SEPARATOR.to_string())).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Drain queued messages, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

fn pending(jar: &CookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .map(|value| {
            value
                .split(SEPARATOR)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
