//! Session tokens on the wire.

/// Cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "geek_session";

/// Session token of a request: a `Bearer` authorization header wins over
/// the session cookie.
pub fn session_token(authorization: Option<&str>, cookie: Option<&str>) -> Option<String> {
    let bearer = authorization.and_then(|value| {
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
    });

    bearer.or_else(|| {
        cookie?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// `Set-Cookie` value for a new session.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; Secure; SameSite=Lax")
}

/// `Set-Cookie` value that drops the session cookie.
pub fn clear_session_cookie() -> String {
    session_cookie("", 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Bearer sess_a"), None, Some("sess_a"))]
    #[case(Some("bearer   sess_a  "), None, Some("sess_a"))]
    #[case(Some("Bearer sess_a"), Some("geek_session=sess_b"), Some("sess_a"))]
    #[case(Some("Basic YTpi"), Some("geek_session=sess_b"), Some("sess_b"))]
    #[case(None, Some("theme=dark; geek_session=sess_b; other=1"), Some("sess_b"))]
    #[case(None, Some("geek_session="), None)]
    #[case(Some("Bearer "), None, None)]
    #[case(None, Some("session=sess_b"), None)]
    #[case(None, None, None)]
    fn test_session_token(
        #[case] authorization: Option<&str>,
        #[case] cookie: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            session_token(authorization, cookie).as_deref(),
            expected
        );
    }

    #[test]
    fn test_cookies() {
        let cookie = session_cookie("sess_a", 604800);
        assert!(cookie.starts_with("geek_session=sess_a;"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));

        assert!(clear_session_cookie().starts_with("geek_session=;"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
