pub(super) fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

pub(super) fn host_header_value(parsed: &url::Url) -> Option<String> {
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

pub(super) fn check_scheme(raw: &str) -> super::Result<url::Url> {
    let parsed = url::Url::parse(raw).map_err(|_| super::Error::InvalidUrl(raw.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(super::Error::UnsupportedScheme(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_keeps_explicit_port() {
        let parsed = match url::Url::parse("http://localhost:5000/api/users") {
            Ok(v) => v,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(host_header_value(&parsed).as_deref(), Some("localhost:5000"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            check_scheme("ftp://example.com/"),
            Err(super::super::Error::UnsupportedScheme(_))
        ));
        assert!(matches!(
            check_scheme("not a url"),
            Err(super::super::Error::InvalidUrl(_))
        ));
        assert!(check_scheme("https://example.com/api/docs/").is_ok());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        assert!(has_header(&headers, "content-type"));
        assert!(!has_header(&headers, "host"));
    }
}
