pub use uri::{InvalidUriError, Uri};

mod uri {
    use std::fmt::Display;
    use std::str::FromStr;

    use thiserror::Error;

    #[derive(Debug, Error)]
    pub struct InvalidUriError(String);

    impl Display for InvalidUriError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.fmt(f)
        }
    }

    impl From<http::uri::InvalidUri> for InvalidUriError {
        fn from(value: http::uri::InvalidUri) -> Self {
            InvalidUriError(value.to_string())
        }
    }

    impl From<http::uri::InvalidUriParts> for InvalidUriError {
        fn from(value: http::uri::InvalidUriParts) -> Self {
            InvalidUriError(value.to_string())
        }
    }

    /// Owned URI for configured endpoints.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Uri(http::Uri);

    impl Uri {
        pub fn new(uri: http::Uri) -> Self {
            Self(uri)
        }

        /// Join `path` (and an optional query string) onto `base_uri`,
        /// replacing any path and query the base carried.
        pub fn from_parts(
            base_uri: Uri,
            path: &str,
            query: Option<&str>,
        ) -> Result<Self, InvalidUriError> {
            let path_and_query = if let Some(qs) = query {
                http::uri::PathAndQuery::from_maybe_shared(format!("{path}?{qs}"))?
            } else {
                http::uri::PathAndQuery::from_str(path)?
            };
            let mut parts = base_uri.0.into_parts();
            parts.path_and_query = Some(path_and_query);

            Ok(http::Uri::from_parts(parts).map(Self::new)?)
        }
    }

    impl Display for Uri {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.fmt(f)
        }
    }

    impl FromStr for Uri {
        type Err = InvalidUriError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(http::Uri::from_str(s).map(Self::new)?)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_from_parts_replaces_path() {
            let base: Uri = "http://192.168.1.100:3000".parse().unwrap();
            let joined = Uri::from_parts(base, "/api/hardware/device/credentials", None).unwrap();
            assert_eq!(
                joined.to_string(),
                "http://192.168.1.100:3000/api/hardware/device/credentials"
            );
        }

        #[test]
        fn test_from_parts_keeps_authority() {
            let base: Uri = "http://localhost:3000/some/other/path".parse().unwrap();
            let joined = Uri::from_parts(base, "/lookup", Some("serial=HW1")).unwrap();
            assert_eq!(joined.to_string(), "http://localhost:3000/lookup?serial=HW1");
        }

        #[test]
        fn test_rejects_garbage() {
            assert!("not a uri at all".parse::<Uri>().is_err());
        }
    }
}
