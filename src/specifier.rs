//! classify import specifiers and resolve them against the importing module

use url::Url;

use crate::error::ImtError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `https://...` or `http://...`
    External,
    /// `/path`, same scheme and host as the importer
    RootRelative,
    /// `./path` or `../path`
    ModuleRelative,
    Bare,
}

impl SpecifierKind {
    pub fn of(specifier: &str) -> SpecifierKind {
        if is_external(specifier) {
            SpecifierKind::External
        } else if specifier.starts_with("./") || specifier.starts_with("../") {
            SpecifierKind::ModuleRelative
        } else if specifier.starts_with('/') {
            SpecifierKind::RootRelative
        } else {
            SpecifierKind::Bare
        }
    }
}

pub fn is_external(specifier: &str) -> bool {
    specifier.starts_with("https://") || specifier.starts_with("http://")
}

pub fn parse_url(text: &str) -> Result<Url, ImtError> {
    Url::parse(text).map_err(|e| ImtError::InvalidUrl(text.to_owned(), e))
}

/// Resolves `specifier`, found inside the module at `referrer`, to an
/// absolute url. Only external and root-relative specifiers resolve.
pub fn resolve(specifier: &str, referrer: &Url) -> Result<Url, ImtError> {
    match SpecifierKind::of(specifier) {
        SpecifierKind::External => parse_url(specifier),
        // `//host/path` is protocol-relative and would switch hosts
        SpecifierKind::RootRelative if !specifier.starts_with("//") => referrer
            .join(specifier)
            .map_err(|e| ImtError::InvalidUrl(specifier.to_owned(), e)),
        _ => Err(ImtError::UnsupportedSpecifier {
            specifier: specifier.to_owned(),
            referrer: referrer.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn classify() {
        assert_eq!(SpecifierKind::of("https://cdn.test/a.js"), SpecifierKind::External);
        assert_eq!(SpecifierKind::of("http://cdn.test/a.js"), SpecifierKind::External);
        assert_eq!(SpecifierKind::of("/-/react@v17/index.js"), SpecifierKind::RootRelative);
        assert_eq!(SpecifierKind::of("./util.js"), SpecifierKind::ModuleRelative);
        assert_eq!(SpecifierKind::of("../util.js"), SpecifierKind::ModuleRelative);
        assert_eq!(SpecifierKind::of("react"), SpecifierKind::Bare);
        assert_eq!(SpecifierKind::of("ftp://cdn.test/a.js"), SpecifierKind::Bare);
    }

    #[test]
    fn resolve_external_as_is() {
        let referrer = Url::parse("https://cdn.skypack.dev/react").unwrap();
        let url = resolve("https://esm.sh/preact@10.0.0", &referrer).unwrap();
        assert_eq!(url.as_str(), "https://esm.sh/preact@10.0.0");
    }

    #[test]
    fn resolve_root_relative_keeps_scheme_and_port() {
        let referrer = Url::parse("http://127.0.0.1:4507/pkg/react").unwrap();
        let url = resolve("/-/react@v17.0.1/dist=es2020/react.js", &referrer).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4507/-/react@v17.0.1/dist=es2020/react.js"
        );
    }

    #[test]
    fn resolve_rejects_relative_and_bare() {
        let referrer = Url::parse("https://cdn.test/a/b.js").unwrap();
        for specifier in ["./c.js", "../c.js", "react", "//evil.test/x.js"] {
            let error = resolve(specifier, &referrer).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::UnsupportedSpecifier, "{specifier}");
        }
    }
}
