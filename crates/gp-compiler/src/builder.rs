use serde::Serialize;

use crate::optimizer::DomainSet;

pub const PROXY_PLACEHOLDER: &str = "__PROXY__";
pub const DOMAINS_PLACEHOLDER: &str = "__DOMAINS__";
pub const RULES_PLACEHOLDER: &str = "__RULES__";

/// Bundled fast-mode template: O(1) suffix lookup against a domain map.
pub const FAST_TEMPLATE: &str = include_str!("../../../resources/proxy.pac");

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),
    #[error("Failed to serialize {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Layout of the JSON substituted into the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    Compact,
    Pretty,
}

/// Render a fast-mode PAC script from a domain set.
pub fn build_fast_pac(
    template: &str,
    proxy: &str,
    domains: &DomainSet,
    style: JsonStyle,
) -> Result<String, BuildError> {
    let payload = to_json(domains, style, "domain set")?;
    render(template, proxy, DOMAINS_PLACEHOLDER, &payload, style)
}

/// Render a precise-mode PAC script from raw rules.
///
/// The rules are passed through untouched; filtering happens in
/// [`crate::parser::filter_precise_rules`].
pub fn build_precise_pac(
    template: &str,
    proxy: &str,
    rules: &[&str],
    style: JsonStyle,
) -> Result<String, BuildError> {
    let payload = to_json(rules, style, "rule list")?;
    render(template, proxy, RULES_PLACEHOLDER, &payload, style)
}

fn render(
    template: &str,
    proxy: &str,
    placeholder: &'static str,
    payload: &str,
    style: JsonStyle,
) -> Result<String, BuildError> {
    if !template.contains(placeholder) {
        return Err(BuildError::MissingPlaceholder(placeholder));
    }

    let proxy_js = to_json(proxy, style, "proxy")?;
    Ok(template
        .replace(PROXY_PLACEHOLDER, &proxy_js)
        .replace(placeholder, payload))
}

fn to_json<T>(value: &T, style: JsonStyle, what: &'static str) -> Result<String, BuildError>
where
    T: Serialize + ?Sized,
{
    let result = match style {
        JsonStyle::Compact => serde_json::to_string(value),
        JsonStyle::Pretty => serde_json::to_string_pretty(value),
    };
    result.map_err(|source| BuildError::Json { what, source })
}

#[cfg(test)]
mod tests {
    use crate::optimizer::build_domain_set;

    use super::*;

    #[test]
    fn renders_fast_template() {
        let (domains, _) = build_domain_set(["google.com", "twitter.com"]);
        let pac = build_fast_pac(
            "var proxy = __PROXY__;\nvar domains = __DOMAINS__;\n",
            "SOCKS5 127.0.0.1:1080",
            &domains,
            JsonStyle::Compact,
        )
        .expect("template should render");

        assert_eq!(
            pac,
            "var proxy = \"SOCKS5 127.0.0.1:1080\";\nvar domains = {\"google.com\":1,\"twitter.com\":1};\n"
        );
    }

    #[test]
    fn renders_pretty_json() {
        let (domains, _) = build_domain_set(["google.com"]);
        let pac = build_fast_pac("__DOMAINS__", "DIRECT", &domains, JsonStyle::Pretty).expect("template should render");
        assert_eq!(pac, "{\n  \"google.com\": 1\n}");
    }

    #[test]
    fn replaces_every_placeholder() {
        let pac = build_precise_pac("__PROXY__ __RULES__ __PROXY__", "PROXY a:1", &["||x.com"], JsonStyle::Compact)
            .expect("template should render");
        assert_eq!(pac, r#""PROXY a:1" ["||x.com"] "PROXY a:1""#);
    }

    #[test]
    fn does_not_escape_html_characters() {
        let pac = build_precise_pac("__RULES__", "", &["|http://a.com/<b>&c"], JsonStyle::Compact)
            .expect("template should render");
        assert_eq!(pac, r#"["|http://a.com/<b>&c"]"#);
    }

    #[test]
    fn rejects_template_without_payload_placeholder() {
        let err = build_precise_pac("var proxy = __PROXY__;", "DIRECT", &[], JsonStyle::Compact).unwrap_err();
        assert!(matches!(err, BuildError::MissingPlaceholder(RULES_PLACEHOLDER)));
    }

    #[test]
    fn bundled_template_has_placeholders() {
        assert!(FAST_TEMPLATE.contains(PROXY_PLACEHOLDER));
        assert!(FAST_TEMPLATE.contains(DOMAINS_PLACEHOLDER));
    }
}
