use std::collections::BTreeMap;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::MockError;

/// Matches a `{param_name}` placeholder in a path template.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

/// A compiled path template: turns `/pets/{petId}` into a regex that
/// matches concrete request paths and captures `petId` (`§4.D`).
#[derive(Debug, Clone)]
pub(crate) struct PathMatcher {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathMatcher {
    /// Compiles `template` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidPathTemplate`] if a placeholder's name
    /// isn't a valid identifier (the shared [`PLACEHOLDER`] regex already
    /// guarantees this syntactically, but a template with no closing brace
    /// or unmatched literal braces is rejected here).
    pub(crate) fn compile(template: &str) -> Result<Self, MockError> {
        if template.matches('{').count() != template.matches('}').count() {
            return Err(MockError::InvalidPathTemplate {
                template: template.to_string(),
                segment: template.to_string(),
            });
        }

        let param_names: Vec<String> = PLACEHOLDER
            .captures_iter(template)
            .filter_map(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string())
            .collect();

        let mut pattern = String::from("^");
        let mut last_end = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let whole = caps.get(0).expect("capture 0 always present");
            pattern.push_str(&regex::escape(&template[last_end..whole.start()]));
            let name = &caps["name"];
            pattern.push_str(&format!("(?<{name}>[^/]+)"));
            last_end = whole.end();
        }
        pattern.push_str(&regex::escape(&template[last_end..]));
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|_| MockError::InvalidPathTemplate {
            template: template.to_string(),
            segment: pattern.clone(),
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    /// The original template string.
    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    /// Matches `path` (the request path with the server prefix already
    /// stripped), returning the captured, percent-decoded path parameters.
    pub(crate) fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut params = BTreeMap::new();
        for name in &self.param_names {
            let raw = &caps[name.as_str()];
            let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();
            params.insert(name.clone(), decoded);
        }
        Some(params)
    }
}
