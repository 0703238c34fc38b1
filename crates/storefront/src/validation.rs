//! Form field validation.
//!
//! Each form is a static list of [`FieldSpec`]s. A field's rules run in a
//! fixed order (required, minimum length, pattern) and the first failure is
//! the field's only error. Validation errors belong to the form; they are
//! never written to the global store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+@(?:[a-zA-Z0-9]+\.)+com+$").expect("email pattern compiles")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(([a-zA-Z0-9\x{00a1}-\x{ffff}-]+\.)+[a-zA-Z\x{00a1}-\x{ffff}]{2,})(:\d{2,5})?(/\S*)?$",
    )
    .expect("url pattern compiles")
});

/// Shape a field's value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Email,
    Url,
}

impl Pattern {
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_PATTERN.is_match(value),
            Self::Url => URL_PATTERN.is_match(value),
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Email => "Invalid email",
            Self::Url => "Please enter a valid url",
        }
    }
}

/// Rules for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    required: Option<&'static str>,
    min_length: Option<usize>,
    pattern: Option<Pattern>,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: None,
            min_length: None,
            pattern: None,
        }
    }

    /// Empty values fail with `message`.
    #[must_use]
    pub const fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    /// Values shorter than `n` characters fail.
    #[must_use]
    pub const fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    #[must_use]
    pub const fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// First failing rule's message, or `None` when the value is valid.
    ///
    /// An empty optional field skips the remaining rules.
    #[must_use]
    pub fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return self.required.map(str::to_string);
        }

        if let Some(min) = self.min_length
            && value.chars().count() < min
        {
            return Some(format!("Minimum {min} character is required"));
        }

        if let Some(pattern) = self.pattern
            && !pattern.matches(value)
        {
            return Some(pattern.message().to_string());
        }

        None
    }
}

/// Submitted field values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Value of `name`; missing fields read as empty.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }
}

/// Per-field messages for a rejected form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(name, msg)| (*name, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A form: its fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    pub fields: &'static [FieldSpec],
}

impl FormSpec {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its first failing rule's message.
    pub fn validate(&self, data: &FormData) -> Result<(), ValidationErrors> {
        let errors: Vec<_> = self
            .fields
            .iter()
            .filter_map(|field| field.validate(data.get(field.name)).map(|m| (field.name, m)))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

pub const LOGIN_FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::new("username", "UserName").required("*UserName is required"),
        FieldSpec::new("password", "Password").required("*Password is required"),
    ],
};

pub const REGISTER_FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::new("username", "UserName").required("*UserName is required"),
        FieldSpec::new("email", "Email")
            .required("*Email is required")
            .pattern(Pattern::Email),
        FieldSpec::new("password", "Password")
            .required("*Password is required")
            .min_length(6),
    ],
};

pub const ADDRESS_FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::new("city", "City").required("*City is required"),
        FieldSpec::new("postcode", "Postcode").required("*Postcode is required"),
        FieldSpec::new("street", "Street").required("*Street is required"),
        FieldSpec::new("country", "Country").required("*Country is required"),
    ],
};

pub const CONTACT_FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::new("name", "Name").required("*Name is required"),
        FieldSpec::new("email", "Email")
            .required("*Email is required")
            .pattern(Pattern::Email),
        FieldSpec::new("message", "Message").required("*Message is required"),
    ],
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LOGIN_FORM.validate(&FormData::new()).unwrap_err();
        assert_eq!(errors.get("username"), Some("*UserName is required"));
        assert_eq!(errors.get("password"), Some("*Password is required"));

        let ok = FormData::new()
            .with("username", "user1")
            .with("password", "password1");
        assert!(LOGIN_FORM.validate(&ok).is_ok());
    }

    #[test]
    fn test_register_password_min_length() {
        let data = FormData::new()
            .with("username", "newuser")
            .with("email", "new@example.com")
            .with("password", "12345");
        let errors = REGISTER_FORM.validate(&data).unwrap_err();
        assert_eq!(errors.get("password"), Some("Minimum 6 character is required"));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn test_required_wins_over_other_rules() {
        let data = FormData::new().with("username", "u").with("password", "123456");
        let errors = REGISTER_FORM.validate(&data).unwrap_err();
        assert_eq!(errors.get("email"), Some("*Email is required"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(Pattern::Email.matches("user1@example.com"));
        assert!(Pattern::Email.matches("user@mail.example.com"));
        assert!(!Pattern::Email.matches("user.name@example.com"));
        assert!(!Pattern::Email.matches("user@example.org"));
        assert!(!Pattern::Email.matches("no-at-symbol"));
    }

    #[test]
    fn test_url_pattern() {
        let field = FieldSpec::new("website", "Website").pattern(Pattern::Url);
        assert_eq!(field.validate("https://example.com/path"), None);
        assert_eq!(field.validate("example.com:8080"), None);
        assert_eq!(
            field.validate("not a url").as_deref(),
            Some("Please enter a valid url")
        );
        // Optional and empty: no rules run
        assert_eq!(field.validate(""), None);
    }

    #[test]
    fn test_min_length_counts_characters() {
        let field = FieldSpec::new("password", "Password").min_length(6);
        assert_eq!(field.validate("pässwö"), None);
    }

    #[test]
    fn test_errors_in_form_order() {
        let errors = ADDRESS_FORM.validate(&FormData::new()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["city", "postcode", "street", "country"]);
        assert!(errors.to_string().starts_with("city: *City is required"));
    }

    #[test]
    fn test_contact_form() {
        let data = FormData::new()
            .with("name", "Ada")
            .with("email", "ada@example.com")
            .with("message", "Hello");
        assert!(CONTACT_FORM.validate(&data).is_ok());
    }
}
