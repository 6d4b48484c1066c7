use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
}

impl PropertyType {
    fn name(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Uri,
    Email,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Uri => "uri",
            Format::Email => "email",
        }
    }

    fn accepts(self, text: &str) -> bool {
        match self {
            Format::Uri => url::Url::parse(text).is_ok(),
            Format::Email => is_email(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub kind: PropertyType,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<i64>,
    pub format: Option<Format>,
}

impl Property {
    fn new(name: &'static str, kind: PropertyType) -> Self {
        Self {
            name,
            kind,
            min_length: None,
            max_length: None,
            minimum: None,
            format: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, PropertyType::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, PropertyType::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, PropertyType::Boolean)
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Checks one value, returning it in normalized form.
    fn check(&self, value: &Value, violations: &mut Vec<String>) -> Option<Value> {
        let path = format!("instance.{}", self.name);
        match (self.kind, value) {
            (PropertyType::String, Value::String(text)) => {
                let len = text.chars().count();
                let before = violations.len();
                if let Some(min) = self.min_length {
                    if len < min {
                        violations.push(format!("{} does not meet minimum length of {}", path, min));
                    }
                }
                if let Some(max) = self.max_length {
                    if len > max {
                        violations.push(format!("{} does not meet maximum length of {}", path, max));
                    }
                }
                if let Some(format) = self.format {
                    if !format.accepts(text) {
                        violations.push(format!("{} does not conform to the \"{}\" format", path, format.name()));
                    }
                }
                (violations.len() == before).then(|| value.clone())
            }
            (PropertyType::Integer, Value::Number(n)) => match as_integer(n) {
                Some(i) => {
                    if let Some(minimum) = self.minimum {
                        if i < minimum {
                            violations.push(format!("{} must be greater than or equal to {}", path, minimum));
                            return None;
                        }
                    }
                    Some(Value::Number(Number::from(i)))
                }
                None => {
                    violations.push(format!("{} is not of a type(s) integer", path));
                    None
                }
            },
            (PropertyType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (kind, _) => {
                violations.push(format!("{} is not of a type(s) {}", path, kind.name()));
                None
            }
        }
    }

    fn coerce(&self, raw: String) -> Value {
        let parsed = match self.kind {
            PropertyType::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            PropertyType::Boolean => raw.trim().parse::<bool>().ok().map(Value::Bool),
            PropertyType::String => None,
        };
        parsed.unwrap_or(Value::String(raw))
    }
}

/// A closed object schema: unknown properties are always violations.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub properties: Vec<Property>,
    pub required: Vec<&'static str>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            properties: vec![],
            required: vec![],
        }
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn required(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Validates `instance`, returning the normalized object or every violation found.
    pub fn validate(&self, instance: &Value) -> Result<Map<String, Value>, Vec<String>> {
        let object = match instance {
            Value::Object(object) => object,
            _ => return Err(vec!["instance is not of a type(s) object".to_string()]),
        };

        let mut violations = Vec::new();
        let mut normalized = Map::new();

        for key in object.keys() {
            if self.get(key).is_none() {
                violations.push(format!(
                    "instance is not allowed to have the additional property \"{}\"",
                    key
                ));
            }
        }

        for name in &self.required {
            if !object.contains_key(*name) {
                violations.push(format!("instance requires property \"{}\"", name));
            }
        }

        for property in &self.properties {
            if let Some(value) = object.get(property.name) {
                if let Some(value) = property.check(value, &mut violations) {
                    normalized.insert(property.name.to_string(), value);
                }
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            tracing::debug!("{} rejected: {:?}", self.name, violations);
            Err(violations)
        }
    }

    /// Builds an instance from query-string pairs, coercing numeric and boolean
    /// text for properties declared with those types. Text that does not parse
    /// stays a string so the type check reports it.
    pub fn coerce_query<I>(&self, params: I) -> Value
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let object = params
            .into_iter()
            .map(|(key, raw)| {
                let value = match self.get(&key) {
                    Some(property) => property.coerce(raw),
                    None => Value::String(raw),
                };
                (key, value)
            })
            .collect();
        Value::Object(object)
    }
}

fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    // 3.0 is an integer; 3.5 and anything past i64 are not
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::new("sample")
            .property(Property::string("handle").length(1, 5))
            .property(Property::integer("count").minimum(0))
            .property(Property::string("site").format(Format::Uri))
            .property(Property::boolean("flag"))
            .required(&["handle"])
    }

    #[test]
    fn accepts_and_normalizes_valid_instance() {
        let normalized = sample()
            .validate(&json!({ "handle": "abc", "count": 3.0, "flag": true }))
            .unwrap();
        assert_eq!(Value::Object(normalized), json!({ "handle": "abc", "count": 3, "flag": true }));
    }

    #[test]
    fn reports_every_violation() {
        let violations = sample()
            .validate(&json!({ "count": -1, "color": "red", "site": "not a url" }))
            .unwrap_err();
        assert_eq!(
            violations,
            vec![
                "instance is not allowed to have the additional property \"color\"",
                "instance requires property \"handle\"",
                "instance.count must be greater than or equal to 0",
                "instance.site does not conform to the \"uri\" format",
            ]
        );
    }

    #[test]
    fn type_mismatch_names_field_and_type() {
        let violations = sample().validate(&json!({ "handle": "a", "count": "3" })).unwrap_err();
        assert_eq!(violations, vec!["instance.count is not of a type(s) integer"]);

        let violations = sample().validate(&json!({ "handle": 42 })).unwrap_err();
        assert_eq!(violations, vec!["instance.handle is not of a type(s) string"]);
    }

    #[test]
    fn fractional_numbers_are_not_integers() {
        let violations = sample().validate(&json!({ "handle": "a", "count": 1.5 })).unwrap_err();
        assert_eq!(violations, vec!["instance.count is not of a type(s) integer"]);
    }

    #[test]
    fn string_length_bounds() {
        let violations = sample().validate(&json!({ "handle": "" })).unwrap_err();
        assert_eq!(violations, vec!["instance.handle does not meet minimum length of 1"]);

        let violations = sample().validate(&json!({ "handle": "toolong" })).unwrap_err();
        assert_eq!(violations, vec!["instance.handle does not meet maximum length of 5"]);
    }

    #[test]
    fn non_object_is_rejected() {
        let violations = sample().validate(&json!(["handle"])).unwrap_err();
        assert_eq!(violations, vec!["instance is not of a type(s) object"]);
    }

    #[test]
    fn query_coercion_only_touches_typed_properties() {
        let instance = sample().coerce_query(vec![
            ("count".to_string(), "3".to_string()),
            ("handle".to_string(), "12".to_string()),
            ("flag".to_string(), "true".to_string()),
        ]);
        assert_eq!(instance, json!({ "count": 3, "handle": "12", "flag": true }));

        let instance = sample().coerce_query(vec![("count".to_string(), "lots".to_string())]);
        assert_eq!(instance, json!({ "count": "lots" }));
    }

    #[test]
    fn email_format() {
        assert!(is_email("user1@user.com"));
        assert!(is_email("first.last@sub.example.org"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("@user.com"));
        assert!(!is_email("user@localhost"));
        assert!(!is_email("user@@user.com"));
        assert!(!is_email("us er@user.com"));
        assert!(!is_email("user@user..com"));
    }
}
