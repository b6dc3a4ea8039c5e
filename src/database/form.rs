use std::collections::HashMap;

use serde_json::Value;

use super::error::TypeError;

pub type FormData = HashMap<String, Value>;

/// Loosely typed JSON request body.
pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    /// A required string field. Missing, null, non-string and blank values
    /// are all rejected with `message`.
    pub fn get_str(&self, key: &str, message: &str) -> Result<String, TypeError> {
        match self.get_optional_str(key)? {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(TypeError::new(message)),
        }
    }

    /// An optional string field. Numbers are accepted and rendered as text.
    pub fn get_optional_str(&self, key: &str) -> Result<Option<String>, TypeError> {
        match self.inner.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(v)) => Ok(Some(v.to_owned())),
            Some(Value::Number(v)) => Ok(Some(v.to_string())),
            Some(_) => Err(TypeError::new(&format!("Invalid type for {key}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(value: Value) -> Form {
        Form::from_data(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn required_strings_reject_blank_and_missing() {
        let message = "Ingredient name is required";
        assert!(form(json!({})).get_str("ingredient_name", message).is_err());
        assert!(form(json!({"ingredient_name": null})).get_str("ingredient_name", message).is_err());
        assert!(form(json!({"ingredient_name": "  "})).get_str("ingredient_name", message).is_err());
        assert_eq!(
            form(json!({"ingredient_name": "Gin"}))
                .get_str("ingredient_name", message)
                .unwrap(),
            "Gin"
        );
    }

    #[test]
    fn optional_strings_accept_numbers() {
        let form = form(json!({"quantity": 2, "flag": true}));
        assert_eq!(form.get_optional_str("quantity").unwrap().as_deref(), Some("2"));
        assert_eq!(form.get_optional_str("missing").unwrap(), None);
        assert!(form.get_optional_str("flag").is_err());
    }
}
