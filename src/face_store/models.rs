/// Face store data models
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One enrolled identity: display attributes plus the reference photo.
///
/// The server stores whatever JSON the client sent, so the record wraps the
/// raw value and is persisted byte-for-byte as received. Wrong types,
/// explicit nulls and unknown keys all survive a round trip. The typed
/// accessors below are read-side projections only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceRecord(Value);

impl FaceRecord {
    /// Build a complete record with the client's wire names
    pub fn new(
        id: i64,
        name: impl Into<String>,
        age: impl Into<String>,
        location: impl Into<String>,
        image_data_url: impl Into<String>,
    ) -> Self {
        Self(json!({
            "id": id,
            "name": name.into(),
            "age": age.into(),
            "location": location.into(),
            "imageDataUrl": image_data_url.into(),
        }))
    }

    /// Raw field lookup; `None` for absent keys and non-object records
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Client-generated creation timestamp, when it is an integer
    pub fn id(&self) -> Option<i64> {
        self.field("id").and_then(Value::as_i64)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn age(&self) -> Option<&str> {
        self.text("age")
    }

    pub fn location(&self) -> Option<&str> {
        self.text("location")
    }

    /// `data:<mime>;base64,<payload>` encoded photo
    pub fn image_data_url(&self) -> Option<&str> {
        self.text("imageDataUrl")
    }

    /// Name used as the recognition label
    pub fn label(&self) -> &str {
        self.name().unwrap_or_default()
    }

    /// Field rendered for display: strings as-is, other scalars in JSON
    /// notation, absent or null as empty.
    pub fn display(&self, key: &str) -> String {
        match self.field(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

impl From<Value> for FaceRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Confirmation body returned after a successful save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
}

impl SaveResponse {
    pub fn saved() -> Self {
        Self {
            message: "Face saved successfully!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let record = FaceRecord::new(1, "Ann", "30", "NYC", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["imageDataUrl"], "data:image/png;base64,AAAA");
        assert_eq!(json["id"], 1);
        assert_eq!(record.image_data_url(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_incomplete_record_is_accepted() {
        let record: FaceRecord = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(record.label(), "Bob");
        assert_eq!(record.age(), None);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Bob"}"#);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let raw = r#"{"id":7,"name":"Cy","note":"left-handed"}"#;
        let record: FaceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.field("note"), Some(&Value::from("left-handed")));

        let back: Value = serde_json::to_value(&record).unwrap();
        let expected: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_mistyped_fields_and_nulls_survive() {
        let raw = json!({ "id": 1.5, "name": "Ann", "age": 30, "location": null });
        let record: FaceRecord = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(record.id(), None);
        assert_eq!(record.age(), None);
        assert_eq!(record.display("age"), "30");
        assert_eq!(record.display("location"), "");
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        let record = FaceRecord::from(json!("just a string"));
        assert_eq!(record.label(), "");
        assert_eq!(record.display("name"), "");
    }
}
