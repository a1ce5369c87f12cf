//! Canonical identity of an IFU document as discovered from a scan.

use serde::{Deserialize, Serialize};

/// The `(model, assistantid, containerid, type)` tuple for one scanned device.
///
/// Every field is always present and defaults to an empty string; an empty
/// string means "not known yet". After a successful resolution at least one
/// of `model` or `assistantid` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Device model name as printed on the device (e.g. `"Vista 300"`).
    #[serde(default)]
    pub model: String,
    /// Identifier or path of the IFU document (e.g. `"ifus/Vista_300.pdf"`).
    #[serde(default)]
    pub assistantid: String,
    /// Bundle the document belongs to.
    #[serde(default)]
    pub containerid: String,
    /// Coarse device category; only used to pick a display icon.
    #[serde(default, rename = "type")]
    pub device_type: String,
}

impl ResolvedIdentity {
    /// Identity that only carries a model name.
    pub fn from_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
            && self.assistantid.is_empty()
            && self.containerid.is_empty()
            && self.device_type.is_empty()
    }

    /// True when the identity names either a model or a document.
    pub fn is_identified(&self) -> bool {
        !self.model.is_empty() || !self.assistantid.is_empty()
    }

    /// A model is known but the document is not; a remote lookup can complete it.
    pub fn needs_lookup(&self) -> bool {
        self.assistantid.is_empty() && !self.model.is_empty()
    }

    /// Short label used in logs and the operator console.
    pub fn label(&self) -> String {
        match (self.model.is_empty(), self.assistantid.is_empty()) {
            (false, false) => format!("{} ({})", self.model, self.assistantid),
            (false, true) => self.model.clone(),
            (true, false) => self.assistantid.clone(),
            (true, true) => "<none>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_of_device_type_is_type() {
        let id = ResolvedIdentity {
            device_type: "monitor".into(),
            ..ResolvedIdentity::default()
        };
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["type"], "monitor");
        assert_eq!(json["model"], "");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let id: ResolvedIdentity = serde_json::from_str(r#"{"model":"Atlan 100"}"#).unwrap();
        assert_eq!(id.model, "Atlan 100");
        assert!(id.assistantid.is_empty());
        assert!(id.needs_lookup());
    }

    #[test]
    fn lookup_needed_only_for_bare_model() {
        assert!(!ResolvedIdentity::default().needs_lookup());
        let with_doc = ResolvedIdentity {
            model: "Vista 300".into(),
            assistantid: "ifus/Vista_300.pdf".into(),
            ..ResolvedIdentity::default()
        };
        assert!(!with_doc.needs_lookup());
        assert_eq!(with_doc.label(), "Vista 300 (ifus/Vista_300.pdf)");
    }
}
