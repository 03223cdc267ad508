use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub title: String,
    pub company: String,
    pub tags: Vec<String>,
}

impl ContactRecord {
    pub fn with_new_id() -> Self {
        Self {
            id: new_contact_id(),
            ..Self::default()
        }
    }

    /// Label drawn inside the bubble. Falls back to the email, then to a placeholder.
    pub fn display_label(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if !name.is_empty() {
            return name.to_owned();
        }

        let email = self.email.trim();
        if !email.is_empty() {
            return email.to_owned();
        }

        "Unnamed".to_owned()
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.address.as_str(),
            self.title.as_str(),
            self.company.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
    }
}

pub fn new_contact_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("{millis}-{suffix:08x}")
}

pub fn parse_tag_list(raw: &str, separator: char) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(separator).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_empty() {
        let record: ContactRecord =
            serde_json::from_str(r#"{"id":"1","firstName":"Ada","tags":["math"]}"#).unwrap();
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.last_name, "");
        assert_eq!(record.company, "");
        assert_eq!(record.tags, vec!["math".to_owned()]);
    }

    #[test]
    fn serializes_camel_case() {
        let record = ContactRecord {
            id: "7".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            ..ContactRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"firstName\":\"Grace\""));
        assert!(json.contains("\"lastName\":\"Hopper\""));
    }

    #[test]
    fn display_label_falls_back() {
        let mut record = ContactRecord::default();
        assert_eq!(record.display_label(), "Unnamed");
        record.email = "a@b.c".into();
        assert_eq!(record.display_label(), "a@b.c");
        record.last_name = "Lovelace".into();
        assert_eq!(record.display_label(), "Lovelace");
        record.first_name = "Ada".into();
        assert_eq!(record.display_label(), "Ada Lovelace");
    }

    #[test]
    fn tag_list_trims_and_dedups() {
        assert_eq!(
            parse_tag_list(" vip, client ,, vip", ','),
            vec!["vip".to_owned(), "client".to_owned()]
        );
        assert!(parse_tag_list("", ';').is_empty());
    }

    #[test]
    fn new_ids_differ() {
        assert_ne!(new_contact_id(), new_contact_id());
    }
}
