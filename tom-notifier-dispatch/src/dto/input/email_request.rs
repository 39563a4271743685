use crate::error::Error;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub to: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
    pub from: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, with = "de_base64_map")]
    pub attachments: BTreeMap<String, Vec<u8>>,
    pub template_id: Option<String>,
    #[serde(default)]
    pub template_data: HashMap<String, serde_json::Value>,
    pub reply_to: Option<String>,
}

impl EmailRequest {
    pub fn validate(&self) -> Result<(), Error> {
        if self.to.trim().is_empty() {
            return Err(Error::Validation("email request must contain 'to' field".into()));
        }

        Ok(())
    }
}

mod de_base64_map {
    //!
    //! Attachments arrive as base64 strings keyed by file name
    //!

    use base64::{prelude::BASE64_STANDARD, Engine};
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(d)?;

        let mut decoded = BTreeMap::new();
        for (name, content) in encoded {
            let bytes = BASE64_STANDARD
                .decode(content)
                .map_err(serde::de::Error::custom)?;
            decoded.insert(name, bytes);
        }

        Ok(decoded)
    }
}
