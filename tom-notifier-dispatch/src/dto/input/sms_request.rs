use crate::error::Error;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SmsRequest {
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl SmsRequest {
    pub fn validate(&self) -> Result<(), Error> {
        if self.phone.trim().is_empty() {
            return Err(Error::Validation("sms request must contain 'phone' field".into()));
        }

        Ok(())
    }
}
