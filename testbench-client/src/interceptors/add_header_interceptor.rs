use super::RequestInterceptor;
use crate::{error::Error, RequestConfig};

#[derive(Debug)]
pub struct AddHeaderInterceptor {
    header_name: String,
    header_value: String,
}

impl AddHeaderInterceptor {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, value: S2) -> Self {
        Self {
            header_name: name.into(),
            header_value: value.into(),
        }
    }
}

impl RequestInterceptor for AddHeaderInterceptor {
    fn intercept(&self, config: &mut RequestConfig) -> Result<(), Error> {
        config
            .headers
            .retain(|key, _| !key.eq_ignore_ascii_case(&self.header_name));
        config
            .headers
            .insert(self.header_name.clone(), self.header_value.clone());
        Ok(())
    }
}
