use crate::error::Error;
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// An inspectable multipart payload. It only becomes a `reqwest` form at
/// dispatch time, so interceptors and tests can look at every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn append_text<S1: Into<String>, S2: Into<String>>(
        &mut self,
        name: S1,
        value: S2,
    ) -> &mut Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        });
        self
    }

    pub fn append_file<S1, S2, S3>(
        &mut self,
        name: S1,
        file_name: S2,
        mime: S3,
        bytes: Vec<u8>,
    ) -> &mut Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        });
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// First text value appended under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match &field.value {
            FieldValue::Text(value) if field.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub(crate) fn to_multipart(&self) -> Result<Form, Error> {
        let mut form = Form::new();

        for field in &self.fields {
            form = match &field.value {
                FieldValue::Text(value) => form.text(field.name.clone(), value.clone()),
                FieldValue::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)?;
                    form.part(field.name.clone(), part)
                }
            };
        }

        Ok(form)
    }
}
