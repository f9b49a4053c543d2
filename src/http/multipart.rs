//! Replayable multipart form bodies.
//!
//! A reqwest form is consumed when sent, so a request that has to be replayed after a token
//! refresh could not reuse it. [`MultipartForm`] keeps the parts as owned data and the
//! transport rebuilds its native form on every attempt.

// self
use crate::_prelude::*;

/// Content of a single multipart part.
#[derive(Clone, PartialEq, Eq)]
pub enum PartValue {
	/// Plain text field.
	Text(String),
	/// File upload.
	File {
		/// File name reported to the server.
		file_name: String,
		/// MIME type of the content, when known.
		content_type: Option<String>,
		/// Raw file content.
		bytes: Vec<u8>,
	},
}
impl Debug for PartValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
			Self::File { file_name, content_type, bytes } => f
				.debug_struct("File")
				.field("file_name", file_name)
				.field("content_type", content_type)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// Ordered list of named parts; names may repeat (e.g. several `pictures`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
	parts: Vec<(String, PartValue)>,
}
impl MultipartForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push((name.into(), PartValue::Text(value.into())));

		self
	}

	/// Appends a file part without an explicit content type.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		self.parts.push((
			name.into(),
			PartValue::File { file_name: file_name.into(), content_type: None, bytes: bytes.into() },
		));

		self
	}

	/// Appends a file part with an explicit MIME type.
	pub fn file_with_type(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		self.parts.push((
			name.into(),
			PartValue::File {
				file_name: file_name.into(),
				content_type: Some(content_type.into()),
				bytes: bytes.into(),
			},
		));

		self
	}

	/// Iterates over `(name, value)` pairs in insertion order.
	pub fn parts(&self) -> impl Iterator<Item = (&str, &PartValue)> {
		self.parts.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Returns the text value of the first field called `name`.
	pub fn text_value(&self, name: &str) -> Option<&str> {
		self.parts().find_map(|(key, value)| match value {
			PartValue::Text(text) if key == name => Some(text.as_str()),
			_ => None,
		})
	}

	/// Number of parts.
	pub fn len(&self) -> usize {
		self.parts.len()
	}

	/// Returns `true` when the form has no parts.
	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	#[cfg(feature = "reqwest")]
	pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form, ReqwestError> {
		let mut form = reqwest::multipart::Form::new();

		for (name, value) in &self.parts {
			form = match value {
				PartValue::Text(text) => form.text(name.clone(), text.clone()),
				PartValue::File { file_name, content_type, bytes } => {
					let mut part =
						reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());

					if let Some(mime) = content_type {
						part = part.mime_str(mime)?;
					}

					form.part(name.clone(), part)
				},
			};
		}

		Ok(form)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_keeps_order_and_repeated_names() {
		let form = MultipartForm::new()
			.text("name", "Sunset Villas")
			.file("pictures", "front.jpg", vec![1, 2, 3])
			.file_with_type("pictures", "back.png", "image/png", vec![4]);
		let names: Vec<_> = form.parts().map(|(name, _)| name).collect();

		assert_eq!(names, ["name", "pictures", "pictures"]);
		assert_eq!(form.text_value("name"), Some("Sunset Villas"));
		assert_eq!(form.len(), 3);
	}

	#[test]
	fn file_debug_hides_content() {
		let value = PartValue::File {
			file_name: "lease.pdf".into(),
			content_type: None,
			bytes: vec![0; 4096],
		};

		assert!(format!("{value:?}").contains("len: 4096"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn invalid_mime_is_rejected_when_building_reqwest_form() {
		let form = MultipartForm::new().file_with_type("pictures", "a.jpg", "not a mime", vec![1]);

		assert!(form.to_reqwest().is_err());
	}
}
