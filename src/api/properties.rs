//! Property listings; writes are multipart so pictures can ride along.

// std
use std::{fs, io, path::Path};
// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::{HttpTransport, MultipartForm},
};

/// Occupancy state of a property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
	/// Available for a new lease.
	#[default]
	Vacant,
	/// Under an active lease.
	Occupied,
	/// Status string this client does not recognize.
	#[serde(other)]
	Unknown,
}
impl PropertyStatus {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Vacant => "vacant",
			Self::Occupied => "occupied",
			Self::Unknown => "unknown",
		}
	}
}

/// Property as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
	/// Numeric identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Free-form location.
	pub location: String,
	/// Monthly rent.
	pub rent: f64,
	/// Occupancy state.
	#[serde(default)]
	pub status: PropertyStatus,
	/// Server-relative URLs of uploaded pictures.
	#[serde(default)]
	pub pictures: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyEnvelope {
	Wrapped { property: Property },
	Bare(Property),
}
impl PropertyEnvelope {
	fn into_property(self) -> Property {
		match self {
			Self::Wrapped { property } => property,
			Self::Bare(property) => property,
		}
	}
}

/// Picture attached to a property form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
	/// File name reported to the server; its extension decides whether the upload is kept.
	pub file_name: String,
	/// MIME type, when known.
	pub content_type: Option<String>,
	/// Raw image bytes.
	pub bytes: Vec<u8>,
}
impl Picture {
	/// Creates a picture from in-memory bytes.
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		let file_name = file_name.into();
		let content_type = guess_image_type(&file_name).map(str::to_owned);

		Self { file_name, content_type, bytes: bytes.into() }
	}

	/// Reads a picture from disk, naming it after the file.
	pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path)?;
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "picture".into());

		Ok(Self::new(file_name, bytes))
	}

	/// Overrides the guessed MIME type.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());

		self
	}
}

fn guess_image_type(file_name: &str) -> Option<&'static str> {
	let (_, extension) = file_name.rsplit_once('.')?;

	match extension.to_ascii_lowercase().as_str() {
		"png" => Some("image/png"),
		"jpg" | "jpeg" => Some("image/jpeg"),
		"gif" => Some("image/gif"),
		_ => None,
	}
}

/// Fields sent when creating or updating a property.
///
/// Unset fields are omitted; on update the server keeps their current values. Pictures are
/// appended to the existing ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyForm {
	/// Display name.
	pub name: Option<String>,
	/// Free-form location.
	pub location: Option<String>,
	/// Monthly rent.
	pub rent: Option<f64>,
	/// Occupancy state.
	pub status: Option<PropertyStatus>,
	/// Pictures to upload.
	pub pictures: Vec<Picture>,
}
impl PropertyForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the location.
	pub fn location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());

		self
	}

	/// Sets the monthly rent.
	pub fn rent(mut self, rent: f64) -> Self {
		self.rent = Some(rent);

		self
	}

	/// Sets the occupancy state.
	pub fn status(mut self, status: PropertyStatus) -> Self {
		self.status = Some(status);

		self
	}

	/// Appends a picture.
	pub fn picture(mut self, picture: Picture) -> Self {
		self.pictures.push(picture);

		self
	}

	/// Encodes the form as multipart parts, every picture under the `pictures` field.
	pub fn to_multipart(&self) -> MultipartForm {
		let mut form = MultipartForm::new();

		if let Some(name) = &self.name {
			form = form.text("name", name.as_str());
		}
		if let Some(location) = &self.location {
			form = form.text("location", location.as_str());
		}
		if let Some(rent) = self.rent {
			form = form.text("rent", rent.to_string());
		}
		if let Some(status) = self.status {
			form = form.text("status", status.as_str());
		}

		for picture in &self.pictures {
			form = match &picture.content_type {
				Some(content_type) => form.file_with_type(
					"pictures",
					picture.file_name.as_str(),
					content_type.as_str(),
					picture.bytes.clone(),
				),
				None => form.file("pictures", picture.file_name.as_str(), picture.bytes.clone()),
			};
		}

		form
	}
}

/// Handle for `/properties`.
#[derive(Debug)]
pub struct PropertiesApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> PropertiesApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Lists every property.
	pub async fn list(&self) -> Result<Vec<Property>> {
		self.client.request_json("/properties", RequestOptions::get()).await
	}

	/// Fetches one property.
	pub async fn get(&self, id: u64) -> Result<Property> {
		let envelope: PropertyEnvelope =
			self.client.request_json(&format!("/properties/{id}"), RequestOptions::get()).await?;

		Ok(envelope.into_property())
	}

	/// Creates a property, uploading any attached pictures.
	pub async fn create(&self, form: &PropertyForm) -> Result<Property> {
		let options = RequestOptions::post().multipart(form.to_multipart());
		let envelope: PropertyEnvelope = self.client.request_json("/properties", options).await?;

		Ok(envelope.into_property())
	}

	/// Updates the fields set on `form` and appends its pictures.
	pub async fn update(&self, id: u64, form: &PropertyForm) -> Result<Property> {
		let options = RequestOptions::put().multipart(form.to_multipart());
		let envelope: PropertyEnvelope =
			self.client.request_json(&format!("/properties/{id}"), options).await?;

		Ok(envelope.into_property())
	}

	/// Deletes a property.
	pub async fn delete(&self, id: u64) -> Result<()> {
		self.client.request(&format!("/properties/{id}"), RequestOptions::delete()).await?;

		Ok(())
	}
}
