//! Outbound form payloads and their client-side validation rules.
//!
//! The server validates everything again; these rules only exist so obviously bad input is
//! reported without a round trip.

use std::borrow::Cow;
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::error::FormError;

/// Upper bound for profile pictures.
pub const MAX_PROFILE_PICTURE_BYTES: usize = 5 * 1024 * 1024;
/// Upper bound for post images.
pub const MAX_POST_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Forms that know the order their fields are displayed in, so the first visible error can be
/// reported.
pub trait FormRules: Validate {
    /// Field names in display order. Use `"__all__"` for whole-form rules.
    const FIELD_ORDER: &'static [&'static str];

    fn check(&self) -> Result<(), FormError> {
        self.validate().map_err(|errors| FormError::from_validation(&errors, Self::FIELD_ORDER))
    }
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct MediaUpload {
    pub file_name: String,
    /// MIME type, when known
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Read a file from disk, inferring the content type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| content_type_for_extension(&ext.to_ascii_lowercase()));
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// `POST login/`
#[derive(Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "email_present"))]
    pub email: String,
    #[validate(custom(function = "password_present"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into().trim().to_string(), password: password.into() }
    }
}

impl FormRules for LoginForm {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

/// `POST signup/`
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct SignupForm {
    #[validate(custom(function = "full_name_present"))]
    pub full_name: String,
    #[validate(custom(function = "not_in_future"))]
    pub dob: Option<NaiveDate>,
    #[validate(custom(function = "well_formed_email"))]
    pub email: String,
    #[validate(custom(function = "strong_password"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(custom(function = "profile_picture_rules"))]
    pub profile_pic: Option<MediaUpload>,
}

impl FormRules for SignupForm {
    const FIELD_ORDER: &'static [&'static str] =
        &["full_name", "dob", "email", "password", "confirm_password", "profile_pic"];
}

/// `PATCH profile/`
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProfileUpdate {
    #[validate(custom(function = "full_name_present"))]
    pub full_name: String,
    #[validate(custom(function = "not_in_future"))]
    pub dob: Option<NaiveDate>,
    #[validate(custom(function = "profile_picture_rules"))]
    pub profile_pic: Option<MediaUpload>,
}

impl FormRules for ProfileUpdate {
    const FIELD_ORDER: &'static [&'static str] = &["full_name", "dob", "profile_pic"];
}

/// `POST posts/`
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
#[validate(schema(function = "text_or_image"))]
pub struct NewPost {
    pub description: String,
    #[validate(custom(function = "post_image_rules"))]
    pub image: Option<MediaUpload>,
}

impl NewPost {
    pub fn new(description: impl Into<String>, image: Option<MediaUpload>) -> Self {
        Self { description: description.into().trim().to_string(), image }
    }
}

impl FormRules for NewPost {
    const FIELD_ORDER: &'static [&'static str] = &["__all__", "image"];
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn email_present(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(failure("required", "Email is required"));
    }
    Ok(())
}

fn password_present(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failure("required", "Password is required"));
    }
    Ok(())
}

fn full_name_present(full_name: &str) -> Result<(), ValidationError> {
    if full_name.trim().is_empty() {
        return Err(failure("required", "Full name is required"));
    }
    Ok(())
}

fn well_formed_email(email: &str) -> Result<(), ValidationError> {
    email_present(email)?;
    if !email.trim().validate_email() {
        return Err(failure("email", "Enter a valid email address"));
    }
    Ok(())
}

fn strong_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(failure("password_length", "Password must be at least 8 characters"));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(failure("password_lower", "Password must include a lowercase letter"));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(failure("password_upper", "Password must include an uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(failure("password_digit", "Password must include a number"));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(failure("password_special", "Password must include a special character"));
    }
    Ok(())
}

fn not_in_future(dob: &NaiveDate) -> Result<(), ValidationError> {
    if *dob > Local::now().date_naive() {
        return Err(failure("dob_future", "Date of birth cannot be in the future"));
    }
    Ok(())
}

fn image_rules(upload: &MediaUpload, max_bytes: usize) -> Result<(), ValidationError> {
    if upload.size() > max_bytes {
        let mut err = ValidationError::new("too_large");
        err.message = Some(Cow::Owned(format!("Image must be <= {}MB", max_bytes / (1024 * 1024))));
        return Err(err);
    }
    if let Some(content_type) = upload.content_type.as_deref() {
        if !content_type.starts_with("image/") {
            return Err(failure("not_image", "File must be an image"));
        }
    }
    Ok(())
}

fn profile_picture_rules(upload: &MediaUpload) -> Result<(), ValidationError> {
    image_rules(upload, MAX_PROFILE_PICTURE_BYTES)
}

fn post_image_rules(upload: &MediaUpload) -> Result<(), ValidationError> {
    image_rules(upload, MAX_POST_IMAGE_BYTES)
}

fn text_or_image(post: &NewPost) -> Result<(), ValidationError> {
    if post.description.trim().is_empty() && post.image.is_none() {
        return Err(failure("empty_post", "Write something or add an image"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signup() -> SignupForm {
        SignupForm {
            full_name: "Grace Hopper".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 12, 9),
            email: "grace@example.com".to_string(),
            password: "Cobol#1959".to_string(),
            confirm_password: "Cobol#1959".to_string(),
            profile_pic: None,
        }
    }

    fn png(size: usize) -> MediaUpload {
        MediaUpload::new("pic.png", Some("image/png"), vec![0; size])
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert!(LoginForm::new("a@b.co", "secret").check().is_ok());

        let err = LoginForm::new("   ", "").check().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("email"));
        assert_eq!(err.message, "Email is required");

        let err = LoginForm::new("a@b.co", "").check().unwrap_err();
        assert_eq!(err.message, "Password is required");
    }

    #[test]
    fn test_login_trims_email() {
        assert_eq!(LoginForm::new("  a@b.co ", "x").email, "a@b.co");
    }

    #[test]
    fn test_signup_accepts_valid_form() {
        assert_eq!(signup().check(), Ok(()));
    }

    #[test]
    fn test_signup_password_rules() {
        let cases = [
            ("Ab1!", "Password must be at least 8 characters"),
            ("ABCDEFG1!", "Password must include a lowercase letter"),
            ("abcdefg1!", "Password must include an uppercase letter"),
            ("Abcdefgh!", "Password must include a number"),
            ("Abcdefgh1", "Password must include a special character"),
        ];
        for (password, expected) in cases {
            let mut form = signup();
            form.password = password.to_string();
            form.confirm_password = password.to_string();
            let err = form.check().unwrap_err();
            assert_eq!(err.message, expected, "password {password:?}");
        }
    }

    #[test]
    fn test_signup_reports_first_field_in_display_order() {
        let mut form = signup();
        form.full_name = " ".to_string();
        form.email = "not-an-email".to_string();
        let err = form.check().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("full_name"));

        form.full_name = "Grace".to_string();
        let err = form.check().unwrap_err();
        assert_eq!(err.message, "Enter a valid email address");
    }

    #[test]
    fn test_signup_confirm_password_must_match() {
        let mut form = signup();
        form.confirm_password = "Cobol#1960".to_string();
        let err = form.check().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("confirm_password"));
        assert_eq!(err.message, "Passwords do not match");
    }

    #[test]
    fn test_dob_cannot_be_in_future() {
        let update = ProfileUpdate {
            full_name: "Grace".to_string(),
            dob: Some(Local::now().date_naive() + Duration::days(2)),
            profile_pic: None,
        };
        assert_eq!(update.check().unwrap_err().message, "Date of birth cannot be in the future");
    }

    #[test]
    fn test_profile_picture_limits() {
        let mut update =
            ProfileUpdate { full_name: "Grace".to_string(), dob: None, profile_pic: Some(png(10)) };
        assert!(update.check().is_ok());

        update.profile_pic = Some(png(MAX_PROFILE_PICTURE_BYTES + 1));
        assert_eq!(update.check().unwrap_err().message, "Image must be <= 5MB");

        update.profile_pic = Some(MediaUpload::new("notes.txt", Some("text/plain"), vec![1]));
        assert_eq!(update.check().unwrap_err().message, "File must be an image");
    }

    #[test]
    fn test_post_needs_text_or_image() {
        let err = NewPost::new("   ", None).check().unwrap_err();
        assert_eq!(err.field, None);
        assert_eq!(err.message, "Write something or add an image");

        assert!(NewPost::new("hello", None).check().is_ok());
        assert!(NewPost::new("", Some(png(10))).check().is_ok());

        let err = NewPost::new("", Some(png(MAX_POST_IMAGE_BYTES + 1))).check().unwrap_err();
        assert_eq!(err.message, "Image must be <= 8MB");
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for_extension("txt"), None);
    }
}
