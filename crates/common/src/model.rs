// ================
// common/src/model.rs
// ================
//! Persistent user/appointment document model.
//!
//! One [`UserRecord`] is the unit of storage: it carries the account fields,
//! the business profile, authored and filled forms, and booked appointments.
//! Field names serialize in the camelCase the deployed frontend expects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user account (merchant, admin, or end user)
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub fullname: String,
    pub mobilenumber: String,
    pub gender: String,
    pub language: String,
    /// RAG collection name, set once documents have been uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(flatten)]
    pub profile: BusinessProfile,
    #[serde(default)]
    pub manual_forms: Vec<FormTemplate>,
    /// AI-generated form templates, stored as the client posted them
    #[serde(default)]
    pub auto_forms: Vec<serde_json::Value>,
    #[serde(default)]
    pub manual_forms_filled: Vec<FilledForm>,
    #[serde(default)]
    pub auto_forms_filled: Vec<FilledForm>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl UserRecord {
    pub fn new(
        email: String,
        password_hash: String,
        user_type: String,
        fullname: String,
        mobilenumber: String,
        gender: String,
        language: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            user_type,
            fullname,
            mobilenumber,
            gender,
            language,
            collection_name: None,
            profile: BusinessProfile::default(),
            manual_forms: Vec::new(),
            auto_forms: Vec::new(),
            manual_forms_filled: Vec::new(),
            auto_forms_filled: Vec::new(),
            appointments: Vec::new(),
        }
    }

    /// Serialize the record for API responses, with the password hash removed.
    pub fn public_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("passwordHash");
        }
        value
    }
}

/// Business-profile fields, all optional until the merchant fills them in
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub business_name: Option<String>,
    #[serde(rename = "businessURL")]
    pub business_url: Option<String>,
    pub profile_photo: Option<String>,
    pub business_logo: Option<String>,
    pub contact_person: Option<String>,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<String>,
    pub business_email: Option<String>,
    pub youtube_video_link: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub services: Vec<String>,
    pub professional_memberships: Vec<String>,
    pub awards_and_achievements: Vec<String>,
    pub keywords: Option<String>,
    pub files: Option<serde_json::Value>,
    pub company_description: Option<String>,
    pub available_hours: Option<serde_json::Value>,
    pub available_days: Option<serde_json::Value>,
}

/// A manually authored form template
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    #[serde(rename = "formID")]
    pub form_id: String,
    pub form_name: String,
    #[serde(default)]
    pub form_description: Option<String>,
    pub form_data: serde_json::Value,
}

/// A submitted response to a form template
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FilledForm {
    #[serde(rename = "formID")]
    pub form_id: String,
    pub form_data: serde_json::Value,
}

/// A booked appointment.
///
/// The merchant's copy carries the full booking details; the end user's copy
/// is only an `{appointmentID, merchantId}` stub resolved at read time.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    #[serde(rename = "appointmentID")]
    pub appointment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserRecord {
        UserRecord::new(
            "merchant@example.com".to_string(),
            "$scrypt$fake-hash".to_string(),
            "merchant".to_string(),
            "Asha Rao".to_string(),
            "9999999999".to_string(),
            "female".to_string(),
            "en-IN".to_string(),
        )
    }

    #[test]
    fn test_public_json_strips_password_hash() {
        let user = sample_user();
        let json = user.public_json();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "merchant@example.com");
        assert_eq!(json["userType"], "merchant");
    }

    #[test]
    fn test_profile_flattens_into_user() {
        let mut user = sample_user();
        user.profile.business_name = Some("Rao Clinic".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["businessName"], "Rao Clinic");
        assert!(json.get("profile").is_none());
    }

    #[test]
    fn test_record_roundtrip_with_legacy_fields_missing() {
        // Records written by older deployments lack the form/appointment lists
        let json = serde_json::json!({
            "id": "abc",
            "email": "u@example.com",
            "passwordHash": "h",
            "userType": "user",
            "fullname": "U",
            "mobilenumber": "1",
            "gender": "male",
            "language": "en-IN",
        });
        let user: UserRecord = serde_json::from_value(json).unwrap();
        assert!(user.manual_forms.is_empty());
        assert!(user.appointments.is_empty());
        assert!(user.profile.business_name.is_none());
    }

    #[test]
    fn test_stub_appointment_omits_empty_fields() {
        let stub = Appointment {
            appointment_id: "a1".to_string(),
            merchant_id: Some("m1".to_string()),
            ..Appointment::default()
        };
        let json = serde_json::to_value(&stub).unwrap();
        assert_eq!(json["appointmentID"], "a1");
        assert_eq!(json["merchantId"], "m1");
        assert!(json.get("firstname").is_none());
    }
}
