use super::{from_api_error, Notice, Outcome};
use crate::client::models::{AddressUpdate, PasswordChange, PhoneUpdate, Profile};
use crate::client::HrClient;
use crate::view::format::or_fallback;
use crate::view::Field;

/// Address as edited in the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl AddressParts {
    /// Splits a stored address on `", "` into the form's first four inputs.
    pub fn prefill(address: &str) -> Self {
        let mut parts = address.split(", ").map(str::to_string);
        Self {
            street: parts.next().unwrap_or_default(),
            city: parts.next().unwrap_or_default(),
            state: parts.next().unwrap_or_default(),
            zip: parts.next().unwrap_or_default(),
            country: String::new(),
        }
    }

    /// Joins street, city, "state zip" and country with `", "`, skipping
    /// parts left empty.
    pub fn compose(&self) -> String {
        let region = format!("{} {}", self.state.trim(), self.zip.trim());
        [
            self.street.trim(),
            self.city.trim(),
            region.trim(),
            self.country.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub details: Vec<Field>,
    pub phone: String,
    pub address: AddressParts,
}

impl SettingsView {
    pub fn new(profile: &Profile) -> Self {
        let dash = |value: Option<&str>| or_fallback(value, "-");
        let name = format!(
            "{} {}",
            profile.first_name.as_deref().unwrap_or_default(),
            profile.last_name.as_deref().unwrap_or_default()
        );

        Self {
            details: vec![
                Field::new("Employee ID", dash(profile.employee_id.as_deref())),
                Field::new("Full Name", dash(Some(name.as_str()))),
                Field::new("Email", dash(profile.email.as_deref())),
                Field::new("Phone", dash(profile.phone.as_deref())),
                Field::new("Address", dash(profile.address.as_deref())),
                Field::new("Role", dash(profile.role.as_deref())),
                Field::new(
                    "Salary",
                    match profile.salary {
                        Some(salary) if salary != 0.0 => format!("${salary}"),
                        _ => "-".to_string(),
                    },
                ),
                Field::new(
                    "Status",
                    if profile.is_active { "Active" } else { "Inactive" },
                ),
            ],
            phone: profile.phone.clone().unwrap_or_default(),
            address: profile
                .address
                .as_deref()
                .map(AddressParts::prefill)
                .unwrap_or_default(),
        }
    }
}

pub async fn settings_profile(client: &HrClient) -> Outcome<SettingsView> {
    let profile = load!(client.settings_profile(), "Failed to load profile");
    Outcome::Render(SettingsView::new(&profile))
}

pub async fn change_password(
    client: &HrClient,
    current: &str,
    new_password: &str,
    confirm: &str,
) -> Outcome<Notice> {
    if new_password != confirm {
        return Outcome::Failed("New passwords do not match".to_string());
    }

    let change = PasswordChange {
        old_password: current.to_string(),
        new_password: new_password.to_string(),
        confirm_password: confirm.to_string(),
    };
    match client.change_password(&change).await {
        Ok(_) => Outcome::Render(Notice::new("Password changed successfully!")),
        Err(err) => from_api_error(err, "Error changing password"),
    }
}

pub async fn update_phone(client: &HrClient, phone: &str) -> Outcome<Notice> {
    let update = PhoneUpdate {
        phone: phone.trim().to_string(),
    };
    match client.update_phone(&update).await {
        Ok(_) => Outcome::Render(Notice::new("Phone number updated successfully!")),
        Err(err) => from_api_error(err, "Error updating phone number"),
    }
}

pub async fn update_address(client: &HrClient, parts: &AddressParts) -> Outcome<Notice> {
    let update = AddressUpdate {
        address: parts.compose(),
    };
    match client.update_address(&update).await {
        Ok(_) => Outcome::Render(Notice::new("Address updated successfully!")),
        Err(err) => from_api_error(err, "Error updating address"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::field_value;

    #[test]
    fn compose_skips_empty_parts() {
        let full = AddressParts {
            street: " 12 Main St ".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
            country: "USA".into(),
        };
        assert_eq!(full.compose(), "12 Main St, Springfield, IL 62701, USA");

        let sparse = AddressParts {
            street: "12 Main St".into(),
            zip: "62701".into(),
            ..AddressParts::default()
        };
        assert_eq!(sparse.compose(), "12 Main St, 62701");
        assert_eq!(AddressParts::default().compose(), "");
    }

    #[test]
    fn prefill_splits_stored_address() {
        let parts = AddressParts::prefill("12 Main St, Springfield, IL 62701, USA");
        assert_eq!(parts.street, "12 Main St");
        assert_eq!(parts.city, "Springfield");
        assert_eq!(parts.state, "IL 62701");
        assert_eq!(parts.zip, "USA");
        assert!(parts.country.is_empty());
    }

    #[test]
    fn missing_profile_values_show_dashes() {
        let view = SettingsView::new(&Profile {
            id: None,
            employee_id: Some("EMP001".into()),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            address: None,
            role: None,
            is_active: true,
            salary: None,
            created_at: None,
            updated_at: None,
        });
        assert_eq!(field_value(&view.details, "Employee ID"), Some("EMP001"));
        assert_eq!(field_value(&view.details, "Full Name"), Some("-"));
        assert_eq!(field_value(&view.details, "Salary"), Some("-"));
        assert_eq!(view.phone, "");
        assert_eq!(view.address, AddressParts::default());
    }
}
